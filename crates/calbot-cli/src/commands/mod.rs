pub mod chat;
pub mod serve;
