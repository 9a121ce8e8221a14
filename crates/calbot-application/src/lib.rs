//! Application layer for Calbot.
//!
//! Owns the keyed collection of live conversations and exposes the two
//! operations every presentation adapter is built on: `send` and `reset`.

pub mod session;

pub use session::{SessionCache, SessionFactory, SessionStore};
