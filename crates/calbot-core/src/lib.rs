//! Domain layer for Calbot.
//!
//! Holds the types every other crate speaks: conversation messages, the user
//! profile, scheduling requests and the `SchedulingService` seam, the time
//! resolver, configuration models and the shared error type.

pub mod config;
pub mod error;
pub mod scheduling;
pub mod secret;
pub mod session;
pub mod time;
pub mod user;

// Re-export common error type
pub use error::{CalbotError, Result};
