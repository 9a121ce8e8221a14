//! User domain module.
//!
//! This module contains the per-session profile of facts learned about the
//! person on the other side of the conversation.
//!
//! # Usage
//!
//! ```ignore
//! use calbot_core::user::{UserProfile, DEFAULT_TIMEZONE};
//! ```

mod model;

// Re-export public API
pub use model::{DEFAULT_TIMEZONE, UserProfile};
