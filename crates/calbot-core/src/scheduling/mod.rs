//! Scheduling domain module.
//!
//! # Module Structure
//!
//! - `model`: Typed requests (`SlotQuery`, `NewBooking`, ...) and compact
//!   responses (`Slot`, `AvailableSlots`)
//! - `slots`: Reduction of raw slot listings to the compact shape
//! - `service`: `SchedulingService` trait implemented by provider clients

mod model;
mod service;
mod slots;

// Re-export public API
pub use model::{
    AvailableSlots, BookingFilter, BookingStatus, Cancellation, NewBooking, Reschedule, SLOT_NOTE,
    Slot, SlotQuery,
};
pub use service::SchedulingService;
pub use slots::compact_slots;
