//! Scheduling service trait.

use serde_json::Value;

use super::model::{AvailableSlots, BookingFilter, Cancellation, NewBooking, Reschedule, SlotQuery};
use crate::error::Result;

/// Operations offered by the scheduling provider.
///
/// Implementations issue one provider call per operation and report non-2xx
/// answers as [`CalbotError::ProviderHttp`](crate::error::CalbotError::ProviderHttp)
/// carrying the status and raw body.
#[async_trait::async_trait]
pub trait SchedulingService: Send + Sync {
    /// Lists event types, trimmed to `id`, `title`, `lengthInMinutes` and `description`.
    async fn list_event_types(&self) -> Result<Value>;

    /// Looks up bookable slots inside the query's effective window.
    async fn get_available_slots(&self, query: &SlotQuery) -> Result<AvailableSlots>;

    /// Creates a booking and returns the provider's booking object.
    async fn create_booking(&self, booking: &NewBooking) -> Result<Value>;

    /// Lists bookings with verbose and internal fields stripped.
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Value>;

    async fn cancel_booking(&self, cancellation: &Cancellation) -> Result<Value>;

    async fn reschedule_booking(&self, reschedule: &Reschedule) -> Result<Value>;
}
