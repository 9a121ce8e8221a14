//! Request and response types of the scheduling provider.
//!
//! Request types deserialize directly from tool-call arguments, so their field
//! names match the parameter names advertised to the model.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// Guidance attached to every slot listing.
pub const SLOT_NOTE: &str = "Each slot has 't' (local display time) and 'u' (UTC ISO for booking). \
Pass 'u' directly as the 'start' parameter to create_booking - do NOT call local_to_utc for slot times.";

/// Availability lookup for one event type over a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub event_type_id: i64,
    /// First local date of the window (inclusive).
    pub start_time: NaiveDate,
    /// End of the window (exclusive).
    pub end_time: NaiveDate,
    /// IANA timezone the slots should be presented in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl SlotQuery {
    /// The `[start, end)` window actually queried.
    ///
    /// A window whose end is not after its start is widened to exactly one day.
    pub fn effective_window(&self) -> (NaiveDate, NaiveDate) {
        let start = self.start_time;
        let end = if self.end_time <= start {
            start + Duration::days(1)
        } else {
            self.end_time
        };
        (start, end)
    }
}

/// One bookable slot.
///
/// `utc` is authoritative and must be passed verbatim to booking calls;
/// `local_time` is for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// `HH:MM` in the requested timezone (or UTC).
    #[serde(rename = "t")]
    pub local_time: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    #[serde(rename = "u")]
    pub utc: String,
}

/// Compact availability listing handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub status: Option<Value>,
    pub timezone: String,
    pub note: String,
    /// Local date (`YYYY-MM-DD`) to the slots starting on it.
    pub data: BTreeMap<String, Vec<Slot>>,
}

/// A booking to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub event_type_id: i64,
    /// UTC ISO-8601 start instant.
    pub start: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Booking status filter accepted by the provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Past,
    Cancelled,
}

/// Filters for listing bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

/// Cancellation of an existing booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub booking_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

/// Move of an existing booking to a new start instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reschedule {
    pub booking_uid: String,
    /// UTC ISO-8601 start instant, normally a slot's `u` value.
    pub new_start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_by: Option<String>,
}
