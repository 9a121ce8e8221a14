//! Tool names and the schemas advertised to the model.

use calbot_core::session::ToolDefinition;
use serde_json::{Value, json};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Every tool the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    ListEventTypes,
    GetAvailableSlots,
    CreateBooking,
    ListBookings,
    CancelBooking,
    RescheduleBooking,
    LocalToUtc,
    UtcToLocal,
    ResolveDate,
}

impl ToolName {
    pub fn description(self) -> &'static str {
        match self {
            Self::ListEventTypes => {
                "List all event types available for booking on cal.com. \
                 Call this first when the user wants to book a meeting so they \
                 can choose the correct event type."
            }
            Self::GetAvailableSlots => {
                "Retrieve available time slots for a specific cal.com event type \
                 within a date range. Use this after the user has chosen an \
                 event type and specified when they want to meet. Each slot has 't' \
                 (local display time) and 'u' (UTC instant); pass 'u' directly as the \
                 'start' of create_booking or the 'new_start' of reschedule_booking."
            }
            Self::CreateBooking => {
                "Create a new cal.com booking. Only call this once all required \
                 details have been gathered from the user."
            }
            Self::ListBookings => {
                "Retrieve the calendar owner's bookings. Always pass status='upcoming' by default \
                 unless the user explicitly asks for past or cancelled bookings. \
                 Only pass attendee_email to find bookings for a specific external \
                 attendee; do NOT pass the owner's own email as a filter."
            }
            Self::CancelBooking => {
                "Cancel an existing cal.com booking by its UID. \
                 First list bookings to find the correct UID."
            }
            Self::RescheduleBooking => {
                "Reschedule an existing cal.com booking to a new start time. \
                 First list bookings to find the correct UID, then call \
                 get_available_slots and use the 'u' field of the chosen slot \
                 directly as new_start. Do NOT call local_to_utc or construct \
                 the time manually."
            }
            Self::LocalToUtc => {
                "Convert a user's local date and time to a UTC ISO 8601 string. \
                 ALWAYS call this before create_booking or reschedule_booking when the time \
                 did not come from a slot's 'u' field. Never compute UTC offsets manually."
            }
            Self::UtcToLocal => {
                "Convert a UTC ISO 8601 datetime (as returned by the Cal.com API) \
                 to the user's local timezone for display. Always call this when \
                 showing booking times back to the user."
            }
            Self::ResolveDate => {
                "Resolve a relative day reference (today, tomorrow, day after tomorrow, \
                 yesterday, N days from now, etc.) to an exact YYYY-MM-DD date in the \
                 user's local timezone. ALWAYS call this instead of calculating dates \
                 yourself whenever the user uses a relative expression like 'tomorrow', \
                 'next week', 'in 3 days', etc."
            }
        }
    }

    /// JSON schema of the tool's argument object.
    pub fn parameters(self) -> Value {
        match self {
            Self::ListEventTypes => object(json!({}), &[]),
            Self::GetAvailableSlots => object(
                json!({
                    "event_type_id": {
                        "type": "integer",
                        "description": "The numeric ID of the event type."
                    },
                    "start_time": {
                        "type": "string",
                        "description": "Start of the search window as a date string in YYYY-MM-DD format, e.g. 2024-01-15"
                    },
                    "end_time": {
                        "type": "string",
                        "description": "End of the search window as a date string in YYYY-MM-DD format (exclusive upper bound), e.g. 2024-01-21"
                    },
                    "time_zone": {
                        "type": "string",
                        "description": "IANA timezone of the attendee, e.g. America/New_York or America/Los_Angeles. \
Slots are returned in this timezone so the times match the attendee's local clock. \
Always pass this so the attendee's requested time (e.g. '2pm') can be matched directly."
                    }
                }),
                &["event_type_id", "start_time", "end_time"],
            ),
            Self::CreateBooking => object(
                json!({
                    "event_type_id": {
                        "type": "integer",
                        "description": "ID of the event type to book."
                    },
                    "start": {
                        "type": "string",
                        "description": "Meeting start time as a UTC ISO 8601 string, e.g. the 'u' field of a slot."
                    },
                    "attendee_name": {
                        "type": "string",
                        "description": "Full name of the attendee."
                    },
                    "attendee_email": {
                        "type": "string",
                        "description": "Email address of the attendee."
                    },
                    "attendee_timezone": {
                        "type": "string",
                        "description": "IANA timezone of the attendee, e.g. America/New_York or UTC."
                    },
                    "notes": {
                        "type": "string",
                        "description": "Optional meeting notes or agenda."
                    }
                }),
                &[
                    "event_type_id",
                    "start",
                    "attendee_name",
                    "attendee_email",
                    "attendee_timezone",
                ],
            ),
            Self::ListBookings => object(
                json!({
                    "attendee_email": {
                        "type": "string",
                        "description": "Only set this to filter bookings by a specific external attendee's email. \
Leave unset when listing the owner's own bookings."
                    },
                    "status": {
                        "type": "string",
                        "enum": ["upcoming", "past", "cancelled"],
                        "description": "Filter by booking status. Default to 'upcoming' unless the user \
specifically asks for past or cancelled bookings."
                    }
                }),
                &[],
            ),
            Self::CancelBooking => object(
                json!({
                    "booking_uid": {
                        "type": "string",
                        "description": "Unique identifier of the booking to cancel."
                    },
                    "cancellation_reason": {
                        "type": "string",
                        "description": "Optional reason for cancellation. Do NOT ask the user for this. \
If they have not already provided a reason, omit this field and proceed with cancellation immediately."
                    }
                }),
                &["booking_uid"],
            ),
            Self::RescheduleBooking => object(
                json!({
                    "booking_uid": {
                        "type": "string",
                        "description": "Unique identifier of the booking to reschedule."
                    },
                    "new_start": {
                        "type": "string",
                        "description": "New start time as a UTC ISO 8601 string. Must be the 'u' field taken \
directly from a slot returned by get_available_slots, e.g. '2026-03-05T23:00:00Z'."
                    }
                }),
                &["booking_uid", "new_start"],
            ),
            Self::LocalToUtc => object(
                json!({
                    "date": {
                        "type": "string",
                        "description": "Local date in YYYY-MM-DD format, e.g. 2026-03-04."
                    },
                    "time": {
                        "type": "string",
                        "description": "Local time in HH:MM 24-hour format, e.g. 16:00 for 4 PM."
                    },
                    "timezone": {
                        "type": "string",
                        "description": "IANA timezone of the user, e.g. America/Los_Angeles."
                    }
                }),
                &["date", "time", "timezone"],
            ),
            Self::UtcToLocal => object(
                json!({
                    "utc_iso": {
                        "type": "string",
                        "description": "UTC datetime string from the API, e.g. 2026-03-05T00:00:00.000Z."
                    },
                    "timezone": {
                        "type": "string",
                        "description": "IANA timezone to convert into, e.g. America/Los_Angeles."
                    }
                }),
                &["utc_iso", "timezone"],
            ),
            Self::ResolveDate => object(
                json!({
                    "offset_days": {
                        "type": "integer",
                        "description": "Number of days from today: 0 = today, 1 = tomorrow, \
2 = day after tomorrow, -1 = yesterday, 7 = one week from today, etc."
                    },
                    "timezone": {
                        "type": "string",
                        "description": "IANA timezone of the user, e.g. America/Los_Angeles."
                    }
                }),
                &["offset_days", "timezone"],
            ),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::function(self.to_string(), self.description(), self.parameters())
    }
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Definitions of every tool, in catalogue order.
pub fn all_definitions() -> Vec<ToolDefinition> {
    ToolName::iter().map(ToolName::definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_names_are_snake_case() {
        assert_eq!(ToolName::GetAvailableSlots.as_ref(), "get_available_slots");
        assert_eq!(ToolName::from_str("utc_to_local").unwrap(), ToolName::UtcToLocal);
        assert!(ToolName::from_str("delete_everything").is_err());
    }

    #[test]
    fn test_catalogue_has_nine_distinct_tools() {
        let definitions = all_definitions();
        assert_eq!(definitions.len(), 9);
        let mut names: Vec<_> = definitions.iter().map(|d| d.function.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for tool in ToolName::iter() {
            let schema = tool.parameters();
            let properties = schema["properties"].as_object().unwrap();
            for required in schema["required"].as_array().unwrap() {
                let key = required.as_str().unwrap();
                assert!(properties.contains_key(key), "{tool}: {key} is not a property");
            }
        }
    }

    #[test]
    fn test_list_bookings_status_is_enumerated() {
        let schema = ToolName::ListBookings.parameters();
        assert_eq!(
            schema["properties"]["status"]["enum"],
            json!(["upcoming", "past", "cancelled"])
        );
        assert_eq!(schema["required"], json!([]));
    }
}
