//! Best-effort discovery of user facts.
//!
//! Both sources are heuristics: a capitalised word after "this is" may well
//! not be a name. Results only ever fill empty profile fields.

use std::str::FromStr;

use calbot_core::time::parse_timezone;
use calbot_core::user::UserProfile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::tools::ToolName;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\w.+\-]+@[\w\-]+(?:\.[a-z]{2,})+").expect("email pattern is valid")
});

// The introducer is case-insensitive, the name itself must be capitalised.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:\bi['’]?m|\bmy name is|\bthis is|\bcall me)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
    )
    .expect("name pattern is valid")
});

/// Scans free text for an email address and a self-introduced name.
pub fn from_text(text: &str) -> UserProfile {
    UserProfile {
        name: NAME_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        timezone: None,
    }
}

/// Collects profile-shaped arguments of a tool call.
///
/// `list_bookings.attendee_email` is ignored: it names an external attendee,
/// not the user. Timezones that are not valid IANA names are dropped so a
/// rejected call cannot pin a bad zone into the write-once profile.
pub fn from_tool_arguments(tool: &str, arguments: &Value) -> UserProfile {
    let field = |key: &str| {
        arguments
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let timezone = |key: &str| field(key).filter(|tz| parse_timezone(tz).is_ok());

    match ToolName::from_str(tool) {
        Ok(ToolName::CreateBooking) => UserProfile {
            name: field("attendee_name"),
            email: field("attendee_email"),
            timezone: timezone("attendee_timezone"),
        },
        Ok(ToolName::GetAvailableSlots) => UserProfile {
            timezone: timezone("time_zone"),
            ..UserProfile::default()
        },
        Ok(ToolName::LocalToUtc | ToolName::UtcToLocal | ToolName::ResolveDate) => UserProfile {
            timezone: timezone("timezone"),
            ..UserProfile::default()
        },
        _ => UserProfile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_and_name_from_introduction() {
        let profile = from_text("Hi, I'm Jay Park, reach me at jay.park+cal@example.co.uk");
        assert_eq!(profile.name.as_deref(), Some("Jay Park"));
        assert_eq!(profile.email.as_deref(), Some("jay.park+cal@example.co.uk"));
    }

    #[test]
    fn test_name_phrases() {
        assert_eq!(from_text("my name is Sam").name.as_deref(), Some("Sam"));
        assert_eq!(from_text("Call me Alex").name.as_deref(), Some("Alex"));
        assert_eq!(from_text("Im Robin").name.as_deref(), Some("Robin"));
        assert_eq!(from_text("I’m Kim").name.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_lowercase_words_are_not_names() {
        assert_eq!(from_text("I'm looking for a slot tomorrow").name, None);
        assert_eq!(from_text("book something at 3pm").name, None);
    }

    #[test]
    fn test_email_requires_tld() {
        assert_eq!(from_text("mail me at jay@localhost").email, None);
        assert_eq!(from_text("jay@x.com").email.as_deref(), Some("jay@x.com"));
    }

    #[test]
    fn test_create_booking_arguments() {
        let profile = from_tool_arguments(
            "create_booking",
            &json!({
                "attendee_name": "Jay",
                "attendee_email": "jay@x.com",
                "attendee_timezone": "Europe/Berlin",
                "event_type_id": 1
            }),
        );
        assert_eq!(profile.name.as_deref(), Some("Jay"));
        assert_eq!(profile.email.as_deref(), Some("jay@x.com"));
        assert_eq!(profile.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_timezone_sources() {
        let slots =
            from_tool_arguments("get_available_slots", &json!({ "time_zone": "Asia/Tokyo" }));
        assert_eq!(slots.timezone.as_deref(), Some("Asia/Tokyo"));
        let resolve = from_tool_arguments(
            "resolve_date",
            &json!({ "timezone": "UTC", "offset_days": 1 }),
        );
        assert_eq!(resolve.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_invalid_timezone_is_not_remembered() {
        let resolve = from_tool_arguments(
            "resolve_date",
            &json!({ "timezone": "PST8PDT-ish", "offset_days": 0 }),
        );
        assert!(resolve.is_empty());

        let booking = from_tool_arguments(
            "create_booking",
            &json!({
                "attendee_name": "Jay",
                "attendee_email": "jay@x.com",
                "attendee_timezone": "Mars/Olympus"
            }),
        );
        assert_eq!(booking.name.as_deref(), Some("Jay"));
        assert_eq!(booking.timezone, None);
    }

    #[test]
    fn test_list_bookings_email_is_not_the_user() {
        let profile =
            from_tool_arguments("list_bookings", &json!({ "attendee_email": "guest@x.com" }));
        assert!(profile.is_empty());
    }

    #[test]
    fn test_unknown_tool_yields_nothing() {
        assert!(from_tool_arguments("nope", &json!({ "timezone": "UTC" })).is_empty());
    }
}
