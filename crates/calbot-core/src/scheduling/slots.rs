//! Reduction of raw provider slot listings to the compact `{t, u}` shape.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde_json::Value;

use super::model::{AvailableSlots, SLOT_NOTE, Slot, SlotQuery};
use crate::time::{UTC_ISO_FORMAT, parse_instant, parse_timezone};

/// Compacts the provider's `/slots` payload for `query`.
///
/// The provider groups slots under local-date keys but can bleed keys from
/// outside the requested window; only keys inside the effective `[start, end)`
/// window survive. Keys that are not dates and slots without a parseable
/// `start` are dropped.
pub fn compact_slots(raw: &Value, query: &SlotQuery) -> AvailableSlots {
    let (start, end) = query.effective_window();
    let requested_zone = query.time_zone.as_deref().filter(|tz| !tz.is_empty());
    let display_zone: Option<Tz> = requested_zone.and_then(|tz| parse_timezone(tz).ok());

    let mut data = BTreeMap::new();
    if let Some(days) = raw.get("data").and_then(Value::as_object) {
        for (date_key, slots) in days {
            let Ok(day) = NaiveDate::parse_from_str(date_key, "%Y-%m-%d") else {
                continue;
            };
            if day < start || day >= end {
                continue;
            }

            let entries = slots
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(|slot| compact_slot(slot, display_zone))
                        .collect()
                })
                .unwrap_or_default();
            data.insert(date_key.clone(), entries);
        }
    }

    AvailableSlots {
        status: raw.get("status").cloned(),
        timezone: requested_zone.unwrap_or("UTC").to_string(),
        note: SLOT_NOTE.to_string(),
        data,
    }
}

fn compact_slot(slot: &Value, display_zone: Option<Tz>) -> Option<Slot> {
    let start = slot.get("start").and_then(Value::as_str)?;
    let instant = parse_instant(start).ok()?;
    let local_time = match display_zone {
        Some(tz) => instant.with_timezone(&tz).format("%H:%M").to_string(),
        None => instant.format("%H:%M").to_string(),
    };
    Some(Slot {
        local_time,
        utc: instant.format(UTC_ISO_FORMAT).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(start: &str, end: &str, tz: Option<&str>) -> SlotQuery {
        SlotQuery {
            event_type_id: 42,
            start_time: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end_time: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            time_zone: tz.map(str::to_string),
        }
    }

    const LA: &str = "America/Los_Angeles";

    fn compact(start: &str, end: &str, tz: Option<&str>) -> AvailableSlots {
        compact_slots(&raw(), &query(start, end, tz))
    }

    fn raw() -> Value {
        json!({
            "status": "success",
            "data": {
                "2026-03-01": [{ "start": "2026-03-01T23:00:00.000-08:00" }],
                "2026-03-02": [
                    { "start": "2026-03-02T09:00:00.000-08:00" },
                    { "start": "2026-03-02T15:00:00.000-08:00" }
                ],
                "2026-03-03": [{ "start": "2026-03-03T09:00:00.000-08:00" }],
                "not-a-date": [{ "start": "2026-03-02T10:00:00.000-08:00" }]
            }
        })
    }

    #[test]
    fn test_keys_outside_window_are_dropped() {
        let compact = compact("2026-03-02", "2026-03-03", Some(LA));
        assert_eq!(compact.data.keys().collect::<Vec<_>>(), vec!["2026-03-02"]);
        assert_eq!(compact.status, Some(json!("success")));
        assert_eq!(compact.timezone, LA);
    }

    #[test]
    fn test_zero_width_window_keeps_exactly_one_day() {
        let compact = compact("2026-03-02", "2026-03-02", Some(LA));
        assert_eq!(compact.data.len(), 1);
        assert!(compact.data.contains_key("2026-03-02"));
    }

    #[test]
    fn test_slots_carry_local_display_and_true_utc() {
        let compact = compact("2026-03-02", "2026-03-03", Some(LA));
        let slots = &compact.data["2026-03-02"];
        assert_eq!(slots[1].local_time, "15:00");
        assert_eq!(slots[1].utc, "2026-03-02T23:00:00Z");
    }

    #[test]
    fn test_display_falls_back_to_utc_without_timezone() {
        let compact = compact("2026-03-02", "2026-03-03", None);
        assert_eq!(compact.timezone, "UTC");
        assert_eq!(compact.data["2026-03-02"][0].local_time, "17:00");
    }

    #[test]
    fn test_unknown_display_timezone_uses_utc_times() {
        let compact = compact("2026-03-02", "2026-03-03", Some("Not/AZone"));
        assert_eq!(compact.data["2026-03-02"][0].local_time, "17:00");
        assert_eq!(compact.timezone, "Not/AZone");
    }

    #[test]
    fn test_missing_data_yields_empty_listing() {
        let listing = json!({ "status": "success" });
        let compact = compact_slots(&listing, &query("2026-03-02", "2026-03-03", None));
        assert!(compact.data.is_empty());
        assert!(compact.note.contains("'u'"));
    }

    #[test]
    fn test_blank_timezone_reports_utc() {
        let compact = compact("2026-03-02", "2026-03-03", Some(""));
        assert_eq!(compact.timezone, "UTC");
        assert_eq!(compact.data["2026-03-02"][0].local_time, "17:00");
    }
}
