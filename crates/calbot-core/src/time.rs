//! Timezone-aware date and time conversions.
//!
//! Every function here is pure apart from the `*_now` helpers reading the
//! system clock. Arithmetic on offsets and relative days is delegated to the
//! IANA zone rules shipped with `chrono-tz` so the model never has to compute
//! them itself.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CalbotError, Result};

/// Wall-clock format used for human-readable local renderings.
const LOCAL_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M %Z";
/// Canonical UTC instant format accepted by the booking endpoints.
pub const UTC_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A calendar date resolved relative to "today" in some timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Full weekday name, e.g. `Sunday`
    pub weekday: String,
    /// e.g. `Sunday, March 1, 2026`
    pub display: String,
}

/// A local wall-clock time converted to UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcConversion {
    pub utc_iso: String,
    pub utc_date: String,
    pub utc_time: String,
    pub local_display: String,
}

/// A UTC instant rendered in a local timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConversion {
    pub local_display: String,
    pub local_date: String,
    pub local_time: String,
}

/// Parses an IANA timezone identifier.
pub fn parse_timezone(timezone: &str) -> Result<Tz> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| CalbotError::unknown_timezone(timezone))
}

/// Resolves `offset_days` relative to today's date as observed in `timezone`.
pub fn resolve_date(offset_days: i64, timezone: &str) -> Result<ResolvedDate> {
    resolve_date_at(Utc::now(), offset_days, timezone)
}

/// Same as [`resolve_date`] with an explicit reference instant.
pub fn resolve_date_at(
    now: DateTime<Utc>,
    offset_days: i64,
    timezone: &str,
) -> Result<ResolvedDate> {
    let tz = parse_timezone(timezone)?;
    let today = now.with_timezone(&tz).date_naive();
    let target = Duration::try_days(offset_days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| {
            CalbotError::invalid_datetime(format!(
                "offset of {offset_days} days is out of the supported calendar range"
            ))
        })?;

    Ok(ResolvedDate {
        date: target.format("%Y-%m-%d").to_string(),
        weekday: target.format("%A").to_string(),
        display: target.format("%A, %B %-d, %Y").to_string(),
    })
}

/// Interprets `date` (`YYYY-MM-DD`) and `time` (`HH:MM`) as wall-clock time in
/// `timezone` and converts it to UTC.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Local times skipped by a DST spring-forward are rejected.
pub fn local_to_utc(date: &str, time: &str, timezone: &str) -> Result<UtcConversion> {
    let tz = parse_timezone(timezone)?;
    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {}", date.trim(), time.trim()),
        "%Y-%m-%d %H:%M",
    )
    .map_err(|err| {
        CalbotError::invalid_datetime(format!(
            "'{date} {time}' does not match YYYY-MM-DD HH:MM ({err})"
        ))
    })?;

    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(CalbotError::invalid_datetime(format!(
                "{date} {time} does not exist in {timezone} (skipped by a daylight saving transition)"
            )));
        }
    };
    let utc = local.with_timezone(&Utc);

    Ok(UtcConversion {
        utc_iso: utc.format(UTC_ISO_FORMAT).to_string(),
        utc_date: utc.format("%Y-%m-%d").to_string(),
        utc_time: utc.format("%H:%M").to_string(),
        local_display: local.format(LOCAL_DISPLAY_FORMAT).to_string(),
    })
}

/// Converts a UTC ISO-8601 instant into wall-clock time in `timezone`.
pub fn utc_to_local(utc_iso: &str, timezone: &str) -> Result<LocalConversion> {
    let tz = parse_timezone(timezone)?;
    let instant = parse_instant(utc_iso)?;
    let local = instant.with_timezone(&tz);

    Ok(LocalConversion {
        local_display: local.format(LOCAL_DISPLAY_FORMAT).to_string(),
        local_date: local.format("%Y-%m-%d").to_string(),
        local_time: local.format("%H:%M").to_string(),
    })
}

/// Parses an ISO-8601 instant. Strings carrying an offset (`Z`, `-08:00`)
/// are honoured; offset-less strings are taken as UTC.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .map(|naive| naive.and_utc())
        .map_err(|err| {
            CalbotError::invalid_datetime(format!("'{value}' is not an ISO 8601 instant ({err})"))
        })
}
