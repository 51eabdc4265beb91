//! Date reconciliation
//!
//! Series entries carry their dates in two unrelated raw forms: UNIX epoch
//! seconds for event boundaries, and a `YYYY-MM-DD` calendar string paired
//! with an IANA zone name for the nominal report day. The two describe
//! different instants, so the calendar day is never derived from the epoch
//! fields (or the other way round).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::errors::{DecodeError, DecodeResult};

/// Wire format of calendar date strings
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest DST gap searched when local midnight does not exist
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Entries whose raw date fields can be resolved in place
pub trait Reconcile {
    /// Fill the resolved timestamp fields from the raw ones
    fn reconcile(&mut self) -> DecodeResult<()>;
}

/// Reconcile every entry, stopping at the first failure
pub fn reconcile_all<T: Reconcile>(entries: &mut [T]) -> DecodeResult<()> {
    entries.iter_mut().try_for_each(Reconcile::reconcile)
}

/// Convert UNIX seconds to a UTC instant.
///
/// Values outside chrono's range saturate; payloads carrying such values are
/// already rejected while decoding (see [`deserialize_epoch`]).
pub fn epoch_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

pub fn parse_timezone(name: &str) -> DecodeResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| DecodeError::UnknownTimeZone(name.to_string()))
}

pub fn parse_calendar_date(value: &str) -> DecodeResult<NaiveDate> {
    NaiveDate::parse_from_str(value, CALENDAR_DATE_FORMAT).map_err(|source| {
        DecodeError::DateParse {
            value: value.to_string(),
            source,
        }
    })
}

/// Resolve a calendar day to local midnight in the named zone.
///
/// `("2023-06-15", "America/Denver")` resolves to `2023-06-15T00:00:00-06:00`.
pub fn resolve_calendar_date(date: &str, timezone: &str) -> DecodeResult<DateTime<Tz>> {
    let tz = parse_timezone(timezone)?;
    let day = parse_calendar_date(date)?;
    Ok(local_midnight(day, tz))
}

/// Resolve the calendar date only when both the date and its zone are present
pub fn resolve_optional_date(
    date: Option<&str>,
    timezone: Option<&str>,
) -> DecodeResult<Option<DateTime<Tz>>> {
    match (date, timezone) {
        (Some(date), Some(timezone)) => resolve_calendar_date(date, timezone).map(Some),
        _ => Ok(None),
    }
}

fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(resolved) => resolved,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST transition: take the first local instant after the gap
        LocalResult::None => (1..=MAX_GAP_MINUTES)
            .find_map(|minutes| {
                tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                    .earliest()
            })
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight)),
    }
}

/// Serde helper rejecting epoch values chrono cannot represent
pub fn deserialize_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = i64::deserialize(deserializer)?;
    check_epoch(secs).map_err(serde::de::Error::custom)
}

/// Serde helper for maps keyed by epoch seconds, rejecting unrepresentable keys
pub fn deserialize_epoch_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<i64, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let map = Option::<BTreeMap<i64, V>>::deserialize(deserializer)?.unwrap_or_default();
    for secs in map.keys() {
        check_epoch(*secs).map_err(serde::de::Error::custom)?;
    }
    Ok(map)
}

fn check_epoch(secs: i64) -> Result<i64, String> {
    match DateTime::<Utc>::from_timestamp(secs, 0) {
        Some(_) => Ok(secs),
        None => Err(format!("epoch timestamp out of range: {}", secs)),
    }
}
