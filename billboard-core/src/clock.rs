//! Wall-clock access and the compact timestamp format used on disk.
//!
//! Timestamps are stored and used as directory names in the form
//! `%Y%m%d%H%M%S`, always in UTC and truncated to whole seconds.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDateTime, ParseError, Timelike, Utc};

/// `strftime` pattern for persisted timestamps and snapshot names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Source of the current time.
///
/// Leaderboards take a shared clock so tests can move time forward without
/// sleeping.
pub trait Clock: Send + Sync + Debug {
    /// Return the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_seconds(Utc::now())
    }
}

/// The "never recomputed" marker: the Unix epoch.
#[must_use]
pub const fn never() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Drop sub-second precision so values round-trip through [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.with_nanosecond(0).unwrap_or(instant)
}

/// Format `instant` as a compact timestamp.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a compact timestamp as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Serde adapter for `DateTime<Utc>` fields stored as compact timestamps.
pub mod compact_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialise as `%Y%m%d%H%M%S`.
    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*instant))
    }

    /// Deserialise from `%Y%m%d%H%M%S`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}
