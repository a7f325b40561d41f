use chrono::{DateTime, Utc};

use super::{Record, TIME_KEYS};

/// Numbers above this are read as Unix epoch seconds.
const EPOCH_THRESHOLD: f64 = 1e9;

/// A point in time derived from a record, or the marker for "no usable
/// timestamp". `Absent` orders before every real instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParsedTimestamp {
    #[default]
    Absent,
    At(DateTime<Utc>),
}

impl ParsedTimestamp {
    /// Interpret a raw value as epoch seconds (when it is a number above 1e9)
    /// or as an RFC 3339 date-time.
    pub fn parse(raw: &str) -> Self {
        if let Ok(secs) = raw.parse::<f64>() {
            if secs.is_finite() && secs > EPOCH_THRESHOLD {
                let whole = secs.trunc();
                let nanos = ((secs - whole) * 1e9) as u32;
                if let Some(dt) = DateTime::from_timestamp(whole as i64, nanos) {
                    return ParsedTimestamp::At(dt);
                }
            }
        }

        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => ParsedTimestamp::At(dt.with_timezone(&Utc)),
            Err(_) => ParsedTimestamp::Absent,
        }
    }

    /// Probe the timestamp fields in order; a present but unparsable field
    /// falls through to the next name.
    pub fn from_record(record: &Record) -> Self {
        TIME_KEYS
            .iter()
            .filter_map(|key| record.get(key))
            .map(|value| Self::parse(&value.to_string()))
            .find(|ts| !ts.is_absent())
            .unwrap_or_default()
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ParsedTimestamp::Absent)
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            ParsedTimestamp::Absent => None,
            ParsedTimestamp::At(dt) => Some(*dt),
        }
    }

    /// Wall-clock `HH:MM:SS` in UTC.
    pub fn clock(&self) -> Option<String> {
        self.as_datetime()
            .map(|dt| dt.format("%H:%M:%S").to_string())
    }
}
