//! ISO-8601 timestamps and the fallback policy for bad ones.
//!
//! Stored dates come from the caller's storage layer and may be malformed.
//! A malformed date is never an error: as a review baseline it means "now",
//! and in a due query it means "already due".

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// `days_overdue` reported for records whose review date cannot be parsed.
pub const UNPARSEABLE_DAYS_OVERDUE: i64 = 999;

/// A stored timestamp. Keeps the raw text when it could not be parsed so the
/// fallback policy can still be applied later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Timestamp {
    /// A successfully parsed instant.
    At(DateTime<Utc>),
    /// Text that is not a recognizable ISO-8601 timestamp.
    Malformed(String),
}

impl Timestamp {
    /// Parse `raw`, keeping it verbatim if it is not a valid timestamp.
    pub fn parse(raw: &str) -> Self {
        match parse_iso8601(raw) {
            Some(at) => Timestamp::At(at),
            None => Timestamp::Malformed(raw.to_string()),
        }
    }

    /// The parsed instant, if any.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(at) => Some(*at),
            Timestamp::Malformed(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Timestamp::At(at)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        match parse_iso8601(&raw) {
            Some(at) => Timestamp::At(at),
            None => Timestamp::Malformed(raw),
        }
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(at) => write!(f, "{}", at.to_rfc3339()),
            Timestamp::Malformed(raw) => write!(f, "{raw}"),
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// Accepts date-times with a `T` or space separator, with or without
/// seconds, followed by `Z`, a numeric offset (`+02:00` or `+0200`), or
/// nothing (read as UTC). Bare dates are midnight UTC.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    for format in NAIVE_FORMATS {
        for offset in ["%:z", "%z"] {
            if let Ok(dt) = DateTime::parse_from_str(s, &format!("{format}{offset}")) {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Baseline for scheduling the next review: absent or malformed means `now`.
pub fn review_baseline(last_reviewed: Option<&Timestamp>, now: DateTime<Utc>) -> DateTime<Utc> {
    last_reviewed.and_then(Timestamp::instant).unwrap_or(now)
}

/// Whether a record with the given review date is due at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due, overdue by this many whole days.
    Due { days_overdue: i64 },
    /// Scheduled in the future.
    NotDue,
}

/// Classify a review date against `now`. Malformed dates are treated as due
/// with [`UNPARSEABLE_DAYS_OVERDUE`].
pub fn due_status(next_review: &Timestamp, now: DateTime<Utc>) -> DueStatus {
    match next_review {
        Timestamp::Malformed(_) => DueStatus::Due {
            days_overdue: UNPARSEABLE_DAYS_OVERDUE,
        },
        Timestamp::At(at) if *at <= now => DueStatus::Due {
            days_overdue: (now - *at).num_days(),
        },
        Timestamp::At(_) => DueStatus::NotDue,
    }
}
