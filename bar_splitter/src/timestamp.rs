//! Tagged timestamps for the two kinds of streams a splitter can consume.
//!
//! Sub-day rules (second/minute/hour) bucket full UTC date-times; calendar rules
//! (week/month/year) bucket plain dates whose text form is `YYYYMMDD`. Keeping
//! both behind one [`Timestamp`] type lets a [`BarSplitter`](crate::BarSplitter)
//! check the kind of every observation instead of silently mixing the two.
//!
//! Parsing rules for [`Timestamp::from_str`]:
//! - exactly eight ASCII digits -> [`Timestamp::Date`], e.g. `"20240215"`
//!   (or a `+`/`-` sign and a longer year, e.g. `"+100000101"`)
//! - RFC-3339 with an offset -> [`Timestamp::DateTime`], converted to UTC,
//!   e.g. `"2024-03-10T09:30:00-05:00"` -> `2024-03-10T14:30:00Z`
//! - naive `"2024-03-10 09:30:00"` or `"2024-03-10T09:30:00.250"` -> UTC date-time
//!
//! Timestamps of the same kind are totally ordered; a date and a date-time are
//! incomparable (`partial_cmp` returns `None`).

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::errors::{Error, Result};

/// `strftime` pattern for date-only timestamps.
pub const DATE_FORMAT: &str = "%Y%m%d";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Which representation a [`Timestamp`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampKind {
    /// Full UTC date-time.
    DateTime,
    /// Calendar date without a time of day.
    Date,
}

impl fmt::Display for TimestampKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampKind::DateTime => f.write_str("date-time"),
            TimestampKind::Date => f.write_str("date"),
        }
    }
}

/// A point in time as seen by the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// UTC instant, used by sub-day rules.
    DateTime(DateTime<Utc>),
    /// Calendar date, used by week/month/year rules.
    Date(NaiveDate),
}

impl Timestamp {
    /// The representation tag of this timestamp.
    pub const fn kind(&self) -> TimestampKind {
        match self {
            Timestamp::DateTime(_) => TimestampKind::DateTime,
            Timestamp::Date(_) => TimestampKind::Date,
        }
    }

    /// Parse a strict `YYYYMMDD` date.
    ///
    /// Years outside `0..=9999` take the signed form [`Display`](fmt::Display)
    /// writes for them, e.g. `"+100000101"` or `"-00010101"`.
    pub fn parse_date(s: &str) -> Result<Self> {
        let (negative, digits) =
            compact_date_digits(s).ok_or_else(|| invalid(s, "expected 8 digits (YYYYMMDD)"))?;
        let (year, month_day) = digits.split_at(digits.len() - 4);
        let (month, day) = month_day.split_at(2);
        let year: i32 = year.parse().map_err(|e| invalid(s, e))?;
        let month: u32 = month.parse().map_err(|e| invalid(s, e))?;
        let day: u32 = day.parse().map_err(|e| invalid(s, e))?;
        NaiveDate::from_ymd_opt(if negative { -year } else { year }, month, day)
            .map(Timestamp::Date)
            .ok_or_else(|| invalid(s, "no such calendar date"))
    }

    /// The UTC instant, if this is a date-time.
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::DateTime(dt) => Some(*dt),
            Timestamp::Date(_) => None,
        }
    }

    /// The calendar date, if this is date-only.
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Timestamp::Date(d) => Some(*d),
            Timestamp::DateTime(_) => None,
        }
    }
}

/// `(negative, digits)` for `YYYYMMDD`, or `[+-]Y{4,}MMDD` as chrono writes
/// years past 9999 or before 0.
fn compact_date_digits(s: &str) -> Option<(bool, &str)> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'+' => (false, &s[1..]),
        b'-' => (true, &s[1..]),
        _ => (false, s),
    };
    let len_ok = if digits.len() < s.len() {
        digits.len() >= 8
    } else {
        digits.len() == 8
    };
    (len_ok && digits.bytes().all(|b| b.is_ascii_digit())).then_some((negative, digits))
}

fn invalid(input: &str, reason: impl fmt::Display) -> Error {
    Error::InvalidTimestamp {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::DateTime(dt)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(d: NaiveDate) -> Self {
        Timestamp::Date(d)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Timestamp::DateTime(a), Timestamp::DateTime(b)) => Some(a.cmp(b)),
            (Timestamp::Date(a), Timestamp::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::DateTime(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Timestamp::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if compact_date_digits(s).is_some() {
            return Self::parse_date(s);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::DateTime(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Timestamp::DateTime(naive.and_utc()))
            .ok_or_else(|| invalid(s, "expected YYYYMMDD, RFC-3339 or YYYY-MM-DD HH:MM:SS"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
