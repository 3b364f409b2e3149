//! rule.rs — window boundary rules
//!
//! - Sub-day rules (second/minute/hour) truncate a UTC date-time field to a
//!   multiple of the amount and add a fixed duration.
//! - Week: Monday-aligned, seven days wide.
//! - Month / Year: calendar-aware; the end is the first day of the next month
//!   or year, never a fixed number of days.
//!
//! Amounts must divide their parent unit evenly (60 for seconds and minutes,
//! 24 for hours) so consecutive windows tile the day without overlapping.

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    timestamp::{Timestamp, TimestampKind},
};

/// How a splitter carves time into `[begin, end)` windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoundaryRule {
    /// `n`-second windows aligned to the minute.
    Second(NonZeroU32),
    /// `n`-minute windows aligned to the hour.
    Minute(NonZeroU32),
    /// `n`-hour windows aligned to the day (UTC).
    Hour(NonZeroU32),
    /// Monday-based calendar weeks.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl BoundaryRule {
    /// `n`-second windows; `n` must divide 60.
    pub fn seconds(n: u32) -> Result<Self> {
        sub_day_amount(n, 60, "second").map(BoundaryRule::Second)
    }

    /// `n`-minute windows; `n` must divide 60.
    pub fn minutes(n: u32) -> Result<Self> {
        sub_day_amount(n, 60, "minute").map(BoundaryRule::Minute)
    }

    /// `n`-hour windows; `n` must divide 24.
    pub fn hours(n: u32) -> Result<Self> {
        sub_day_amount(n, 24, "hour").map(BoundaryRule::Hour)
    }

    /// Timestamp kind this rule buckets.
    pub const fn kind(&self) -> TimestampKind {
        match self {
            BoundaryRule::Second(_) | BoundaryRule::Minute(_) | BoundaryRule::Hour(_) => {
                TimestampKind::DateTime
            }
            BoundaryRule::Week | BoundaryRule::Month | BoundaryRule::Year => TimestampKind::Date,
        }
    }

    /// Window width in units of the rule (always 1 for calendar rules).
    pub const fn amount(&self) -> u32 {
        match self {
            BoundaryRule::Second(n) | BoundaryRule::Minute(n) | BoundaryRule::Hour(n) => n.get(),
            BoundaryRule::Week | BoundaryRule::Month | BoundaryRule::Year => 1,
        }
    }

    /// Compute the half-open window `[begin, end)` containing `ts`.
    ///
    /// Pure and deterministic. Fails with [`Error::UnsupportedOperation`] when
    /// `ts` is not of [`Self::kind`], and with [`Error::OutOfRange`] if the window
    /// cannot be represented.
    pub fn compute_window(&self, ts: Timestamp) -> Result<(Timestamp, Timestamp)> {
        let out_of_range = || Error::OutOfRange(ts);
        match (*self, ts) {
            (BoundaryRule::Second(n), Timestamp::DateTime(dt)) => {
                let begin = floor_datetime(dt, dt.hour(), dt.minute(), floor_to(dt.second(), n));
                fixed_window(begin, Duration::seconds(i64::from(n.get()))).ok_or_else(out_of_range)
            }
            (BoundaryRule::Minute(n), Timestamp::DateTime(dt)) => {
                let begin = floor_datetime(dt, dt.hour(), floor_to(dt.minute(), n), 0);
                fixed_window(begin, Duration::minutes(i64::from(n.get()))).ok_or_else(out_of_range)
            }
            (BoundaryRule::Hour(n), Timestamp::DateTime(dt)) => {
                let begin = floor_datetime(dt, floor_to(dt.hour(), n), 0, 0);
                fixed_window(begin, Duration::hours(i64::from(n.get()))).ok_or_else(out_of_range)
            }
            (BoundaryRule::Week, Timestamp::Date(d)) => {
                let back = u64::from(d.weekday().num_days_from_monday());
                let begin = d.checked_sub_days(Days::new(back));
                date_window(begin, |b| b.checked_add_days(Days::new(7))).ok_or_else(out_of_range)
            }
            (BoundaryRule::Month, Timestamp::Date(d)) => {
                date_window(d.with_day(1), |b| b.checked_add_months(Months::new(1)))
                    .ok_or_else(out_of_range)
            }
            (BoundaryRule::Year, Timestamp::Date(d)) => {
                date_window(NaiveDate::from_ymd_opt(d.year(), 1, 1), |b| {
                    b.checked_add_months(Months::new(12))
                })
                .ok_or_else(out_of_range)
            }
            (rule, ts) => Err(Error::UnsupportedOperation {
                rule,
                kind: ts.kind(),
            }),
        }
    }
}

fn sub_day_amount(n: u32, parent: u32, unit: &str) -> Result<NonZeroU32> {
    let amount = NonZeroU32::new(n)
        .ok_or_else(|| Error::InvalidRule(format!("{unit} amount must be > 0")))?;
    if parent % n != 0 {
        return Err(Error::InvalidRule(format!(
            "{unit} amount {n} must divide {parent}"
        )));
    }
    Ok(amount)
}

const fn floor_to(value: u32, n: NonZeroU32) -> u32 {
    value / n.get() * n.get()
}

fn floor_datetime(dt: DateTime<Utc>, hour: u32, minute: u32, second: u32) -> Option<DateTime<Utc>> {
    dt.date_naive()
        .and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
}

fn fixed_window(
    begin: Option<DateTime<Utc>>,
    width: Duration,
) -> Option<(Timestamp, Timestamp)> {
    let begin = begin?;
    let end = begin.checked_add_signed(width)?;
    Some((Timestamp::DateTime(begin), Timestamp::DateTime(end)))
}

fn date_window(
    begin: Option<NaiveDate>,
    next: impl FnOnce(NaiveDate) -> Option<NaiveDate>,
) -> Option<(Timestamp, Timestamp)> {
    let begin = begin?;
    let end = next(begin)?;
    Some((Timestamp::Date(begin), Timestamp::Date(end)))
}

/// Display/parse for config ergonomics (`"15s"`, `"5m"`, `"4h"`, `"1W"`, `"1M"`, `"1Y"`)
impl fmt::Display for BoundaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self {
            BoundaryRule::Second(_) => "s",
            BoundaryRule::Minute(_) => "m",
            BoundaryRule::Hour(_) => "h",
            BoundaryRule::Week => "W",
            BoundaryRule::Month => "M",
            BoundaryRule::Year => "Y",
        };
        write!(f, "{}{u}", self.amount())
    }
}

impl FromStr for BoundaryRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(unit) = s.chars().last() else {
            return Err(Error::InvalidRule("empty rule".into()));
        };
        let digits = &s[..s.len() - unit.len_utf8()];
        // Only the canonical form `Display` writes: no sign, no leading zero.
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidRule(format!("bad amount in {s:?}")));
        }
        let amount: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidRule(format!("bad amount in {s:?}")))?;
        let calendar = |rule: BoundaryRule| {
            if amount == 1 {
                Ok(rule)
            } else {
                Err(Error::InvalidRule(format!(
                    "calendar rule {unit} only supports amount 1, got {amount}"
                )))
            }
        };
        match unit {
            's' => Self::seconds(amount),
            'm' => Self::minutes(amount),
            'h' => Self::hours(amount),
            'W' => calendar(BoundaryRule::Week),
            'M' => calendar(BoundaryRule::Month),
            'Y' => calendar(BoundaryRule::Year),
            _ => Err(Error::InvalidRule(format!("unknown unit: {unit}"))),
        }
    }
}

impl TryFrom<String> for BoundaryRule {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BoundaryRule> for String {
    fn from(rule: BoundaryRule) -> Self {
        rule.to_string()
    }
}
