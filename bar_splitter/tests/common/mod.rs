#![allow(dead_code)]

use bar_splitter::{Frame, Timestamp};
use chrono::{DateTime, Days, Duration, NaiveDate, Utc};

/// 2024-01-01T00:00:00Z, a Monday.
pub fn origin() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).expect("origin")
}

/// Parse any timestamp text the crate understands.
pub fn ts(s: &str) -> Timestamp {
    s.parse().expect("timestamp")
}

/// Date-time `secs` seconds after [`origin`].
pub fn at(secs: i64) -> Timestamp {
    Timestamp::DateTime(origin() + Duration::seconds(secs))
}

/// Date `days` days after 2024-01-01.
pub fn day(days: u64) -> Timestamp {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("start date");
    Timestamp::Date(start.checked_add_days(Days::new(days)).expect("date"))
}

pub fn tick(s: &str, v: u32) -> Frame<u32> {
    Frame::single(ts(s), v)
}

/// A frame whose row values are their positions, so bars can be checked for
/// drops and duplicates.
pub fn numbered(stamps: &[Timestamp]) -> Frame<u32> {
    stamps
        .iter()
        .zip(0u32..)
        .map(|(ts, i)| (*ts, i))
        .collect()
}
