//! One window's worth of observations.

use crate::{table::TimeTable, timestamp::Timestamp};

/// Rows grouped into a single `[begin, end)` window.
///
/// A bar owns its container; it is only ever grown by the
/// [`BarSplitter`](crate::BarSplitter) while it is the current bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar<T> {
    pub(crate) data: T,
    pub(crate) begin: Timestamp,
    pub(crate) end: Timestamp,
}

impl<T> Bar<T> {
    /// The rows of this bar.
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Inclusive window start.
    pub const fn begin(&self) -> Timestamp {
        self.begin
    }

    /// Exclusive window end.
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether `ts` falls inside `[begin, end)`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.begin <= ts && ts < self.end
    }

    /// Consume the bar, keeping only its rows.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: TimeTable> Bar<T> {
    /// Number of rows in the bar.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the bar holds no rows (never the case for bars built by a splitter).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
