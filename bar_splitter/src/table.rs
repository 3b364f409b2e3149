//! Time-indexed tabular containers.
//!
//! The splitter never looks inside a row; it only needs the time index, the
//! ability to slice out one row, and the ability to append rows. [`TimeTable`]
//! captures exactly that, and [`Frame`] is the in-crate implementation used when
//! the caller has no container of their own.

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// A container of rows indexed by [`Timestamp`].
///
/// Implementations must keep `index().len() == len()`.
pub trait TimeTable: Clone {
    /// Number of rows.
    fn len(&self) -> usize;

    /// `true` when the table holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time index, one entry per row, in row order.
    fn index(&self) -> &[Timestamp];

    /// A one-row table holding the row at `pos`.
    fn row(&self, pos: usize) -> Option<Self>;

    /// Append every row of `other` after the existing rows.
    fn merge(&mut self, other: &Self);

    /// Iterate over the rows as one-row tables.
    fn rows(&self) -> Rows<'_, Self> {
        Rows {
            table: self,
            pos: 0,
        }
    }
}

/// Iterator returned by [`TimeTable::rows`].
#[derive(Debug, Clone)]
pub struct Rows<'a, T> {
    table: &'a T,
    pos: usize,
}

impl<T: TimeTable> Iterator for Rows<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let row = self.table.row(self.pos)?;
        self.pos += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.table.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

/// A column-of-rows container: parallel time index and values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame<R> {
    index: Vec<Timestamp>,
    values: Vec<R>,
}

impl<R> Default for Frame<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Frame<R> {
    /// An empty frame.
    pub const fn new() -> Self {
        Self {
            index: Vec::new(),
            values: Vec::new(),
        }
    }

    /// A frame holding one row, the usual shape of a tick.
    pub fn single(ts: Timestamp, value: R) -> Self {
        Self {
            index: vec![ts],
            values: vec![value],
        }
    }

    /// Append one row.
    pub fn push(&mut self, ts: Timestamp, value: R) {
        self.index.push(ts);
        self.values.push(value);
    }

    /// Row values in order.
    pub fn values(&self) -> &[R] {
        &self.values
    }

    /// `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Timestamp, &R)> {
        self.index.iter().zip(&self.values)
    }
}

impl<R> FromIterator<(Timestamp, R)> for Frame<R> {
    fn from_iter<I: IntoIterator<Item = (Timestamp, R)>>(iter: I) -> Self {
        let (index, values) = iter.into_iter().unzip();
        Self { index, values }
    }
}

impl<R: Clone> TimeTable for Frame<R> {
    fn len(&self) -> usize {
        self.index.len()
    }

    fn index(&self) -> &[Timestamp] {
        &self.index
    }

    fn row(&self, pos: usize) -> Option<Self> {
        let ts = *self.index.get(pos)?;
        let value = self.values.get(pos)?.clone();
        Some(Self::single(ts, value))
    }

    fn merge(&mut self, other: &Self) {
        self.index.extend_from_slice(&other.index);
        self.values.extend_from_slice(&other.values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn rows_yield_single_row_frames() {
        let frame: Frame<i32> = [(ts("20240101"), 1), (ts("20240102"), 2)]
            .into_iter()
            .collect();
        let rows: Vec<_> = frame.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], Frame::single(ts("20240102"), 2));
        assert_eq!(frame.rows().size_hint(), (2, Some(2)));
        assert!(frame.row(2).is_none());
    }

    #[test]
    fn merge_appends_in_order() {
        let mut a = Frame::single(ts("20240101"), "a");
        let b: Frame<_> = [(ts("20240102"), "b"), (ts("20240103"), "c")]
            .into_iter()
            .collect();
        a.merge(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.values(), &["a", "b", "c"]);
        assert_eq!(a.index()[2], ts("20240103"));
    }

    #[test]
    fn empty_frame() {
        let f: Frame<u8> = Frame::new();
        assert!(f.is_empty());
        assert_eq!(f.rows().count(), 0);
        assert_eq!(f.iter().count(), 0);
        assert_eq!(f, Frame::default());
    }

    #[test]
    fn iter_pairs_timestamps_with_values() {
        let mut f = Frame::new();
        f.push(ts("20240101"), 'x');
        f.push(ts("20240102"), 'y');
        let pairs: Vec<_> = f.iter().map(|(t, v)| (*t, *v)).collect();
        assert_eq!(pairs, vec![(ts("20240101"), 'x'), (ts("20240102"), 'y')]);
    }
}
