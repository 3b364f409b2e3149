//! Online time-bucketing of tick streams into bars.
//!
//! A [`BarSplitter`] consumes a time-ordered stream of one-row tables and groups
//! them into contiguous, non-overlapping `[begin, end)` windows. Window
//! boundaries come from a [`BoundaryRule`]: fixed seconds, minutes or hours for
//! date-time streams, and calendar weeks, months or years for `YYYYMMDD` date
//! streams.
//!
//! ```
//! use bar_splitter::{BarSplitter, BoundaryRule, Frame, Timestamp};
//!
//! let mut splitter = BarSplitter::new(BoundaryRule::minutes(5).unwrap());
//! for (ts, px) in [("2024-01-02 10:07:32", 10.0), ("2024-01-02 10:09:59", 10.5), ("2024-01-02 10:10:00", 11.0)] {
//!     let ts: Timestamp = ts.parse().unwrap();
//!     splitter.add_one(&Frame::single(ts, px)).unwrap();
//! }
//! assert_eq!(splitter.len(), 2);
//! assert_eq!(splitter.bars()[0].data().values(), &[10.0, 10.5]);
//! ```
//!
//! The splitter only groups rows; computing OHLC or volume from a bar is left
//! to the caller.

#![warn(missing_docs)]

pub mod bar;
pub mod config;
pub mod errors;
pub mod rule;
pub mod splitter;
pub mod table;
pub mod timestamp;

pub use bar::Bar;
pub use config::{SplitConfig, load_config_path, load_config_str};
pub use errors::{ConfigError, Error, Result};
pub use rule::BoundaryRule;
pub use splitter::{BarSplitter, OrderPolicy};
pub use table::{Frame, Rows, TimeTable};
pub use timestamp::{Timestamp, TimestampKind};
