//! Online splitting of a tick stream into bars.
//!
//! A [`BarSplitter`] keeps every bar it has opened. The last one is the
//! *current* bar and is the only one that still grows; all earlier bars are
//! frozen. Each call to [`BarSplitter::add_one`] either merges the tick into the
//! current bar or, when the tick is at or past the current bar's end, opens a
//! new bar whose window comes from the configured [`BoundaryRule`].
//!
//! Windows are half-open: a tick stamped exactly at `end` starts the next bar.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    bar::Bar,
    config::SplitConfig,
    errors::{Error, Result},
    rule::BoundaryRule,
    table::TimeTable,
    timestamp::Timestamp,
};

/// What to do with a tick stamped earlier than the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Fail with [`Error::OutOfOrder`] and leave the splitter untouched.
    #[default]
    Reject,
    /// Accept it: merged into the current bar if before its end, otherwise
    /// it opens a new bar. Bars may then hold rows outside their window.
    BestEffort,
}

impl fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPolicy::Reject => f.write_str("reject"),
            OrderPolicy::BestEffort => f.write_str("best_effort"),
        }
    }
}

impl FromStr for OrderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "reject" => Ok(OrderPolicy::Reject),
            "best_effort" => Ok(OrderPolicy::BestEffort),
            other => Err(Error::InvalidRule(format!("unknown order policy: {other}"))),
        }
    }
}

/// Groups a time-ordered stream of one-row tables into bars.
#[derive(Debug, Clone)]
pub struct BarSplitter<T> {
    rule: BoundaryRule,
    order: OrderPolicy,
    bars: Vec<Bar<T>>,
    begin_times: Vec<Timestamp>,
    end_times: Vec<Timestamp>,
    last_seen: Option<Timestamp>,
}

impl<T: TimeTable> BarSplitter<T> {
    /// A splitter that rejects out-of-order ticks.
    pub fn new(rule: BoundaryRule) -> Self {
        Self::with_order_policy(rule, OrderPolicy::default())
    }

    /// A splitter with an explicit ordering policy.
    pub fn with_order_policy(rule: BoundaryRule, order: OrderPolicy) -> Self {
        Self {
            rule,
            order,
            bars: Vec::new(),
            begin_times: Vec::new(),
            end_times: Vec::new(),
            last_seen: None,
        }
    }

    /// A splitter built from a loaded [`SplitConfig`].
    pub fn from_config(config: &SplitConfig) -> Self {
        Self::with_order_policy(config.rule, config.order)
    }

    /// Add one tick.
    ///
    /// Returns `true` when the tick opened a new bar (the first tick, or one at
    /// or past the current bar's end) and `false` when it was merged into the
    /// current bar.
    ///
    /// Errors:
    /// - [`Error::InvalidInput`] if `data` does not hold exactly one row
    /// - [`Error::UnsupportedOperation`] if the tick's timestamp kind does not
    ///   match the rule
    /// - [`Error::OutOfOrder`] if the tick goes back in time under
    ///   [`OrderPolicy::Reject`]
    /// - [`Error::OutOfRange`] if the new window cannot be represented
    ///
    /// On error the splitter is left exactly as it was.
    pub fn add_one(&mut self, data: &T) -> Result<bool> {
        let ts = match data.index() {
            [ts] if data.len() == 1 => *ts,
            _ => return Err(Error::InvalidInput { rows: data.len() }),
        };
        if ts.kind() != self.rule.kind() {
            return Err(Error::UnsupportedOperation {
                rule: self.rule,
                kind: ts.kind(),
            });
        }
        if let Some(last) = self.last_seen.filter(|last| ts < *last) {
            match self.order {
                OrderPolicy::Reject => return Err(Error::OutOfOrder { last, got: ts }),
                OrderPolicy::BestEffort => {
                    warn!(%last, got = %ts, "accepting out-of-order tick");
                }
            }
        }

        if let Some(cur) = self.bars.last_mut().filter(|cur| ts < cur.end) {
            cur.data.merge(data);
            trace!(%ts, rows = cur.data.len(), "merged tick into current bar");
            self.last_seen = Some(ts);
            return Ok(false);
        }
        self.open_bar(data, ts)?;
        self.last_seen = Some(ts);
        Ok(true)
    }

    /// Add every row of `data` in order, as repeated [`Self::add_one`] calls.
    ///
    /// Returns how many bars were opened. Stops at the first failing row; rows
    /// before it stay applied.
    pub fn add_many(&mut self, data: &T) -> Result<usize> {
        let mut opened = 0;
        for row in data.rows() {
            if self.add_one(&row)? {
                opened += 1;
            }
        }
        Ok(opened)
    }

    fn open_bar(&mut self, data: &T, ts: Timestamp) -> Result<()> {
        let (begin, end) = self.rule.compute_window(ts)?;
        debug!(index = self.bars.len(), %begin, %end, "opened bar");
        self.bars.push(Bar {
            data: data.clone(),
            begin,
            end,
        });
        self.begin_times.push(begin);
        self.end_times.push(end);
        Ok(())
    }

    /// The most recently added row of the current bar, as a one-row table.
    pub fn last_data(&self) -> Result<T> {
        let cur = self.cur_bar()?;
        cur.data
            .len()
            .checked_sub(1)
            .and_then(|pos| cur.data.row(pos))
            .ok_or(Error::EmptyState)
    }
}

impl<T> BarSplitter<T> {
    /// The bar still receiving ticks.
    pub fn cur_bar(&self) -> Result<&Bar<T>> {
        self.bars.last().ok_or(Error::EmptyState)
    }

    /// Start of the current bar's window.
    pub fn cur_bar_begin_time(&self) -> Result<Timestamp> {
        self.cur_bar().map(Bar::begin)
    }

    /// Exclusive end of the current bar's window.
    pub fn cur_bar_end_time(&self) -> Result<Timestamp> {
        self.cur_bar().map(Bar::end)
    }

    /// Every bar opened so far, current one last.
    pub fn bars(&self) -> &[Bar<T>] {
        &self.bars
    }

    /// Window starts, parallel to [`Self::bars`].
    pub fn bar_begin_times(&self) -> &[Timestamp] {
        &self.begin_times
    }

    /// Window ends, parallel to [`Self::bars`].
    pub fn bar_end_times(&self) -> &[Timestamp] {
        &self.end_times
    }

    /// Number of bars opened so far.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// `true` until the first tick arrives.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The rule that computes windows.
    pub const fn rule(&self) -> BoundaryRule {
        self.rule
    }

    /// How out-of-order ticks are handled.
    pub const fn order_policy(&self) -> OrderPolicy {
        self.order
    }
}
