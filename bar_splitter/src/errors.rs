//! Error types for splitting, rule parsing and configuration.

use thiserror::Error;

use crate::{
    rule::BoundaryRule,
    timestamp::{Timestamp, TimestampKind},
};

/// The unified error type for the `bar_splitter` crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `add_one` was handed a container that does not hold exactly one row.
    #[error("Invalid input: expected exactly one row, got {rows}")]
    InvalidInput {
        /// Row count of the rejected container.
        rows: usize,
    },

    /// An accessor needing a current bar was called before the first observation.
    #[error("Empty state: no bar has been opened yet")]
    EmptyState,

    /// The rule cannot compute a window for this kind of timestamp.
    #[error("Unsupported operation: rule {rule} cannot bucket {kind} timestamps")]
    UnsupportedOperation {
        /// The rule that was asked.
        rule: BoundaryRule,
        /// Kind of the offending timestamp.
        kind: TimestampKind,
    },

    /// An observation arrived earlier than the previous one.
    #[error("Out-of-order observation: {got} arrived after {last}")]
    OutOfOrder {
        /// Timestamp of the last accepted observation.
        last: Timestamp,
        /// Timestamp of the rejected observation.
        got: Timestamp,
    },

    /// A rule amount is zero, or (for sub-day rules) does not divide 60 seconds,
    /// 60 minutes or 24 hours, which would make consecutive windows overlap;
    /// or the rule text could not be parsed.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Timestamp text could not be parsed.
    #[error("Invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The text that failed to parse.
        input: String,
        /// Why it failed.
        reason: String,
    },

    /// Window arithmetic left the representable calendar range.
    #[error("Window for {0} is outside the representable range")]
    OutOfRange(Timestamp),
}

/// Errors related to loading a [`SplitConfig`](crate::config::SplitConfig) from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the splitter is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Shorthand result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
