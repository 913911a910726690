//! Errors raised while analyzing an event log or querying its statistics.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ValidationError;

/// Why a log line could not be turned into an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatIssue {
    /// The line did not split into timestamp, object, user and event type.
    #[error("expected 4 whitespace-separated fields, found {0}")]
    FieldCount(usize),

    /// The timestamp is not ISO 8601.
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    /// The user ID is the one reserved for users without history.
    #[error("user id \"-1\" is reserved for new users")]
    ReservedUserId,

    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    Encoding,
}

/// Population-level aggregates that are normalized as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    /// Every recognized event in the log.
    General,
    /// Events of users classified as inactive.
    Inactive,
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => f.write_str("general"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// Errors from the analysis engine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A log line is malformed. Only returned in fail-fast mode; otherwise
    /// the line is skipped and counted.
    #[error("malformed event on line {line}: {issue}")]
    Format { line: usize, issue: FormatIssue },

    /// The log could not be opened or read.
    #[error("failed to read event log {}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No object history is tracked for the user.
    #[error("no object preference recorded for user {user_id}")]
    NotFound { user_id: String },

    /// An aggregate had no actions to normalize. Only returned in fail-fast mode.
    #[error("{0} aggregate has no recorded actions")]
    EmptyAggregate(AggregateKind),

    /// The second pass saw a different log than the first.
    #[error("event log changed between passes: {0}")]
    LogChanged(String),

    /// Analysis settings are out of range.
    #[error(transparent)]
    InvalidSettings(#[from] ValidationError),
}
