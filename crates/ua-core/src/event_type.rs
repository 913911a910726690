//! The recognized event-type vocabulary.
//!
//! The declaration order of [`EventType`] is the bucket order of every type
//! distribution, so `CreateEvent` is bucket 0 and `WatchEvent` bucket 6.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of buckets in a type distribution.
pub const TYPE_BUCKETS: usize = 7;

/// Repository event kinds that contribute to the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Create,
    Delete,
    Fork,
    Issues,
    PullRequest,
    Push,
    Watch,
}

impl EventType {
    /// All recognized kinds in bucket order.
    pub const ALL: [Self; TYPE_BUCKETS] = [
        Self::Create,
        Self::Delete,
        Self::Fork,
        Self::Issues,
        Self::PullRequest,
        Self::Push,
        Self::Watch,
    ];

    /// Bucket index of this kind in a type distribution.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The name used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CreateEvent",
            Self::Delete => "DeleteEvent",
            Self::Fork => "ForkEvent",
            Self::Issues => "IssuesEvent",
            Self::PullRequest => "PullRequestEvent",
            Self::Push => "PushEvent",
            Self::Watch => "WatchEvent",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for event type strings outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}
