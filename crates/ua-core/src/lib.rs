//! Behavioral statistics from a log of user actions on shared objects.
//!
//! This crate contains the two-pass engine that turns an event log into:
//! - Activity tiers: active, regular and inactive users
//! - Hourly action-rate distributions (24 buckets)
//! - Event-type distributions (7 buckets)
//! - Per-user object preference distributions
//!
//! [`analyze`] returns an owned [`Statistics`] value that answers per-user
//! queries, falling back to population data for users with little or no
//! history.

mod distribution;
mod engine;
mod error;
pub mod event;
pub mod event_type;
mod identity;
pub mod normalize;
mod preference;
pub mod query;
mod reader;
mod statistics;
pub mod tier;
mod types;

pub use distribution::{
    ActivityCounts, BucketCounts, Distribution, DistributionAccumulator, HourlyDistribution,
    TypeDistributionVector,
};
pub use engine::analyze;
pub use error::{AggregateKind, AnalysisError, FormatIssue};
pub use event::{EventRecord, HOURLY_BUCKETS, hour_from_timestamp, parse_line};
pub use event_type::{EventType, TYPE_BUCKETS, UnknownEventType};
pub use identity::IdTable;
pub use normalize::{AggregateProfile, Normalized, guarded_divide};
pub use preference::ObjectPreferenceTracker;
pub use query::{
    HourlyActionRate, ObjectPreference, ProfileSource, SENTINEL_USER, TypeDistribution,
};
pub use reader::{EventLogReader, EventScan, ScanCounts, ScanError};
pub use statistics::{ScanReport, Statistics, TierStats, TierSummary};
pub use tier::{Tier, classify};
pub use types::{ActivityThresholds, AnalysisSettings, ValidationError};
