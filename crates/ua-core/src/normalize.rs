//! Conversion of raw counts into probability distributions.
//!
//! Every division goes through [`guarded_divide`]: a zero denominator yields
//! [`Normalized::Undefined`] instead of NaN or infinity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distribution::{ActivityCounts, BucketCounts, Distribution};
use crate::event::HOURLY_BUCKETS;
use crate::event_type::TYPE_BUCKETS;

/// A value computed by division, or the marker for a zero denominator.
///
/// `Undefined` is distinct from a legitimate all-zero distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalized<T> {
    Defined(T),
    Undefined,
}

impl<T> Normalized<T> {
    pub const fn defined(&self) -> Option<&T> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined => None,
        }
    }

    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Normalized<U> {
        match self {
            Self::Defined(value) => Normalized::Defined(f(value)),
            Self::Undefined => Normalized::Undefined,
        }
    }
}

/// Divides, returning `Undefined` when the denominator is zero.
pub fn guarded_divide(numerator: f64, denominator: f64) -> Normalized<f64> {
    if denominator == 0.0 {
        Normalized::Undefined
    } else {
        Normalized::Defined(numerator / denominator)
    }
}

/// Divides every bucket by `total`.
#[allow(clippy::cast_precision_loss)]
pub fn normalize_counts<const N: usize>(
    counts: &BucketCounts<N>,
    total: u64,
) -> Normalized<Distribution<N>> {
    if total == 0 {
        return Normalized::Undefined;
    }
    let total = total as f64;
    let mut probabilities = [0.0; N];
    for (p, &count) in probabilities.iter_mut().zip(counts.counts()) {
        *p = count as f64 / total;
    }
    Normalized::Defined(Distribution::from_array(probabilities))
}

/// Divides every per-object touch count by `total`, keeping key order.
#[allow(clippy::cast_precision_loss)]
pub fn normalize_touches(
    touches: &BTreeMap<usize, u64>,
    total: u64,
) -> Normalized<Vec<(usize, f64)>> {
    if total == 0 {
        return Normalized::Undefined;
    }
    let total = total as f64;
    Normalized::Defined(
        touches
            .iter()
            .map(|(&object_idx, &count)| (object_idx, count as f64 / total))
            .collect(),
    )
}

/// Hourly and type distributions of one aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateProfile {
    pub hourly: Normalized<Distribution<HOURLY_BUCKETS>>,
    pub types: Normalized<Distribution<TYPE_BUCKETS>>,
    /// Number of actions the distributions were built from.
    pub total_action_count: u64,
}

impl AggregateProfile {
    /// Normalizes counts by the number of events they recorded.
    pub fn from_counts(counts: &ActivityCounts) -> Self {
        Self::with_total(counts, counts.total())
    }

    /// Normalizes counts by an externally known total.
    pub fn with_total(counts: &ActivityCounts, total: u64) -> Self {
        Self {
            hourly: normalize_counts(counts.hourly(), total),
            types: normalize_counts(counts.types(), total),
            total_action_count: total,
        }
    }

    pub const fn is_undefined(&self) -> bool {
        self.hourly.is_undefined()
    }
}
