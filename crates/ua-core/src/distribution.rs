//! Hourly and event-type counters and the distributions made from them.
//!
//! Counting happens in two surfaces: the population (every recognized event
//! of the first pass) and the second pass, which feeds either the inactive
//! cluster or a per-user counter depending on the user's tier.

use serde::{Deserialize, Serialize};

use crate::event::{EventRecord, HOURLY_BUCKETS};
use crate::event_type::TYPE_BUCKETS;
use crate::types::ValidationError;

/// Fixed-width bucket counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCounts<const N: usize>([u64; N]);

impl<const N: usize> Default for BucketCounts<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> BucketCounts<N> {
    /// Adds one to bucket `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= N`.
    pub fn increment(&mut self, idx: usize) {
        self.0[idx] += 1;
    }

    pub const fn counts(&self) -> &[u64; N] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

/// Probability mass over `N` buckets.
///
/// Serialized as a plain list of probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Distribution<const N: usize>([f64; N]);

/// Distribution over the 24 hours of a day.
pub type HourlyDistribution = Distribution<HOURLY_BUCKETS>;

/// Distribution over the recognized event types, in [`EventType`](crate::EventType) order.
pub type TypeDistributionVector = Distribution<TYPE_BUCKETS>;

impl<const N: usize> Distribution<N> {
    pub(crate) const fn from_array(probabilities: [f64; N]) -> Self {
        Self(probabilities)
    }

    pub const fn probabilities(&self) -> &[f64; N] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Index of the most probable bucket; the first one wins ties.
    pub fn mode(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &p) in self.0.iter().enumerate() {
            if best.is_none_or(|(_, max)| p > max) {
                best = Some((idx, p));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl<const N: usize> std::ops::Index<usize> for Distribution<N> {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl<const N: usize> TryFrom<Vec<f64>> for Distribution<N> {
    type Error = ValidationError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        let actual = value.len();
        let probabilities: [f64; N] = value
            .try_into()
            .map_err(|_| ValidationError::BucketCount { expected: N, actual })?;
        Ok(Self(probabilities))
    }
}

impl<const N: usize> From<Distribution<N>> for Vec<f64> {
    fn from(distribution: Distribution<N>) -> Self {
        distribution.0.to_vec()
    }
}

/// Hourly and type counters for one stream of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    hourly: BucketCounts<HOURLY_BUCKETS>,
    types: BucketCounts<TYPE_BUCKETS>,
    total: u64,
}

impl ActivityCounts {
    pub fn record(&mut self, event: &EventRecord) {
        self.hourly.increment(usize::from(event.hour));
        self.types.increment(event.event_type.index());
        self.total += 1;
    }

    pub const fn hourly(&self) -> &BucketCounts<HOURLY_BUCKETS> {
        &self.hourly
    }

    pub const fn types(&self) -> &BucketCounts<TYPE_BUCKETS> {
        &self.types
    }

    /// Number of events recorded.
    pub const fn total(&self) -> u64 {
        self.total
    }
}

/// Running hourly/type counts for the population, the inactive cluster and
/// each individually tracked user.
#[derive(Debug, Clone, Default)]
pub struct DistributionAccumulator {
    population: ActivityCounts,
    inactive: ActivityCounts,
    per_user: Vec<Option<ActivityCounts>>,
}

impl DistributionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a first-pass event towards the population.
    pub fn record_population(&mut self, event: &EventRecord) {
        self.population.record(event);
    }

    /// Counts a second-pass event of an inactive user towards the cluster.
    pub fn record_inactive(&mut self, event: &EventRecord) {
        self.inactive.record(event);
    }

    /// Counts a second-pass event of a tracked user, creating the user's
    /// counters on first use.
    pub fn record_user(&mut self, user_idx: usize, event: &EventRecord) {
        if self.per_user.len() <= user_idx {
            self.per_user.resize_with(user_idx + 1, || None);
        }
        self.per_user[user_idx]
            .get_or_insert_with(ActivityCounts::default)
            .record(event);
    }

    pub const fn population(&self) -> &ActivityCounts {
        &self.population
    }

    pub const fn inactive(&self) -> &ActivityCounts {
        &self.inactive
    }

    pub fn user(&self, user_idx: usize) -> Option<&ActivityCounts> {
        self.per_user.get(user_idx).and_then(Option::as_ref)
    }

    /// Tracked users with their counters, by user index.
    pub fn users(&self) -> impl Iterator<Item = (usize, &ActivityCounts)> {
        self.per_user
            .iter()
            .enumerate()
            .filter_map(|(idx, counts)| counts.as_ref().map(|c| (idx, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_type::EventType;

    fn event(hour: u8, event_type: EventType) -> EventRecord {
        EventRecord {
            timestamp: format!("2015-01-01T{hour:02}:00:00Z"),
            hour,
            object_id: "repo".to_string(),
            user_id: "user".to_string(),
            event_type,
        }
    }

    #[test]
    fn activity_counts_track_hour_and_type() {
        let mut counts = ActivityCounts::default();
        counts.record(&event(10, EventType::Push));
        counts.record(&event(10, EventType::Fork));
        counts.record(&event(23, EventType::Push));

        assert_eq!(counts.total(), 3);
        assert_eq!(counts.hourly().counts()[10], 2);
        assert_eq!(counts.hourly().counts()[23], 1);
        assert_eq!(counts.types().counts()[EventType::Push.index()], 2);
        assert_eq!(counts.types().counts()[EventType::Fork.index()], 1);
        assert_eq!(counts.hourly().total(), counts.types().total());
    }

    #[test]
    fn per_user_counters_are_created_lazily() {
        let mut acc = DistributionAccumulator::new();
        assert!(acc.user(3).is_none());

        acc.record_user(3, &event(1, EventType::Watch));
        acc.record_user(3, &event(2, EventType::Watch));
        acc.record_user(0, &event(2, EventType::Create));

        assert_eq!(acc.user(3).map(ActivityCounts::total), Some(2));
        assert_eq!(acc.user(0).map(ActivityCounts::total), Some(1));
        assert!(acc.user(1).is_none());
        let tracked: Vec<_> = acc.users().map(|(idx, _)| idx).collect();
        assert_eq!(tracked, [0, 3]);
    }

    #[test]
    fn surfaces_are_independent() {
        let mut acc = DistributionAccumulator::new();
        acc.record_population(&event(5, EventType::Issues));
        acc.record_population(&event(6, EventType::Issues));
        acc.record_inactive(&event(5, EventType::Delete));

        assert_eq!(acc.population().total(), 2);
        assert_eq!(acc.inactive().total(), 1);
        assert_eq!(acc.users().count(), 0);
    }

    #[test]
    fn distribution_rejects_wrong_bucket_count() {
        let err = Distribution::<7>::try_from(vec![0.5, 0.5]).unwrap_err();
        assert_eq!(err, ValidationError::BucketCount { expected: 7, actual: 2 });
    }

    #[test]
    fn distribution_serializes_as_list() {
        let dist = Distribution::from_array([0.25, 0.75, 0.0]);
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, "[0.25,0.75,0.0]");
        let parsed: Distribution<3> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dist);
        assert!(serde_json::from_str::<Distribution<4>>(&json).is_err());
    }

    #[test]
    fn mode_prefers_first_maximum() {
        let dist = Distribution::from_array([0.1, 0.45, 0.45]);
        assert_eq!(dist.mode(), Some(1));
        assert_eq!(Distribution::<0>::from_array([]).mode(), None);
    }
}
