//! Finalized, read-only statistics of one analysis run.

use serde::Serialize;

use crate::error::AggregateKind;
use crate::event_type::EventType;
use crate::identity::IdTable;
use crate::normalize::{AggregateProfile, Normalized, guarded_divide};
use crate::tier::Tier;
use crate::types::ActivityThresholds;

/// Line and aggregate bookkeeping from the first pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub lines_read: usize,
    pub recognized_events: u64,
    pub unrecognized_lines: usize,
    pub malformed_lines: usize,
    /// Aggregates left undefined because they had no actions.
    pub undefined_aggregates: Vec<AggregateKind>,
}

/// Members and summed actions of one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub user_count: usize,
    pub total_action_count: u64,
}

/// Per-tier breakdown of the user population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub active: TierStats,
    pub regular: TierStats,
    pub inactive: TierStats,
}

impl TierSummary {
    pub const fn get(&self, tier: Tier) -> &TierStats {
        match tier {
            Tier::Active => &self.active,
            Tier::Regular => &self.regular,
            Tier::Inactive => &self.inactive,
        }
    }

    const fn get_mut(&mut self, tier: Tier) -> &mut TierStats {
        match tier {
            Tier::Active => &mut self.active,
            Tier::Regular => &mut self.regular,
            Tier::Inactive => &mut self.inactive,
        }
    }
}

/// Statistics produced by [`analyze`](crate::analyze).
///
/// Owned by the caller and never mutated after construction. Query methods
/// live in [`query`](crate::query).
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub(crate) thresholds: ActivityThresholds,
    pub(crate) users: IdTable,
    pub(crate) objects: IdTable,
    pub(crate) tiers: Vec<Tier>,
    pub(crate) general: AggregateProfile,
    pub(crate) inactive: AggregateProfile,
    /// Normalized hourly/type profile, for users tracked in the second pass.
    pub(crate) user_profiles: Vec<Option<AggregateProfile>>,
    /// Normalized object preference as `(object index, probability)`.
    pub(crate) user_preferences: Vec<Option<Vec<(usize, f64)>>>,
    pub(crate) report: ScanReport,
}

impl Statistics {
    pub const fn thresholds(&self) -> &ActivityThresholds {
        &self.thresholds
    }

    pub const fn report(&self) -> &ScanReport {
        &self.report
    }

    /// Dense index of a known user.
    ///
    /// Lines logged by [`SENTINEL_USER`](crate::SENTINEL_USER) are rejected
    /// while parsing, so the sentinel never resolves.
    pub(crate) fn user_index(&self, user_id: &str) -> Option<usize> {
        self.users.index_of(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Known users with their first-pass action counts, in first-seen order.
    pub fn user_ids(&self) -> impl Iterator<Item = (&str, u64)> {
        self.users.iter()
    }

    /// Known objects with their first-pass action counts, in first-seen order.
    pub fn object_ids(&self) -> impl Iterator<Item = (&str, u64)> {
        self.objects.iter()
    }

    /// The recognized event-type vocabulary, in bucket order.
    pub const fn event_types(&self) -> &'static [EventType] {
        &EventType::ALL
    }

    pub fn total_action_count(&self, user_id: &str) -> Option<u64> {
        self.user_index(user_id).map(|idx| self.users.count(idx))
    }

    pub fn tier(&self, user_id: &str) -> Option<Tier> {
        self.user_index(user_id).map(|idx| self.tiers[idx])
    }

    pub fn is_active(&self, user_id: &str) -> bool {
        self.tier(user_id) == Some(Tier::Active)
    }

    pub fn is_inactive(&self, user_id: &str) -> bool {
        self.tier(user_id) == Some(Tier::Inactive)
    }

    pub fn is_regular(&self, user_id: &str) -> bool {
        self.tier(user_id) == Some(Tier::Regular)
    }

    pub fn tier_summary(&self) -> TierSummary {
        let mut summary = TierSummary::default();
        for (idx, tier) in self.tiers.iter().enumerate() {
            let stats = summary.get_mut(*tier);
            stats.user_count += 1;
            stats.total_action_count += self.users.count(idx);
        }
        summary
    }

    /// Whether the user has an individual hourly/type profile.
    pub fn has_profile(&self, user_id: &str) -> bool {
        self.user_index(user_id)
            .is_some_and(|idx| self.user_profiles[idx].is_some())
    }

    /// Users with an individual hourly/type profile, in first-seen order.
    pub fn profiled_users(&self) -> impl Iterator<Item = &str> {
        self.user_profiles
            .iter()
            .enumerate()
            .filter(|(_, profile)| profile.is_some())
            .map(|(idx, _)| self.users.id(idx))
    }

    /// Population-wide distributions from the first pass.
    pub const fn general(&self) -> &AggregateProfile {
        &self.general
    }

    /// Distributions of the inactive cluster from the second pass.
    pub const fn inactive(&self) -> &AggregateProfile {
        &self.inactive
    }

    /// User with the most actions; the first seen wins ties.
    pub fn most_active_user(&self) -> Option<(&str, u64)> {
        self.users
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (id, count)| match best {
                Some((_, max)) if max >= count => best,
                _ => Some((id, count)),
            })
    }

    /// Mean actions per user per unit of time.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_daily_activity(&self) -> Normalized<f64> {
        guarded_divide(
            self.general.total_action_count as f64,
            self.users.len() as f64 * self.thresholds.analysis_window_length(),
        )
    }

    /// Mean actions per user over the whole window.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_actions_per_user(&self) -> Normalized<f64> {
        guarded_divide(
            self.general.total_action_count as f64,
            self.users.len() as f64,
        )
    }
}
