//! Per-user answers with fallbacks for sparse or missing history.
//!
//! Hourly and type queries resolve through an ordered [`FallbackChain`]:
//! each rule either yields an answer for a known user or passes, and the
//! chain's default covers unknown users (including [`SENTINEL_USER`]).
//!
//! | query | rule 1 | rule 2 | default |
//! |---|---|---|---|
//! | hourly | own distribution, own rate | population distribution, own rate | population distribution, population average rate |
//! | types | own distribution | - | population distribution |
//!
//! Object preference has no fallback.

use serde::{Deserialize, Serialize};

use crate::distribution::{HourlyDistribution, TypeDistributionVector};
use crate::error::AnalysisError;
use crate::normalize::{Normalized, guarded_divide};
use crate::statistics::Statistics;

/// Identifier standing for a brand-new user with no history.
pub const SENTINEL_USER: &str = "-1";

/// Which data an answer was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    /// The user's own second-pass profile.
    Own,
    /// Population distribution, scaled by the user's own activity.
    PopulationWithOwnRate,
    /// Population distribution and averages.
    Population,
}

/// When a user acts, and how often.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyActionRate {
    pub user_id: String,
    /// Actions per unit of time.
    pub daily_rate: Normalized<f64>,
    pub distribution: Normalized<HourlyDistribution>,
    pub source: ProfileSource,
}

/// What kinds of action a user takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistribution {
    pub user_id: String,
    pub distribution: Normalized<TypeDistributionVector>,
    pub source: ProfileSource,
}

/// Which objects a user acts on; `object_ids[i]` has `probabilities[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPreference {
    pub user_id: String,
    pub object_ids: Vec<String>,
    pub probabilities: Vec<f64>,
}

impl ObjectPreference {
    /// A preference over no objects, for users without history.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            object_ids: Vec::new(),
            probabilities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.object_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.object_ids
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    /// Total probability mass.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

/// A rule that answers for a known user, or passes to the next rule.
pub struct FallbackRule<T> {
    pub source: ProfileSource,
    pub resolve: fn(&Statistics, usize) -> Option<T>,
}

/// Rules tried top-down, then a default that always answers.
pub struct FallbackChain<T: 'static> {
    pub rules: &'static [FallbackRule<T>],
    pub default_source: ProfileSource,
    pub default: fn(&Statistics) -> T,
}

impl<T: 'static> FallbackChain<T> {
    /// Resolves for `user_idx`, or straight to the default for unknown users.
    pub fn resolve(&self, stats: &Statistics, user_idx: Option<usize>) -> (ProfileSource, T) {
        user_idx
            .and_then(|idx| {
                self.rules
                    .iter()
                    .find_map(|rule| (rule.resolve)(stats, idx).map(|value| (rule.source, value)))
            })
            .unwrap_or_else(|| (self.default_source, (self.default)(stats)))
    }
}

/// Daily rate and hourly distribution.
pub type HourlyAnswer = (Normalized<f64>, Normalized<HourlyDistribution>);

pub static HOURLY_CHAIN: FallbackChain<HourlyAnswer> = FallbackChain {
    rules: &[
        FallbackRule {
            source: ProfileSource::Own,
            resolve: own_hourly,
        },
        FallbackRule {
            source: ProfileSource::PopulationWithOwnRate,
            resolve: population_hourly_own_rate,
        },
    ],
    default_source: ProfileSource::Population,
    default: population_hourly,
};

pub static TYPE_CHAIN: FallbackChain<Normalized<TypeDistributionVector>> = FallbackChain {
    rules: &[FallbackRule {
        source: ProfileSource::Own,
        resolve: own_types,
    }],
    default_source: ProfileSource::Population,
    default: population_types,
};

#[allow(clippy::cast_precision_loss)]
fn own_rate(stats: &Statistics, idx: usize) -> Normalized<f64> {
    guarded_divide(
        stats.users.count(idx) as f64,
        stats.thresholds.analysis_window_length(),
    )
}

fn own_hourly(stats: &Statistics, idx: usize) -> Option<HourlyAnswer> {
    let profile = stats.user_profiles[idx].as_ref()?;
    Some((own_rate(stats, idx), profile.hourly))
}

fn population_hourly_own_rate(stats: &Statistics, idx: usize) -> Option<HourlyAnswer> {
    Some((own_rate(stats, idx), stats.general.hourly))
}

fn population_hourly(stats: &Statistics) -> HourlyAnswer {
    (stats.average_daily_activity(), stats.general.hourly)
}

fn own_types(stats: &Statistics, idx: usize) -> Option<Normalized<TypeDistributionVector>> {
    stats.user_profiles[idx].as_ref().map(|profile| profile.types)
}

fn population_types(stats: &Statistics) -> Normalized<TypeDistributionVector> {
    stats.general.types
}

impl Statistics {
    /// Hourly action distribution and rate of a user.
    pub fn hourly_action_rate(&self, user_id: &str) -> HourlyActionRate {
        let (source, (daily_rate, distribution)) =
            HOURLY_CHAIN.resolve(self, self.user_index(user_id));
        HourlyActionRate {
            user_id: user_id.to_string(),
            daily_rate,
            distribution,
            source,
        }
    }

    /// Event-type distribution of a user.
    pub fn type_distribution(&self, user_id: &str) -> TypeDistribution {
        let (source, distribution) = TYPE_CHAIN.resolve(self, self.user_index(user_id));
        TypeDistribution {
            user_id: user_id.to_string(),
            distribution,
            source,
        }
    }

    /// Object preference of a user with tracked object history.
    pub fn object_preference(&self, user_id: &str) -> Result<ObjectPreference, AnalysisError> {
        let preference = self
            .user_index(user_id)
            .and_then(|idx| self.user_preferences[idx].as_ref())
            .ok_or_else(|| AnalysisError::NotFound {
                user_id: user_id.to_string(),
            })?;

        let (object_ids, probabilities) = preference
            .iter()
            .map(|&(object_idx, p)| (self.objects.id(object_idx).to_string(), p))
            .unzip();
        Ok(ObjectPreference {
            user_id: user_id.to_string(),
            object_ids,
            probabilities,
        })
    }
}
