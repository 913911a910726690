//! Activity tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ActivityThresholds;

/// How much a user acts relative to the configured rate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Above the active threshold; modeled individually.
    Active,
    /// Below the inactive threshold; folded into the inactive cluster.
    Inactive,
    /// Everyone else.
    Regular,
}

impl Tier {
    pub const ALL: [Self; 3] = [Self::Active, Self::Regular, Self::Inactive];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns a tier from a user's total action count.
///
/// The active rule is checked first, so a count that satisfies both
/// rules (possible only when the inactive threshold exceeds the active
/// one) is active.
#[allow(clippy::cast_precision_loss)]
pub fn classify(total_action_count: u64, thresholds: &ActivityThresholds) -> Tier {
    let count = total_action_count as f64;
    let window = thresholds.analysis_window_length();

    if count > thresholds.active_threshold() * window {
        Tier::Active
    } else if count < thresholds.inactive_threshold() * window {
        Tier::Inactive
    } else {
        Tier::Regular
    }
}
