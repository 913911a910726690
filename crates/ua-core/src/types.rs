//! Analysis settings with validation.

use serde::Serialize;
use thiserror::Error;

/// Validation errors for analysis settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The analysis window must be a positive, finite length.
    #[error("analysis window length must be positive, got {value}")]
    WindowLength { value: f64 },

    /// A tier threshold was negative, NaN or infinite.
    #[error("{field} must be a non-negative number, got {value}")]
    Threshold { field: &'static str, value: f64 },

    /// A distribution had the wrong number of buckets.
    #[error("expected {expected} buckets, got {actual}")]
    BucketCount { expected: usize, actual: usize },
}

/// Rate cutoffs that split users into tiers.
///
/// Both thresholds are in events per unit of time; they are scaled by the
/// window length before being compared against a raw action count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityThresholds {
    active_threshold: f64,
    inactive_threshold: f64,
    analysis_window_length: f64,
}

impl ActivityThresholds {
    /// Creates thresholds after validation.
    pub fn new(
        active_threshold: f64,
        inactive_threshold: f64,
        analysis_window_length: f64,
    ) -> Result<Self, ValidationError> {
        if !analysis_window_length.is_finite() || analysis_window_length <= 0.0 {
            return Err(ValidationError::WindowLength {
                value: analysis_window_length,
            });
        }
        check_threshold("active threshold", active_threshold)?;
        check_threshold("inactive threshold", inactive_threshold)?;
        Ok(Self {
            active_threshold,
            inactive_threshold,
            analysis_window_length,
        })
    }

    /// Events per unit time above which a user is active.
    #[must_use]
    pub const fn active_threshold(&self) -> f64 {
        self.active_threshold
    }

    /// Events per unit time below which a user is inactive.
    #[must_use]
    pub const fn inactive_threshold(&self) -> f64 {
        self.inactive_threshold
    }

    /// Length of the observation period, in the thresholds' time unit.
    #[must_use]
    pub const fn analysis_window_length(&self) -> f64 {
        self.analysis_window_length
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Threshold { field, value })
    }
}

/// Everything the engine needs besides the log itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    pub thresholds: ActivityThresholds,
    /// Abort on the first malformed line instead of skipping and counting it.
    pub fail_fast: bool,
    /// Fail when the general or inactive aggregate has no actions instead of
    /// leaving it undefined.
    pub strict_aggregates: bool,
}

impl AnalysisSettings {
    #[must_use]
    pub const fn new(thresholds: ActivityThresholds) -> Self {
        Self {
            thresholds,
            fail_fast: false,
            strict_aggregates: false,
        }
    }

    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub const fn with_strict_aggregates(mut self, strict: bool) -> Self {
        self.strict_aggregates = strict;
        self
    }
}
