//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use ua_core::{Distribution, EventLogReader, Normalized, Statistics, analyze};

use crate::Config;

/// Runs both passes over `log` with the configured settings.
pub fn load_statistics(log: &Path, config: &Config) -> Result<Statistics> {
    let settings = config
        .analysis_settings()
        .context("invalid analysis settings")?;
    tracing::debug!(log = %log.display(), ?settings, "analyzing event log");

    analyze(&EventLogReader::new(log), &settings)
        .with_context(|| format!("failed to analyze {}", log.display()))
}

/// Formats a rate with three decimals, or `undefined`.
pub fn format_rate(value: Normalized<f64>) -> String {
    match value {
        Normalized::Defined(v) => format!("{v:.3}"),
        Normalized::Undefined => "undefined".to_string(),
    }
}

/// Formats one bucket of a distribution, or `-` when undefined.
pub fn format_probability<const N: usize>(
    distribution: &Normalized<Distribution<N>>,
    idx: usize,
) -> String {
    distribution
        .defined()
        .map_or_else(|| "-".to_string(), |d| format!("{:.3}", d[idx]))
}

/// Renders a ten-cell bar for a probability in `[0, 1]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to 0..=10 before the cast"
)]
pub fn probability_bar(probability: f64) -> String {
    let filled = if probability > 0.0 && probability < 0.05 {
        1 // Minimum 1 for visibility
    } else {
        (probability * 10.0).round().clamp(0.0, 10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bar_full() {
        assert_eq!(probability_bar(1.0), "██████████");
    }

    #[test]
    fn test_probability_bar_empty() {
        assert_eq!(probability_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_probability_bar_small_values_stay_visible() {
        assert_eq!(probability_bar(0.01), "█░░░░░░░░░");
    }

    #[test]
    fn test_probability_bar_rounds() {
        assert_eq!(probability_bar(0.56), "██████░░░░");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Normalized::Defined(1.5)), "1.500");
        assert_eq!(format_rate(Normalized::Undefined), "undefined");
    }
}
