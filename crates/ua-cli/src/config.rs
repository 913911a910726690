//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ua_core::{ActivityThresholds, AnalysisSettings, ValidationError};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Length of the period the log covers, in days.
    pub analysis_window_length: f64,
    /// Events per day above which a user is active.
    pub active_threshold: f64,
    /// Events per day below which a user is inactive.
    pub inactive_threshold: f64,
    /// Directory that `ua store` writes artifacts to.
    pub stats_dir: PathBuf,
    /// Abort on the first malformed log line.
    pub fail_fast: bool,
    /// Fail when the general or inactive aggregate is empty.
    pub strict_aggregates: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("analysis_window_length", &self.analysis_window_length)
            .field("active_threshold", &self.active_threshold)
            .field("inactive_threshold", &self.inactive_threshold)
            .field("stats_dir", &self.stats_dir)
            .field("fail_fast", &self.fail_fast)
            .field("strict_aggregates", &self.strict_aggregates)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            analysis_window_length: 30.0,
            active_threshold: 2.0,
            inactive_threshold: 0.5,
            stats_dir: data_dir.join("stats"),
            fail_fast: false,
            strict_aggregates: false,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, optionally layering a
    /// specific file on top.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (UA_*)
        figment = figment.merge(Env::prefixed("UA_"));

        figment.extract()
    }

    /// Validated engine settings.
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ValidationError> {
        let thresholds = ActivityThresholds::new(
            self.active_threshold,
            self.inactive_threshold,
            self.analysis_window_length,
        )?;
        Ok(AnalysisSettings::new(thresholds)
            .with_fail_fast(self.fail_fast)
            .with_strict_aggregates(self.strict_aggregates))
    }
}

/// Returns the platform-specific config directory for ua.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ua"))
}

/// Returns the platform-specific data directory for ua.
///
/// On Linux: `~/.local/share/ua`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ua"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_ua() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "ua");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_stats() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.stats_dir, data_dir.join("stats"));
    }

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Config::default().analysis_settings().unwrap();
        assert!((settings.thresholds.analysis_window_length() - 30.0).abs() < f64::EPSILON);
        assert!(!settings.fail_fast);
        assert!(!settings.strict_aggregates);
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let config = Config {
            analysis_window_length: 0.0,
            ..Config::default()
        };
        assert!(config.analysis_settings().is_err());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "analysis_window_length = 7.0\nactive_threshold = 4.5\nfail_fast = true\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!((config.analysis_window_length - 7.0).abs() < f64::EPSILON);
        assert!((config.active_threshold - 4.5).abs() < f64::EPSILON);
        assert!((config.inactive_threshold - 0.5).abs() < f64::EPSILON);
        assert!(config.fail_fast);
    }
}
