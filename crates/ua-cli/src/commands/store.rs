//! Store command: write the statistics artifacts of an event log.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ua_store::StatsStore;

use crate::Config;
use crate::commands::util::load_statistics;

pub fn run<W: Write>(writer: &mut W, log: &Path, out: Option<&Path>, config: &Config) -> Result<()> {
    let stats = load_statistics(log, config)?;

    let dir = out.unwrap_or(&config.stats_dir);
    let store = StatsStore::open(dir)
        .with_context(|| format!("failed to open statistics directory {}", dir.display()))?;
    let summary = store
        .write_statistics(&stats)
        .context("failed to write statistics")?;

    writeln!(writer, "Wrote statistics to {}", store.dir().display())?;
    writeln!(writer, "  users:              {}", summary.users)?;
    writeln!(writer, "  objects:            {}", summary.objects)?;
    writeln!(writer, "  action rates:       {}", summary.action_rates)?;
    writeln!(writer, "  type distributions: {}", summary.type_distributions)?;
    writeln!(writer, "  object preferences: {}", summary.object_preferences)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ua_core::SENTINEL_USER;

    fn test_config(dir: &Path) -> Config {
        Config {
            analysis_window_length: 1.0,
            active_threshold: 3.0,
            inactive_threshold: 1.5,
            stats_dir: dir.join("stats"),
            fail_fast: false,
            strict_aggregates: false,
        }
    }

    const LOG: &str = "\
2015-01-01T08:00:00Z repo-x alice PushEvent
2015-01-01T08:00:00Z repo-x alice PushEvent
2015-01-01T09:00:00Z repo-x alice PushEvent
2015-01-01T10:00:00Z repo-y alice IssuesEvent
2015-01-01T15:00:00Z repo-y bob ForkEvent
2015-01-01T16:00:00Z repo-z bob WatchEvent
2015-01-01T23:00:00Z repo-z carol WatchEvent
";

    #[test]
    fn store_command_writes_to_configured_dir() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("events.log");
        std::fs::write(&log, LOG).unwrap();
        let config = test_config(temp.path());

        let mut output = Vec::new();
        run(&mut output, &log, None, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("users:              3"));
        assert!(output.contains("action rates:       2"));
        assert!(output.contains("object preferences: 3"));

        let store = StatsStore::open(&config.stats_dir).unwrap();
        let rates = store.read_action_rates().unwrap();
        assert!(rates.contains_key("alice"));
        assert!(rates.contains_key(SENTINEL_USER));
        assert!(!rates.contains_key("bob"));
    }

    #[test]
    fn store_command_prefers_explicit_out_dir() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("events.log");
        std::fs::write(&log, LOG).unwrap();
        let out = temp.path().join("elsewhere");

        let mut output = Vec::new();
        run(&mut output, &log, Some(&out), &test_config(temp.path())).unwrap();

        assert!(out.join(ua_store::USER_IDS_FILE).exists());
        assert!(!temp.path().join("stats").exists());
    }
}
