//! Analyze command: population summary of an event log.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use ua_core::{AggregateProfile, EventType, Normalized, ScanReport, Statistics, Tier, TierSummary};

use crate::Config;
use crate::commands::util::{format_probability, format_rate, load_statistics};

/// The user with the most recorded actions.
#[derive(Debug, Clone, Serialize)]
pub struct MostActiveUser {
    pub user_id: String,
    pub actions: u64,
}

/// Everything `ua analyze` reports.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub users: usize,
    pub objects: usize,
    pub profiled_users: usize,
    pub tiers: TierSummary,
    pub average_daily_activity: Normalized<f64>,
    pub average_actions_per_user: Normalized<f64>,
    pub most_active_user: Option<MostActiveUser>,
    pub general: AggregateProfile,
    pub inactive: AggregateProfile,
    pub scan: ScanReport,
}

impl AnalysisSummary {
    pub fn from_statistics(stats: &Statistics) -> Self {
        Self {
            users: stats.user_count(),
            objects: stats.object_count(),
            profiled_users: stats.profiled_users().count(),
            tiers: stats.tier_summary(),
            average_daily_activity: stats.average_daily_activity(),
            average_actions_per_user: stats.average_actions_per_user(),
            most_active_user: stats
                .most_active_user()
                .map(|(user_id, actions)| MostActiveUser {
                    user_id: user_id.to_string(),
                    actions,
                }),
            general: *stats.general(),
            inactive: *stats.inactive(),
            scan: stats.report().clone(),
        }
    }
}

pub fn run<W: Write>(writer: &mut W, log: &Path, config: &Config, json: bool) -> Result<()> {
    let stats = load_statistics(log, config)?;
    let summary = AnalysisSummary::from_statistics(&stats);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(&summary))?;
    }
    Ok(())
}

/// Formats the summary as a human-readable report.
pub fn format_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();
    let scan = &summary.scan;

    writeln!(output, "ACTIVITY SUMMARY").unwrap();
    writeln!(output, "────────────────").unwrap();
    writeln!(output, "Users:            {}", summary.users).unwrap();
    writeln!(output, "Objects:          {}", summary.objects).unwrap();
    writeln!(
        output,
        "Events:           {} recognized, {} unrecognized, {} malformed",
        scan.recognized_events, scan.unrecognized_lines, scan.malformed_lines
    )
    .unwrap();
    writeln!(output, "Profiled users:   {}", summary.profiled_users).unwrap();
    writeln!(
        output,
        "Daily activity:   {} per user",
        format_rate(summary.average_daily_activity)
    )
    .unwrap();
    writeln!(
        output,
        "Actions per user: {}",
        format_rate(summary.average_actions_per_user)
    )
    .unwrap();
    match &summary.most_active_user {
        Some(user) => writeln!(
            output,
            "Most active:      {} ({} actions)",
            user.user_id, user.actions
        )
        .unwrap(),
        None => writeln!(output, "Most active:      none").unwrap(),
    }

    writeln!(output).unwrap();
    writeln!(output, "TIERS").unwrap();
    writeln!(output, "─────").unwrap();
    for tier in Tier::ALL {
        let stats = summary.tiers.get(tier);
        writeln!(
            output,
            "{:<10}{:>6} users{:>8} actions",
            tier.as_str(),
            stats.user_count,
            stats.total_action_count
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "EVENT TYPES").unwrap();
    writeln!(output, "───────────").unwrap();
    writeln!(output, "{:<18}{:>9}{:>10}", "", "general", "inactive").unwrap();
    for kind in EventType::ALL {
        writeln!(
            output,
            "{:<18}{:>9}{:>10}",
            kind.as_str(),
            format_probability(&summary.general.types, kind.index()),
            format_probability(&summary.inactive.types, kind.index())
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Peak hour:        {} general, {} inactive",
        format_peak(&summary.general),
        format_peak(&summary.inactive)
    )
    .unwrap();

    if !scan.undefined_aggregates.is_empty() {
        let names: Vec<String> = scan
            .undefined_aggregates
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(output, "Undefined:        {}", names.join(", ")).unwrap();
    }

    output
}

fn format_peak(profile: &AggregateProfile) -> String {
    profile
        .hourly
        .defined()
        .and_then(ua_core::Distribution::mode)
        .map_or_else(|| "undefined".to_string(), |hour| format!("{hour:02}:00"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn write_log(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("events.log");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn test_config(dir: &Path) -> Config {
        Config {
            analysis_window_length: 2.0,
            active_threshold: 2.0,
            inactive_threshold: 0.75,
            stats_dir: dir.join("stats"),
            fail_fast: false,
            strict_aggregates: false,
        }
    }

    /// `heavy` is active, `steady` regular and `once` inactive.
    const MIXED_LOG: &str = "\
2015-01-01T01:00:00Z repo-a heavy PushEvent
2015-01-01T01:00:00Z repo-a heavy PushEvent
2015-01-01T02:00:00Z repo-a heavy PushEvent
2015-01-01T03:00:00Z repo-a heavy PushEvent
2015-01-01T09:00:00Z repo-a heavy PushEvent
2015-01-01T04:00:00Z repo-b heavy WatchEvent
2015-01-01T12:00:00Z repo-b steady IssuesEvent
2015-01-02T13:00:00Z repo-c steady ForkEvent
2015-01-02T14:00:00Z repo-c steady GollumEvent
2015-01-02T20:00:00Z repo-a once CreateEvent
";

    #[test]
    fn analyze_command_prints_summary() {
        let temp = tempfile::tempdir().unwrap();
        let log = write_log(temp.path(), MIXED_LOG);

        let mut output = Vec::new();
        run(&mut output, &log, &test_config(temp.path()), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        ACTIVITY SUMMARY
        ────────────────
        Users:            3
        Objects:          3
        Events:           9 recognized, 1 unrecognized, 0 malformed
        Profiled users:   2
        Daily activity:   1.500 per user
        Actions per user: 3.000
        Most active:      heavy (6 actions)

        TIERS
        ─────
        active         1 users       6 actions
        regular        1 users       2 actions
        inactive       1 users       1 actions

        EVENT TYPES
        ───────────
                            general  inactive
        CreateEvent           0.111     1.000
        DeleteEvent           0.000     0.000
        ForkEvent             0.111     0.000
        IssuesEvent           0.111     0.000
        PullRequestEvent      0.000     0.000
        PushEvent             0.556     0.000
        WatchEvent            0.111     0.000

        Peak hour:        01:00 general, 20:00 inactive
        ");
    }

    #[test]
    fn analyze_command_reports_undefined_aggregates() {
        let temp = tempfile::tempdir().unwrap();
        let log = write_log(temp.path(), "");

        let mut output = Vec::new();
        run(&mut output, &log, &test_config(temp.path()), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Daily activity:   undefined per user"));
        assert!(output.contains("Most active:      none"));
        assert!(output.contains("Undefined:        general, inactive"));
    }

    #[test]
    fn analyze_command_outputs_json() {
        let temp = tempfile::tempdir().unwrap();
        let log = write_log(temp.path(), MIXED_LOG);

        let mut output = Vec::new();
        run(&mut output, &log, &test_config(temp.path()), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["users"], 3);
        assert_eq!(value["tiers"]["active"]["user_count"], 1);
        assert_eq!(value["most_active_user"]["user_id"], "heavy");
        assert_eq!(value["average_daily_activity"]["defined"], 1.5);
        assert_eq!(value["scan"]["unrecognized_lines"], 1);
        assert_eq!(value["general"]["total_action_count"], 9);
        assert_eq!(
            value["general"]["types"]["defined"].as_array().unwrap().len(),
            7
        );
    }

    #[test]
    fn analyze_command_fails_for_missing_log() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.log");

        let mut output = Vec::new();
        let err = run(&mut output, &missing, &test_config(temp.path()), false).unwrap_err();
        assert!(err.to_string().contains("failed to analyze"));
    }
}
