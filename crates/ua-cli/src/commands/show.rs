//! Show command: draw a distribution as a text bar chart.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use ua_core::{Distribution, EventType, HOURLY_BUCKETS, Normalized, ProfileSource, Statistics};

use crate::commands::util::{format_rate, load_statistics, probability_bar};
use crate::{ChartKind, Config};

/// Whose distribution to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTarget<'a> {
    Population,
    Inactive,
    User(&'a str),
}

impl<'a> ChartTarget<'a> {
    pub const fn from_flags(user: Option<&'a str>, inactive: bool) -> Self {
        match (user, inactive) {
            (Some(user), _) => Self::User(user),
            (None, true) => Self::Inactive,
            (None, false) => Self::Population,
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    log: &Path,
    kind: ChartKind,
    target: ChartTarget<'_>,
    config: &Config,
) -> Result<()> {
    let stats = load_statistics(log, config)?;
    write!(writer, "{}", format_chart(&stats, kind, target))?;
    Ok(())
}

/// Formats the requested distribution with one bar per bucket.
pub fn format_chart(stats: &Statistics, kind: ChartKind, target: ChartTarget<'_>) -> String {
    let mut output = String::new();

    let heading = match kind {
        ChartKind::Hourly => "HOURLY ACTIVITY",
        ChartKind::Types => "EVENT TYPES",
    };
    let subject = match target {
        ChartTarget::Population => "all users".to_string(),
        ChartTarget::Inactive => "inactive users".to_string(),
        ChartTarget::User(user) => {
            let source = match kind {
                ChartKind::Hourly => stats.hourly_action_rate(user).source,
                ChartKind::Types => stats.type_distribution(user).source,
            };
            format!("user {user} ({})", source_label(source))
        }
    };
    writeln!(output, "{heading}: {subject}").unwrap();

    match kind {
        ChartKind::Hourly => {
            let distribution = match target {
                ChartTarget::Population => stats.general().hourly,
                ChartTarget::Inactive => stats.inactive().hourly,
                ChartTarget::User(user) => {
                    let rate = stats.hourly_action_rate(user);
                    writeln!(output, "Daily rate: {}", format_rate(rate.daily_rate)).unwrap();
                    rate.distribution
                }
            };
            let labels: Vec<String> = (0..HOURLY_BUCKETS).map(|h| format!("{h:02}:00")).collect();
            write_bars(&mut output, &labels, &distribution);
        }
        ChartKind::Types => {
            let distribution = match target {
                ChartTarget::Population => stats.general().types,
                ChartTarget::Inactive => stats.inactive().types,
                ChartTarget::User(user) => stats.type_distribution(user).distribution,
            };
            let labels: Vec<String> = EventType::ALL
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect();
            write_bars(&mut output, &labels, &distribution);
        }
    }

    output
}

fn write_bars<const N: usize>(
    output: &mut String,
    labels: &[String],
    distribution: &Normalized<Distribution<N>>,
) {
    let Some(distribution) = distribution.defined() else {
        writeln!(output, "(no actions recorded)").unwrap();
        return;
    };
    for (label, &p) in labels.iter().zip(distribution.probabilities()) {
        writeln!(output, "{label:<18}{}  {p:.3}", probability_bar(p)).unwrap();
    }
}

const fn source_label(source: ProfileSource) -> &'static str {
    match source {
        ProfileSource::Own => "own",
        ProfileSource::PopulationWithOwnRate => "population, own rate",
        ProfileSource::Population => "population",
    }
}
