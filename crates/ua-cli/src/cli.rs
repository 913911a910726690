//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// User activity statistics.
///
/// Reads a log of `<timestamp> <object> <user> <event type>` lines and
/// computes per-user and population activity distributions.
#[derive(Debug, Parser)]
#[command(name = "ua", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze an event log and print a summary.
    Analyze {
        /// The event log to analyze.
        log: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Analyze an event log and write the statistics artifacts.
    Store {
        /// The event log to analyze.
        log: PathBuf,

        /// Output directory (defaults to `stats_dir` from the config).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print one user's statistics as JSON.
    Query {
        /// The event log to analyze.
        log: PathBuf,

        /// Which statistic to query.
        kind: QueryKind,

        /// The user ID (`-1` for a new user).
        #[arg(allow_hyphen_values = true)]
        user: String,
    },

    /// Draw a distribution as a bar chart.
    Show {
        /// The event log to analyze.
        log: PathBuf,

        /// Which distribution to draw.
        kind: ChartKind,

        /// Draw this user's distribution instead of the population's.
        #[arg(long, allow_hyphen_values = true, conflicts_with = "inactive")]
        user: Option<String>,

        /// Draw the inactive cluster's distribution.
        #[arg(long)]
        inactive: bool,
    },
}

/// Per-user statistics that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    /// Hourly action distribution and daily rate.
    Hourly,
    /// Event-type distribution.
    Types,
    /// Object preference.
    Objects,
}

/// Distributions that can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Hourly,
    Types,
}
