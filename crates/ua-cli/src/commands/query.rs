//! Query command: one user's statistics as JSON.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::commands::util::load_statistics;
use crate::{Config, QueryKind};

pub fn run<W: Write>(
    writer: &mut W,
    log: &Path,
    kind: QueryKind,
    user: &str,
    config: &Config,
) -> Result<()> {
    let stats = load_statistics(log, config)?;

    let json = match kind {
        QueryKind::Hourly => serde_json::to_string_pretty(&stats.hourly_action_rate(user))?,
        QueryKind::Types => serde_json::to_string_pretty(&stats.type_distribution(user))?,
        QueryKind::Objects => serde_json::to_string_pretty(&stats.object_preference(user)?)?,
    };
    writeln!(writer, "{json}")?;
    Ok(())
}
