//! CLI subcommand implementations.

pub mod analyze;
pub mod query;
pub mod show;
pub mod store;
pub mod util;
