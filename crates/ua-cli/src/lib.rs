//! User activity statistics CLI library.
//!
//! This crate provides the CLI interface for the activity analyzer.

mod cli;
pub mod commands;
mod config;

pub use cli::{ChartKind, Cli, Commands, QueryKind};
pub use config::Config;
