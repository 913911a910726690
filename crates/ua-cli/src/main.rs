use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ua_cli::commands::show::ChartTarget;
use ua_cli::commands::{analyze, query, show, store};
use ua_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match command {
        Commands::Analyze { log, json } => {
            analyze::run(&mut stdout, log, &config, *json)?;
        }
        Commands::Store { log, out } => {
            store::run(&mut stdout, log, out.as_deref(), &config)?;
        }
        Commands::Query { log, kind, user } => {
            query::run(&mut stdout, log, *kind, user, &config)?;
        }
        Commands::Show {
            log,
            kind,
            user,
            inactive,
        } => {
            let target = ChartTarget::from_flags(user.as_deref(), *inactive);
            show::run(&mut stdout, log, *kind, target, &config)?;
        }
    }

    Ok(())
}
