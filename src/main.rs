use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use dupe_sweeper::cli::{Cli, Command};
use dupe_sweeper::commands;
use dupe_sweeper::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Completions need no configuration
    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "dupe-sweeper", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Command::Scan(args) => {
            tracing::info!(?args, "Starting scan");
            commands::scan::run(args, &config)?;
        }
        Command::Dupes(args) => {
            tracing::info!(?args, "Starting duplicate search");
            commands::dupes::run(args, &config)?;
        }
        Command::Large(args) => {
            tracing::info!(?args, "Starting large file search");
            commands::large::run(args, &config)?;
        }
        Command::Usage(args) => {
            tracing::info!(?args, "Starting usage breakdown");
            commands::usage::run(args, &config)?;
        }
        Command::PurgeExt(args) => {
            tracing::info!(?args, "Starting purge by extension");
            commands::purge::run(args, &config)?;
        }
        Command::Trash(args) => {
            tracing::info!(?args, "Starting trash maintenance");
            commands::trash::run(args, &config)?;
        }
        Command::Space(args) => {
            commands::space::run(args)?;
        }
        Command::Completions(_) => {}
    }

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dupe_sweeper={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
