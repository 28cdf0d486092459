use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_cli::commands::{email, export, report};
use dl_cli::{Cli, Commands, Config};

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
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(
        user = %config.user_name,
        roster = config.team_roster.len(),
        transport = ?config.email.transport,
        "loaded configuration"
    );

    match command {
        Commands::Report { log, json } => report::run(log, &config, *json)?,
        Commands::Export { log, output } => export::run(log, &config, output)?,
        Commands::Email { log, output, yes } => email::run(log, &config, output, *yes)?,
    }

    Ok(())
}
