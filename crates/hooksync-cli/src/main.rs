//! hooksync CLI entry point.
//!
//! Binary name: `hooksync`
//!
//! Drives the webhook subscription lifecycle against an automation service
//! the way a workflow host would: probe for an existing registration,
//! create one when absent, tear it down on request. Connection settings
//! come from global flags, environment variables, or a TOML parameter
//! file.

mod app;
mod cli;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,hooksync=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need connection settings
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hooksync", &mut std::io::stdout());
        return Ok(());
    }

    let json = cli.json;
    let app = App::from_cli(&cli);

    match cli.command {
        Commands::Check { registration } => {
            cli::lifecycle::check(&app, &registration, json).await?;
        }

        Commands::Register { registration } => {
            cli::lifecycle::register(&app, &registration, json).await?;
        }

        Commands::Deregister => {
            cli::lifecycle::deregister(&app, json).await?;
        }

        Commands::Subscriptions => {
            cli::subscriptions::list(&app, json).await?;
        }

        Commands::State => {
            cli::state::show(&app, json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
