mod cli;
mod config;
mod controller;
mod location;
mod models;
mod navigation;
mod timings;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Fetch cycles run here; the TUI loop itself stays on the main thread
    let runtime = tokio::runtime::Runtime::new().context("Starting async runtime")?;

    match cli.command {
        Some(Commands::Times { date, lat, lon }) => {
            runtime.block_on(handlers::handle_times(&config, date, lat, lon))?;
        }
        Some(Commands::Location { action }) => {
            handlers::handle_location(&mut config, &action)?;
        }
        Some(Commands::Config) => {
            handlers::handle_config(&config)?;
        }

        // No subcommand → launch TUI
        None => {
            tui::app::run(runtime.handle().clone(), config)?;
        }
    }

    Ok(())
}
