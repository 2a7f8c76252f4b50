//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `agri_open_data` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use agri_open_data::config::{Cli, Command, RelayArgs};
use agri_open_data::display::{render_catalog_page, render_vegetables};
use agri_open_data::initialization::init_logger_with;
use agri_open_data::relay::{start_relay_server, RelayState};
use agri_open_data::{run_search, run_vegetables, CatalogQuery, Config, FetchState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so that
    // AGRI_API_KEY can live there. Fall back to a .env next to the executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.global.to_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let succeeded = match run(cli.command, &config).await {
        Ok(succeeded) => succeeded,
        Err(e) => {
            eprintln!("agri_open_data error: {:#}", e);
            process::exit(1);
        }
    };
    if !succeeded {
        process::exit(1);
    }
    Ok(())
}

/// Runs one subcommand. Returns `false` when a fetch failure was already
/// reported to the user.
async fn run(command: Command, config: &Config) -> Result<bool> {
    match command {
        Command::Search(args) => {
            let query = CatalogQuery {
                page: usize::try_from(args.page).context("Page number out of range")?,
                page_size: args.page_size,
                format: args.format,
                query: args.query,
            };
            let view = run_search(config, &query).await?;
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&view).context("Failed to serialize page")?
                );
            } else {
                println!("{}", render_catalog_page(&view));
            }
            Ok(view.state != FetchState::Failure)
        }
        Command::Vegetables(args) => {
            let report = run_vegetables(config, args.year).await?;
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .context("Failed to serialize ranking")?
                );
            } else {
                println!(
                    "{}",
                    render_vegetables(&report.ranked, report.year, &report.years)
                );
            }
            Ok(true)
        }
        Command::Relay(RelayArgs {
            port,
            upstream,
            strip_prefix,
        }) => {
            let state = RelayState::new(&upstream, &strip_prefix, config.timeout_seconds)
                .context("Failed to set up relay")?;
            start_relay_server(port, state)
                .await
                .context("Relay stopped")?;
            Ok(true)
        }
    }
}
