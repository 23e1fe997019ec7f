mod cli;
mod commands;
mod config;
mod download;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("ifres CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let quiet = cli.quiet;
    let command_result = match cli.command {
        Commands::Fetch(args) => {
            info!("Dispatching to 'fetch' command.");
            commands::fetch::run(args, quiet).await
        }
        Commands::Extract(args) => {
            info!("Dispatching to 'extract' command.");
            commands::extract::run(args)
        }
        Commands::Detect(args) => {
            info!("Dispatching to 'detect' command.");
            commands::detect::run(args, quiet)
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => debug!("Command failed: {}", e),
    }
    command_result
}
