//! Thumbsmith CLI - concurrent thumbnail pipeline.
//!
//! Thumbsmith downloads a list of remote images and writes thumbnails
//! at several fixed widths, overlapping the network-bound downloads
//! with a CPU-parallel resize worker pool.
//!
//! # Usage
//!
//! ```bash
//! # Fetch and resize a handful of URLs
//! thumbsmith run https://example.com/a.jpg https://example.com/b.jpg
//!
//! # URLs from a file, custom widths
//! thumbsmith run --urls-file urls.txt --widths 48,96
//!
//! # View configuration
//! thumbsmith config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Thumbsmith - fetch remote images and produce fixed-width thumbnails.
#[derive(Parser, Debug)]
#[command(name = "thumbsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Download images and produce thumbnails at the configured widths
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match thumbsmith_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `thumbsmith config path`."
            );
            thumbsmith_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Thumbsmith v{}", thumbsmith_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
