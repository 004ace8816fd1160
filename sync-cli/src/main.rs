//! # inbox-sync
//!
//! Command-line host for the inbox-sync engine.
//!
//! ## Commands
//!
//! - `sync`: Run one cycle per account and print the derived views
//! - `watch`: Sync every account periodically until Ctrl-C
//! - `status`: Show the cached views without contacting the source
//!
//! ## Example
//!
//! ```bash
//! # One-shot sync against the demo source
//! inbox-sync --mock sync
//!
//! # Keep syncing every configured account
//! inbox-sync --config inbox-sync.toml --mock watch
//!
//! # Inspect the cache
//! inbox-sync status
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{status, sync, watch, Host};
use config::{Config, CONFIG_FILE};

/// Periodic incremental message sync with a local cache.
#[derive(Parser, Debug)]
#[command(name = "inbox-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <data dir>/inbox-sync.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the configuration and message caches
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use the built-in demo source instead of a remote service
    #[arg(long, global = true)]
    mock: bool,

    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync cycle per account
    Sync,

    /// Sync periodically until interrupted
    Watch,

    /// Show cached messages without syncing
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    let config = load_config(cli.config.as_deref(), &data_dir, cli.mock)?;
    let host = Host {
        cache_dir: config.cache_dir(&data_dir),
        config,
        mock: cli.mock,
    };

    match cli.command {
        Commands::Sync => sync::run(&host).await?,
        Commands::Watch => watch::run(&host).await?,
        Commands::Status => status::run(&host).await?,
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "inbox_sync_client=debug,inbox_sync_cli=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration file.
///
/// Without `--config` and without a file in the data directory, `--mock`
/// falls back to a single demo account.
fn load_config(explicit: Option<&Path>, data_dir: &Path, mock: bool) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = data_dir.join(CONFIG_FILE);
            if !path.exists() && mock {
                tracing::debug!("No config at {}, using demo account", path.display());
                return Ok(Config::demo());
            }
            path
        }
    };

    Config::from_file(&path).with_context(|| {
        format!(
            "Could not load configuration. Create {} or run with --mock.",
            path.display()
        )
    })
}

/// Get the default data directory for inbox-sync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "inbox-sync", "inbox-sync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
