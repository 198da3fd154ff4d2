//! Cattypass CLI - scriptable access to the password store.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cattypass_core::Config;

/// Cattypass - a minimalist local password manager
#[derive(Parser, Debug)]
#[command(name = "cattypass")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the storage file (overrides config)
    #[arg(short, long, value_name = "FILE", global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a freshly generated password.
    Generate {
        /// Number of characters (defaults to the configured length).
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Save a password for a site, replacing any existing one.
    Save {
        /// Site name the password belongs to.
        site: String,

        #[arg(short, long, default_value = "")]
        username: String,

        /// The password to store.
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,

        /// Generate the password instead of passing it.
        #[arg(short, long)]
        generate: bool,

        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Change fields of a saved site. Omitted fields keep their value.
    Edit {
        site: String,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete the password saved for a site.
    Delete { site: String },

    /// List saved passwords.
    List {
        /// Print passwords in clear text.
        #[arg(long)]
        show_passwords: bool,
    },

    /// Export all passwords as JSON.
    Export {
        /// Directory to save the export into (defaults to the configured one).
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Import passwords from a CSV file (site,?,username,password[,note]).
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cattypass=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config)?;
    if let Some(storage) = cli.storage {
        tracing::info!("Overriding storage path from CLI: {}", storage.display());
        config.storage_path = storage;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = runtime.block_on(commands::execute(cli.command, &config, &mut stdout)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
