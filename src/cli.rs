use crate::commands::{call, config as config_cmd};
use crate::config::Config;
use crate::errors::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wechat")]
#[command(about = "Call WeChat platform APIs with automatic access token handling")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a GET request to an API endpoint
    Get {
        /// Endpoint URL; the access token parameter is appended if missing
        url: String,
    },
    /// Send a JSON POST request to an API endpoint
    Post {
        /// Endpoint URL; the access token parameter is appended if missing
        url: String,
        /// Inline JSON request body
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
        /// Read the JSON request body from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get {
        /// Key in <section>.<key> form, e.g. auth.access_token
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key in <section>.<key> form, e.g. auth.family
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Key in <section>.<key> form
        key: String,
    },
    /// Show configuration file path
    Path,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new()?;

    match cli.command {
        Commands::Get { url } => call::handle_get(&url, &config).await,
        Commands::Post { url, data, file } => {
            call::handle_post(&url, data, file, &config).await
        }
        Commands::Config { action } => config_cmd::handle(action, config).await,
    }
}
