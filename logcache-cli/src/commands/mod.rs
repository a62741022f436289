//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod recent;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the most recent log lines of an application
    Recent {
        /// Application identifier (source id) in the log store
        app_id: String,

        /// Number of envelopes to request from the log store
        #[arg(short = 'n', long, default_value_t = 100)]
        lines: usize,

        /// Render timestamps in UTC instead of local time
        #[arg(long)]
        utc: bool,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Recent {
            app_id,
            lines,
            utc,
        } => recent::handle_recent_command(&app_id, lines, utc, config).await,
    }
}
