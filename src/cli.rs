//! CLI definitions for the pager.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pager CLI.
#[derive(Parser)]
#[command(name = "pager")]
#[command(about = "Service health pager with timed escalation")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/pager.toml", global = true, env = "PAGER_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation runs the server, the only command that logs to files.
    pub fn starts_server(&self) -> bool {
        matches!(self.command, None | Some(Commands::Run { .. }))
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the pager API in foreground (default)
    Run {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration file and report problems
    CheckConfig,

    /// List configured services and their escalation levels
    Services,
}
