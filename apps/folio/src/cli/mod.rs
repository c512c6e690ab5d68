//! # Folio CLI Module
//!
//! This module implements the CLI interface for Folio.
//!
//! ## Available Commands
//!
//! - `serve` - Start the collection HTTP server
//! - `list` - Fetch pages from a server and render them
//! - `preview` - Render pages of a local record file

mod commands;

use clap::{Parser, Subcommand};
use folio_core::FolioError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Folio - paged collection server and client
///
/// Serves a record collection page by page, and fetches and renders pages
/// from any server speaking the same contract.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Client configuration file (TOML). Defaults to ./folio.toml if present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// JSON file holding an array of records to serve
        #[arg(short, long, conflicts_with = "demo")]
        data: Option<PathBuf>,

        /// Serve this many synthetic records instead of a file
        #[arg(long)]
        demo: Option<u64>,
    },

    /// Fetch pages from a server and render them
    List {
        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        index: u64,

        /// Page size (defaults to the configured page size)
        #[arg(short, long)]
        size: Option<u32>,

        /// Keep fetching until the last page
        #[arg(short, long)]
        all: bool,
    },

    /// Render pages of a local record file without a server
    Preview {
        /// JSON file holding an array of records
        #[arg(short, long)]
        data: PathBuf,

        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        index: u64,

        /// Page size (defaults to the configured page size)
        #[arg(short, long)]
        size: Option<u32>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), FolioError> {
    let json_mode = cli.json_mode;
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            data,
            demo,
        }) => cmd_serve(&host, port, data.as_deref(), demo).await,
        Some(Commands::List { index, size, all }) => {
            cmd_list(config_path, json_mode, index, size, all).await
        }
        Some(Commands::Preview { data, index, size }) => {
            cmd_preview(config_path, json_mode, &data, index, size).await
        }
        None => {
            // No subcommand - list the first page by default
            cmd_list(config_path, json_mode, 0, None, false).await
        }
    }
}
