//! # Folio - Paged Collection Server & Client
//!
//! The main binary for Folio.
//!
//! This application provides:
//! - HTTP server for a paged record collection (axum-based)
//! - HTTP client that fetches and renders pages (reqwest-based)
//! - Local preview of record files
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     apps/folio (THE BINARY)                  │
//! │                                                              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────────┐    │
//! │  │    CLI      │   │  HTTP API   │   │ Page Controller  │    │
//! │  │   (clap)    │   │   (axum)    │   │ + HttpFetcher    │    │
//! │  └──────┬──────┘   └──────┬──────┘   └────────┬─────────┘    │
//! │         │                 │                   │              │
//! │         └─────────────────┼───────────────────┘              │
//! │                           ▼                                  │
//! │                   ┌───────────────┐                          │
//! │                   │  folio-core   │                          │
//! │                   │  (THE LOGIC)  │                          │
//! │                   └───────────────┘                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Serve 250 synthetic users
//! folio serve --port 8080 --demo 250
//!
//! # Fetch and render pages
//! folio list --index 0 --size 20
//! folio list --all --json-mode
//!
//! # Render a local file
//! folio preview --data users.json --size 10
//! ```

use clap::Parser;
use folio::cli::{self, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // FOLIO_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "folio=info,tower_http=debug".into());

    // Logs go to stderr; stdout carries rendered pages.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && matches!(cli.command, Some(Commands::Serve { .. })) {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Folio startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗ ██████╗ ██╗     ██╗ ██████╗
  ██╔════╝██╔═══██╗██║     ██║██╔═══██╗
  █████╗  ██║   ██║██║     ██║██║   ██║
  ██╔══╝  ██║   ██║██║     ██║██║   ██║
  ██║     ╚██████╔╝███████╗██║╚██████╔╝
  ╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝

  Paged Collection Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
