//! # folio
//!
//! Application layer of Folio: the async, network-aware half.
//!
//! - `api`: axum server that serves a `folio_core::Collection` page by page
//! - `client`: reqwest Page Fetcher for the same wire contract
//! - `fetcher`: the `PageFetcher` seam and an in-process implementation
//! - `controller`: async driver around `folio_core::PageCache`
//! - `config`: client configuration (TOML file + environment)
//! - `cli`: clap commands

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod fetcher;

pub use client::HttpFetcher;
pub use config::ClientConfig;
pub use controller::{LoadOutcome, PageController};
pub use fetcher::{CollectionFetcher, PageFetcher};
