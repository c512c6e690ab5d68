//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, ServerConfig};
use crate::client::HttpFetcher;
use crate::config::ClientConfig;
use crate::controller::{LoadOutcome, PageController};
use crate::fetcher::{CollectionFetcher, PageFetcher};
use folio_core::{
    Collection, FetchError, FolioError, LoadState, PageEnvelope, SessionContext, View,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a record data file (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_DATA_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default number of synthetic records when neither `--data` nor `--demo`
/// is given.
const DEFAULT_DEMO_RECORDS: u64 = 100;

/// Validate a data file path and size before reading it.
///
/// Canonicalizes the path (resolving symlinks and "..") and requires a
/// regular file no larger than `MAX_DATA_FILE_SIZE`.
fn validate_data_file(path: &Path) -> Result<PathBuf, FolioError> {
    let canonical = path.canonicalize().map_err(|e| {
        FolioError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(FolioError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| FolioError::Io(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_DATA_FILE_SIZE {
        return Err(FolioError::Data(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_DATA_FILE_SIZE
        )));
    }

    Ok(canonical)
}

/// Load a collection from a JSON record file.
pub fn load_collection(path: &Path) -> Result<Collection, FolioError> {
    let validated = validate_data_file(path)?;
    let bytes = std::fs::read(&validated)
        .map_err(|e| FolioError::Io(format!("Read file: {}", e)))?;
    let collection = Collection::from_json(&bytes)?;
    tracing::info!(
        records = collection.len(),
        "Loaded collection from {:?}",
        validated
    );
    Ok(collection)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    host: &str,
    port: u16,
    data: Option<&Path>,
    demo: Option<u64>,
) -> Result<(), FolioError> {
    let (collection, source) = match data {
        Some(path) => (load_collection(path)?, format!("{}", path.display())),
        None => {
            let count = demo.unwrap_or(DEFAULT_DEMO_RECORDS);
            (Collection::demo(count), format!("demo ({} records)", count))
        }
    };
    let config = ServerConfig::from_env();

    println!("Folio Collection Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Source:   {}", source);
    println!("  Records:  {}", collection.len());
    println!();
    println!("Endpoints:");
    println!("  GET  /records?index=&size= - One zero-based page");
    println!("  GET  /status               - Collection status");
    println!("  GET  /health               - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, collection, &config).await
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// Fetch one page (or every page from `index` on) from a server.
///
/// In JSON mode a single page prints as one object and `--all` prints one
/// array holding every fetched page.
pub async fn cmd_list(
    config_path: Option<&Path>,
    json_mode: bool,
    index: u64,
    size: Option<u32>,
    all: bool,
) -> Result<(), FolioError> {
    let config = ClientConfig::load(config_path)?;
    tracing::debug!(?config, "Loaded client configuration");

    let fetcher = HttpFetcher::from_config(&config)?;
    let controller = PageController::new(fetcher);
    let session = config.session();
    let size = size.unwrap_or(config.page_size);

    let mut reports = Vec::new();
    let mut current = index;
    loop {
        let report = load_page(&controller, &session, current, size).await?;
        if !json_mode {
            report.print_text();
        }
        let has_next = report.envelope().is_some_and(|e| e.has_next(current));
        let failed = report.failure().is_some();
        reports.push(report);
        if !all || !has_next || failed {
            break;
        }
        current = current.saturating_add(1);
    }
    controller.unmount();

    if json_mode {
        print_json(&list_output(&reports, all));
    }
    match reports.iter().find_map(PageReport::failure) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

// =============================================================================
// PREVIEW COMMAND
// =============================================================================

/// Render a page of a local record file.
pub async fn cmd_preview(
    config_path: Option<&Path>,
    json_mode: bool,
    data: &Path,
    index: u64,
    size: Option<u32>,
) -> Result<(), FolioError> {
    let config = ClientConfig::load(config_path)?;
    let collection = load_collection(data)?;
    let controller = PageController::new(CollectionFetcher::new(collection));

    let size = size.unwrap_or(config.page_size);
    let report = load_page(&controller, &SessionContext::anonymous(), index, size).await?;
    controller.unmount();

    if json_mode {
        print_json(&report.to_json());
    } else {
        report.print_text();
    }
    match report.failure() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// One loaded page as the CLI shows it.
#[derive(Debug, Clone)]
pub struct PageReport {
    pub index: u64,
    pub size: u32,
    pub state: LoadState,
    pub view: View,
}

impl PageReport {
    pub fn envelope(&self) -> Option<&PageEnvelope> {
        self.state.envelope()
    }

    /// The fetch error, if the page ended in `Error`.
    pub fn failure(&self) -> Option<FetchError> {
        self.state.error().cloned()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "index": self.index,
            "size": self.size,
            "state": self.state.label(),
            "view": self.view,
        })
    }

    fn print_text(&self) {
        println!("Page {} (size {})", self.index, self.size);
        println!();
        print!("{}", self.view);
        println!();
    }
}

/// JSON document for `list`: one object, or an array under `--all`.
pub fn list_output(reports: &[PageReport], all: bool) -> serde_json::Value {
    match reports {
        [single] if !all => single.to_json(),
        _ => serde_json::Value::Array(reports.iter().map(PageReport::to_json).collect()),
    }
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Load one page through the controller and capture its view.
///
/// A fetch that fails lands in the report as an `Error` state. A joined or
/// superseded load waits for whichever fetch owns the state. Coordination
/// rejections (`Unmounted`, `AlreadyLoading`) are returned as errors since
/// there is no page to show.
pub async fn load_page<F: PageFetcher>(
    controller: &PageController<F>,
    session: &SessionContext,
    index: u64,
    size: u32,
) -> Result<PageReport, FolioError> {
    match controller.load(index, size).await {
        LoadOutcome::Applied => {}
        LoadOutcome::Rejected(err) if err.is_coordination() => return Err(err.into()),
        // Invalid arguments are already the current `Error` state.
        LoadOutcome::Rejected(_) => {}
        outcome @ (LoadOutcome::Joined | LoadOutcome::Stale) => {
            tracing::debug!(
                event = "page_not_applied",
                ?outcome,
                index,
                size,
                "Waiting for the fetch that owns the view"
            );
            controller.settled().await;
        }
    }

    Ok(PageReport {
        index,
        size,
        state: controller.state(),
        view: controller.view(session),
    })
}

// =============================================================================
// TESTS
// =============================================================================
