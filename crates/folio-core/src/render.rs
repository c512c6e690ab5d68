//! # Renderer
//!
//! Pure mapping from Load State to visual output. The renderer never fetches
//! and never mutates state; it only reads what the Page Cache owns.
//!
//! | State                  | View          |
//! |------------------------|---------------|
//! | session loading        | `Placeholder` |
//! | `Idle` / `Loading`     | `Placeholder` |
//! | `Loaded`, no records   | `Empty`       |
//! | `Loaded`, records      | `Rows`        |
//! | `Error`                | `Failure`     |

use crate::envelope::PageEnvelope;
use crate::session::SessionContext;
use crate::state::LoadState;
use crate::types::{Record, RecordId};
use serde::Serialize;
use std::fmt;

const SESSION_PENDING_MESSAGE: &str = "Checking session...";
const LOADING_MESSAGE: &str = "Loading...";
const EMPTY_MESSAGE: &str = "No records to display.";

const HEADERS: [&str; 4] = ["ID", "USERNAME", "EMAIL", "ATTRIBUTES"];

// =============================================================================
// VIEW MODEL
// =============================================================================

/// One visual row, keyed by the record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub key: RecordId,
    pub username: String,
    pub email: String,
    /// Additional attributes as `key=value`, in key order.
    pub attributes: Vec<String>,
}

impl From<&Record> for Row {
    fn from(record: &Record) -> Self {
        let attributes = record
            .attributes
            .keys()
            .filter_map(|key| record.attribute_text(key).map(|v| format!("{key}={v}")))
            .collect();
        Self {
            key: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            attributes,
        }
    }
}

/// Pagination summary shown under the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageFooter {
    pub shown: usize,
    pub total_pages: u32,
    pub total_elements: Option<u64>,
}

/// Renderer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Transient output while nothing settled is available.
    Placeholder { message: String },
    /// A loaded page with no records.
    Empty { message: String },
    /// One row per record, in page order.
    Rows { rows: Vec<Row>, footer: PageFooter },
    /// A human-readable failure.
    Failure { message: String, retryable: bool },
}

impl View {
    /// Keys of the rendered rows, in order. Empty for non-row views.
    #[must_use]
    pub fn keys(&self) -> Vec<RecordId> {
        match self {
            Self::Rows { rows, .. } => rows.iter().map(|row| row.key).collect(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Map the current state to a view.
#[must_use]
pub fn render(state: &LoadState, session: &SessionContext) -> View {
    if session.is_loading() {
        return View::Placeholder {
            message: SESSION_PENDING_MESSAGE.to_string(),
        };
    }
    match state {
        LoadState::Idle | LoadState::Loading(_) => View::Placeholder {
            message: LOADING_MESSAGE.to_string(),
        },
        LoadState::Loaded(envelope) if envelope.is_empty() => View::Empty {
            message: EMPTY_MESSAGE.to_string(),
        },
        LoadState::Loaded(envelope) => render_rows(envelope),
        LoadState::Error(err) => View::Failure {
            message: err.user_message(),
            retryable: err.is_retryable(),
        },
    }
}

fn render_rows(envelope: &PageEnvelope) -> View {
    View::Rows {
        rows: envelope.content.iter().map(Row::from).collect(),
        footer: PageFooter {
            shown: envelope.len(),
            total_pages: envelope.total_pages,
            total_elements: envelope.total_elements,
        },
    }
}

// =============================================================================
// TEXT OUTPUT
// =============================================================================

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder { message } | Self::Empty { message } => writeln!(f, "{message}"),
            Self::Failure { message, retryable } => {
                writeln!(f, "Error: {message}")?;
                if *retryable {
                    writeln!(f, "Retrying may help.")?;
                }
                Ok(())
            }
            Self::Rows { rows, footer } => write_table(f, rows, footer),
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[Row], footer: &PageFooter) -> fmt::Result {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.key.to_string(),
                row.username.clone(),
                row.email.clone(),
                row.attributes.join(", "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(f, &HEADERS.map(String::from), &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(f, "{}", rule.join("  "))?;
    for line in &cells {
        write_line(f, line, &widths)?;
    }

    writeln!(f)?;
    match footer.total_elements {
        Some(total) => writeln!(
            f,
            "{} shown, {} records in {} pages",
            footer.shown, total, footer.total_pages
        ),
        None => writeln!(f, "{} shown, {} pages", footer.shown, footer.total_pages),
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String; 4], widths: &[usize; 4]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

// =============================================================================
// TESTS
// =============================================================================
