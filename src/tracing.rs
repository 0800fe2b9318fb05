//! Tracing setup and state diffing for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=message=debug,state=debug` - scoped filtering
//! - `RUST_LOG=csvgrid::csv::parser=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/csvgrid/logs/csvgrid.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_NAME;
use crate::model::AppModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). Console output goes to
/// stderr so it never mixes with the grid on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of grid state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    pub session: u64,
    pub rows: usize,
    pub columns: usize,
    pub sort: Option<String>,
    pub page_index: usize,
    pub top_row: usize,
    pub editing: Option<(usize, String, usize)>,
    pub status: String,
}

impl ModelSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        Self {
            session: model.load.session,
            rows: model.table.row_count(),
            columns: model.table.column_count(),
            sort: model
                .sort
                .as_ref()
                .map(|s| format!("{} {:?}", s.column, s.direction)),
            page_index: model.page_index,
            top_row: model.viewport.top_row,
            editing: model.editing.as_ref().map(|e| {
                (
                    e.position.row_in_page,
                    e.position.column.clone(),
                    e.caret(),
                )
            }),
            status: model.load.status.describe(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &ModelSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.session != other.session {
            changes.push(format!("session: {} → {}", self.session, other.session));
        }
        if self.rows != other.rows || self.columns != other.columns {
            changes.push(format!(
                "table: {}x{} → {}x{}",
                self.rows, self.columns, other.rows, other.columns
            ));
        }
        if self.sort != other.sort {
            changes.push(format!("sort: {:?} → {:?}", self.sort, other.sort));
        }
        if self.page_index != other.page_index {
            changes.push(format!(
                "page: {} → {}",
                self.page_index, other.page_index
            ));
        }
        if self.top_row != other.top_row {
            changes.push(format!("top row: {} → {}", self.top_row, other.top_row));
        }
        if self.editing != other.editing {
            changes.push(format!("edit: {:?} → {:?}", self.editing, other.editing));
        }
        if self.status != other.status {
            changes.push(format!("status: {}", other.status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
