//! Application model - the complete state of the grid
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod notification;

pub use notification::{Notification, NotificationLevel, Notifications};

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::csv::render::GridFrame;
use crate::csv::{
    export_csv, EditCursor, ExportError, GridViewport, Projection, ProjectionCache,
    SortDescriptor, Table,
};
use crate::util::pluralize_rows;

/// Where the current upload is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded yet
    #[default]
    Idle,
    /// Parse worker running
    Loading { rows_received: usize },
    /// Parse finished
    Loaded { rows: usize },
    /// Parse stopped with an error; rows received so far are kept
    Failed { error: String },
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading { .. })
    }

    /// One-line description for the status command
    pub fn describe(&self) -> String {
        match self {
            LoadStatus::Idle => "No file loaded".to_string(),
            LoadStatus::Loading { rows_received } => {
                format!("Loading… {} received", pluralize_rows(*rows_received))
            }
            LoadStatus::Loaded { rows } => format!("Loaded {}", pluralize_rows(*rows)),
            LoadStatus::Failed { error } => format!("Load failed: {}", error),
        }
    }
}

/// Upload tracking
///
/// `session` increases with every accepted file selection; parser messages
/// from any other session are discarded.
#[derive(Debug, Clone, Default)]
pub struct LoadState {
    pub session: u64,
    pub file: Option<PathBuf>,
    pub status: LoadStatus,
}

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    pub config: AppConfig,
    /// Rows in load order
    pub table: Table,
    /// Active sort, `None` for load order
    pub sort: Option<SortDescriptor>,
    /// Current page (0-indexed)
    pub page_index: usize,
    pub page_size: usize,
    /// The cell being edited, if any
    pub editing: Option<EditCursor>,
    /// Scroll position within the current page
    pub viewport: GridViewport,
    pub load: LoadState,
    pub notifications: Notifications,
    projection_cache: ProjectionCache,
}

impl AppModel {
    pub fn new(config: AppConfig) -> Self {
        let config = config.sanitized();
        Self {
            page_size: config.page_size,
            viewport: config.viewport(),
            config,
            table: Table::new(),
            sort: None,
            page_index: 0,
            editing: None,
            load: LoadState::default(),
            notifications: Notifications::new(),
            projection_cache: ProjectionCache::new(),
        }
    }

    /// Current page of the sorted table
    ///
    /// The sort permutation is cached against the table revision, so calling
    /// this after every message only re-sorts when rows or cells changed.
    pub fn projection(&mut self) -> Projection {
        self.projection_cache.project(
            &self.table,
            self.sort.as_ref(),
            self.page_index,
            self.page_size,
        )
    }

    /// Drop everything derived from the previous upload
    pub fn reset_view(&mut self) {
        self.table.reset();
        self.sort = None;
        self.page_index = 0;
        self.editing = None;
        self.viewport.reset();
        self.projection_cache.invalidate();
    }

    /// CSV bytes of the whole table in load order, edits included
    pub fn export_bytes(&self) -> Result<Vec<u8>, ExportError> {
        export_csv(
            &self.table,
            self.table.delimiter(),
            self.config.line_terminator,
        )
    }

    /// Text rendering of the visible part of the current page
    pub fn render(&mut self) -> Vec<String> {
        let projection = self.projection();
        GridFrame {
            table: &self.table,
            projection: &projection,
            viewport: &self.viewport,
            sort: self.sort.as_ref(),
            editing: self.editing.as_ref(),
        }
        .render()
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::Row;

    #[test]
    fn test_new_takes_sizes_from_config() {
        let model = AppModel::new(AppConfig {
            page_size: 0,
            viewport_rows: 8,
            ..AppConfig::default()
        });
        assert_eq!(model.page_size, 1);
        assert_eq!(model.viewport.visible_rows, 8);
        assert_eq!(model.load.status, LoadStatus::Idle);
    }

    #[test]
    fn test_projection_follows_sort_and_edits() {
        let mut model = AppModel::default();
        model.table = Table::from_parts(
            vec!["name".into()],
            vec![Row::from_iter(["b"]), Row::from_iter(["a"])],
        );
        model.sort = Some(SortDescriptor::ascending("name"));
        assert_eq!(model.projection().page_indices(), &[1, 0]);

        model.table.set_cell(0, "name", "0");
        assert_eq!(model.projection().page_indices(), &[0, 1]);
    }

    #[test]
    fn test_reset_view() {
        let mut model = AppModel::default();
        model.table = Table::from_parts(vec!["a".into()], vec![Row::from_iter(["1"])]);
        model.sort = Some(SortDescriptor::descending("a"));
        model.page_index = 3;
        model.reset_view();
        assert!(model.table.is_empty());
        assert_eq!(model.table.column_count(), 0);
        assert!(model.sort.is_none());
        assert_eq!(model.page_index, 0);
    }

    #[test]
    fn test_status_describe() {
        assert_eq!(
            LoadStatus::Loaded { rows: 2500 }.describe(),
            "Loaded 2,500 rows"
        );
        assert!(LoadStatus::Loading { rows_received: 1 }.is_loading());
    }
}
