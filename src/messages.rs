//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::csv::{ParseEvent, SortDescriptor};

/// Loading messages (file selection, parser progress)
#[derive(Debug, Clone)]
pub enum LoadMsg {
    /// User picked a file to load
    FileSelected(PathBuf),
    /// Progress from the parse worker of upload `session`
    Parsed { session: u64, event: ParseEvent },
}

/// Grid view messages (sorting, paging, scrolling)
#[derive(Debug, Clone)]
pub enum TableMsg {
    /// Column header clicked: advance that column's sort state
    HeaderClicked(String),
    /// Apply a sort directly (startup `--sort`)
    SetSort(SortDescriptor),
    /// Move the page index by a delta (clamped)
    PageChanged(i64),
    /// Jump to a page (0-indexed, clamped)
    GoToPage(usize),
    /// Scroll the viewport within the page (positive = down)
    Scroll(i32),
}

/// Cell editing messages
#[derive(Debug, Clone)]
pub enum EditMsg {
    /// Open the cell at (row on page, column) for editing
    ActivateCell { row: usize, column: String },
    /// Insert a character at the caret
    InsertChar(char),
    /// Insert text at the caret (paste)
    InsertText(String),
    /// Replace the pending text; `caret` is where the input control has it
    SetText { text: String, caret: usize },
    /// Backspace
    DeleteBackward,
    /// Delete
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Write the pending text to the table (blur / Enter)
    Commit,
    /// Close the editor without writing
    Cancel,
    /// Activate, set text and commit in one step
    CommitCell {
        row: usize,
        column: String,
        text: String,
    },
}

/// App messages (export, lifecycle)
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Export the table; `None` uses the configured file name
    ExportRequested(Option<PathBuf>),
    /// Export write finished (async result)
    ExportCompleted(Result<PathBuf, String>),
    /// Quit the application
    Quit,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// Loading messages (file selection, parser progress)
    Load(LoadMsg),
    /// Grid view messages (sort, page, scroll)
    Table(TableMsg),
    /// Cell editing messages
    Edit(EditMsg),
    /// App messages (export, quit)
    App(AppMsg),
}

// Convenience constructors for the core entry points
impl Msg {
    pub fn file_selected(path: impl Into<PathBuf>) -> Self {
        Msg::Load(LoadMsg::FileSelected(path.into()))
    }

    pub fn cell_committed(row: usize, column: impl Into<String>, text: impl Into<String>) -> Self {
        Msg::Edit(EditMsg::CommitCell {
            row,
            column: column.into(),
            text: text.into(),
        })
    }

    pub fn header_clicked(column: impl Into<String>) -> Self {
        Msg::Table(TableMsg::HeaderClicked(column.into()))
    }

    pub fn page_changed(delta: i64) -> Self {
        Msg::Table(TableMsg::PageChanged(delta))
    }

    pub fn export_requested(path: Option<PathBuf>) -> Self {
        Msg::App(AppMsg::ExportRequested(path))
    }
}
