//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

use crate::csv::ParserConfig;

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Redraw the grid
    Redraw,
    /// Parse `path` on a background worker for upload `session`.
    /// Any worker from an earlier session is cancelled.
    StartParse {
        session: u64,
        path: PathBuf,
        config: ParserConfig,
    },
    /// Write exported CSV bytes to disk
    WriteExport { path: PathBuf, contents: Vec<u8> },
    /// Request application exit
    Quit,
}

impl Cmd {
    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None | Cmd::Quit => false,
            Cmd::Redraw | Cmd::StartParse { .. } => true,
            Cmd::WriteExport { .. } => false,
        }
    }
}
