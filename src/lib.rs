//! csvgrid - Elm-style CSV grid
//!
//! This crate provides the core types and logic for loading a CSV file in
//! the background, presenting it as a sortable, paginated, editable grid and
//! exporting it again, implementing the Elm Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod csv;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::AppConfig;
pub use messages::Msg;
pub use model::AppModel;
