//! Runtime module - drives the model outside of tests
//!
//! - `app` - controller owning the model, workers and the message channel
//! - `shell` - line-oriented interactive front end

pub mod app;
pub mod shell;

pub use app::App;
pub use shell::{parse_command, run_shell, ShellCommand};
