//! Where csvgrid keeps its files
//!
//! ```text
//! <config root>/csvgrid/
//! ├── config.yaml
//! └── logs/
//!     └── csvgrid.log.YYYY-MM-DD
//! ```
//!
//! The config root is `$XDG_CONFIG_HOME`, falling back to `~/.config`, or
//! `%APPDATA%` on Windows.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "csvgrid";
const CONFIG_FILE_NAME: &str = "config.yaml";
const LOGS_DIR_NAME: &str = "logs";

/// Prefix of the daily log files
pub const LOG_FILE_NAME: &str = "csvgrid.log";

fn config_root() -> Option<PathBuf> {
    if cfg!(windows) {
        return env::var_os("APPDATA").map(PathBuf::from);
    }
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

pub fn config_dir() -> Option<PathBuf> {
    config_root().map(|root| root.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOGS_DIR_NAME))
}

/// Create the logs directory and its parents
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let dir = logs_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no config directory available")
    })?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Newest daily log file, if logging has written one yet
pub fn log_file() -> Option<PathBuf> {
    fs::read_dir(logs_dir()?)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| log_date(&entry.file_name().to_string_lossy()).is_some())
        .map(|entry| entry.path())
        // ISO dates order lexically
        .max()
}

/// The `YYYY-MM-DD` suffix of a rolled log file name
fn log_date(file_name: &str) -> Option<&str> {
    let date = file_name.strip_prefix(LOG_FILE_NAME)?.strip_prefix('.')?;
    let well_formed = date.len() == 10
        && date
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    well_formed.then_some(date)
}
