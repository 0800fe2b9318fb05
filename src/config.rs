//! Application configuration
//!
//! Stored in `~/.config/csvgrid/config.yaml`. Every field is optional in the
//! file; missing fields take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::csv::{Delimiter, GridViewport, LineTerminator, ParserConfig};

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rows per grid page
    pub page_size: usize,
    /// Rows per parser chunk
    pub chunk_rows: usize,
    /// Pause between parser chunks, in milliseconds
    pub chunk_pause_ms: u64,
    /// Rows that fit in the grid viewport
    pub viewport_rows: usize,
    /// Extra rows drawn above and below the viewport
    pub overscan_rows: usize,
    /// Default file name for exports
    pub export_file_name: String,
    /// Fixed delimiter; unset detects it per file
    pub delimiter: Option<Delimiter>,
    pub line_terminator: LineTerminator,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            chunk_rows: 1000,
            chunk_pause_ms: 50,
            viewport_rows: 15,
            overscan_rows: 2,
            export_file_name: "exported_data.csv".to_string(),
            delimiter: None,
            line_terminator: LineTerminator::Crlf,
        }
    }
}

impl AppConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse YAML and sanitize the values
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Zero sizes would make paging and chunking meaningless
    pub fn sanitized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.chunk_rows = self.chunk_rows.max(1);
        self.viewport_rows = self.viewport_rows.max(1);
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = Self::default().export_file_name;
        }
        self
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            delimiter: self.delimiter,
            chunk_rows: self.chunk_rows,
            chunk_pause: Duration::from_millis(self.chunk_pause_ms),
        }
    }

    pub fn viewport(&self) -> GridViewport {
        GridViewport::new(self.viewport_rows, self.overscan_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.export_file_name, "exported_data.csv");
        assert_eq!(config.parser_config().chunk_pause, Duration::from_millis(50));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = AppConfig::from_yaml("page_size: 25\ndelimiter: semicolon\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.delimiter, Some(Delimiter::Semicolon));
        assert_eq!(config.chunk_rows, 1000);
        assert_eq!(config.line_terminator, LineTerminator::Crlf);
    }

    #[test]
    fn test_zero_values_sanitized() {
        let config =
            AppConfig::from_yaml("page_size: 0\nchunk_rows: 0\nexport_file_name: ''\n").unwrap();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.chunk_rows, 1);
        assert_eq!(config.export_file_name, "exported_data.csv");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml("page_size: [oops").is_err());
    }

    #[test]
    fn test_serialized_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let config = AppConfig {
            page_size: 7,
            line_terminator: LineTerminator::Lf,
            ..AppConfig::default()
        };

        std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.yaml"));
        assert_eq!(config, AppConfig::default());
    }
}
