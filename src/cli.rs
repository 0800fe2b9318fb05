//! Command-line argument parsing
//!
//! Supports:
//! - Opening a CSV file at startup
//! - Overriding page and chunk sizes from the config file
//! - Initial sort (interactive only)
//! - Headless export (load, export, exit)

use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

/// View, sort, edit and export CSV files
#[derive(Parser, Debug)]
#[command(
    name = "csvgrid",
    version,
    about = "View, sort, edit and export CSV files"
)]
pub struct CliArgs {
    /// CSV file to open
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Rows per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Rows per parser chunk
    #[arg(long, value_name = "N")]
    pub chunk_rows: Option<usize>,

    /// Sort by this column once loaded (not with --export, which writes load order)
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending (used with --sort)
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// Export to PATH and exit without opening the shell
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Read configuration from PATH instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Initial sort requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialSort {
    pub column: String,
    pub descending: bool,
}

/// What to do after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Open the interactive shell
    Interactive,
    /// Load `file`, write it to `output`, exit
    Export { output: PathBuf },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: StartupMode,
    /// File to load first
    pub file: Option<PathBuf>,
    pub sort: Option<InitialSort>,
    /// Config file given with `--config`
    pub config_path: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub chunk_rows: Option<usize>,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        if self.page_size == Some(0) {
            return Err("--page-size must be at least 1".to_string());
        }
        if self.chunk_rows == Some(0) {
            return Err("--chunk-rows must be at least 1".to_string());
        }

        let mode = match self.export {
            Some(output) => {
                if self.file.is_none() {
                    return Err("--export needs a FILE to load".to_string());
                }
                if self.sort.is_some() {
                    return Err(
                        "--sort has no effect with --export (exports keep load order)".to_string(),
                    );
                }
                StartupMode::Export { output }
            }
            None => StartupMode::Interactive,
        };

        let sort = self.sort.map(|column| InitialSort {
            column,
            descending: self.descending,
        });

        Ok(StartupConfig {
            mode,
            file: self.file,
            sort,
            config_path: self.config,
            page_size: self.page_size,
            chunk_rows: self.chunk_rows,
        })
    }
}

impl StartupConfig {
    /// Load the config file and apply command-line overrides
    pub fn app_config(&self) -> AppConfig {
        let mut config = match &self.config_path {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(),
        };
        self.apply_overrides(&mut config);
        config
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(chunk_rows) = self.chunk_rows {
            config.chunk_rows = chunk_rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            file: None,
            page_size: None,
            chunk_rows: None,
            sort: None,
            descending: false,
            export: None,
            config: None,
        }
    }

    #[test]
    fn test_no_args_is_interactive() {
        let config = args().into_config().unwrap();
        assert_eq!(config.mode, StartupMode::Interactive);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_export_requires_file() {
        let result = CliArgs {
            export: Some(PathBuf::from("out.csv")),
            ..args()
        }
        .into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_export_mode() {
        let config = CliArgs {
            file: Some(PathBuf::from("data.csv")),
            export: Some(PathBuf::from("out.csv")),
            ..args()
        }
        .into_config()
        .unwrap();

        assert_eq!(
            config.mode,
            StartupMode::Export {
                output: PathBuf::from("out.csv")
            }
        );
        assert!(config.sort.is_none());
    }

    #[test]
    fn test_sort_rejected_with_export() {
        let result = CliArgs {
            file: Some(PathBuf::from("data.csv")),
            export: Some(PathBuf::from("out.csv")),
            sort: Some("name".into()),
            ..args()
        }
        .into_config();
        assert!(result.unwrap_err().contains("--sort"));
    }

    #[test]
    fn test_interactive_sort() {
        let config = CliArgs {
            file: Some(PathBuf::from("data.csv")),
            sort: Some("name".into()),
            descending: true,
            ..args()
        }
        .into_config()
        .unwrap();

        assert_eq!(config.mode, StartupMode::Interactive);
        assert_eq!(
            config.sort,
            Some(InitialSort {
                column: "name".into(),
                descending: true
            })
        );
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let result = CliArgs {
            page_size: Some(0),
            ..args()
        }
        .into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "page_size: 10\nchunk_rows: 20\n").unwrap();

        let config = CliArgs {
            page_size: Some(25),
            config: Some(path),
            ..args()
        }
        .into_config()
        .unwrap()
        .app_config();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.chunk_rows, 20);
    }

    #[test]
    fn test_clap_parses_flags() {
        let parsed = CliArgs::try_parse_from([
            "csvgrid",
            "data.csv",
            "--page-size",
            "50",
            "--sort",
            "name",
            "--descending",
        ])
        .unwrap();
        assert_eq!(parsed.file, Some(PathBuf::from("data.csv")));
        assert_eq!(parsed.page_size, Some(50));
        assert!(parsed.descending);

        assert!(CliArgs::try_parse_from(["csvgrid", "--descending"]).is_err());
    }
}
