//! File validation before loading
//!
//! Checks a selected file before any parsing starts:
//! - File existence and permissions
//! - File size limits
//! - Delimited text file type (`.csv`, `.tsv`, `.psv`)
//! - Binary file detection

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Maximum file size in bytes (512 MB)
pub const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Extensions accepted as delimited text
const CSV_EXTENSIONS: &[&str] = &["csv", "tsv", "psv"];

/// Errors that can occur when validating a file for loading
#[derive(Debug, Clone)]
pub enum FileOpenError {
    /// File does not exist
    NotFound,
    /// Permission denied to read file
    PermissionDenied,
    /// Path is a directory, not a file
    IsDirectory,
    /// Not a CSV file
    InvalidType,
    /// File appears to be binary (contains null bytes)
    BinaryFile,
    /// File exceeds size limit
    TooLarge { size_mb: f64 },
    /// Other I/O error
    IoError(String),
}

impl FileOpenError {
    /// Get a user-friendly error message
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot open directory: {}", filename),
            Self::InvalidType => format!("Please upload a CSV file ({} is not one)", filename),
            Self::BinaryFile => format!("Cannot open binary file: {}", filename),
            Self::TooLarge { size_mb } => {
                format!(
                    "{} is too large ({:.1} MB, max {} MB)",
                    filename,
                    size_mb,
                    MAX_FILE_SIZE / (1024 * 1024)
                )
            }
            Self::IoError(msg) => format!("Error opening {}: {}", filename, msg),
        }
    }

    /// Notification title for this error
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidType | Self::BinaryFile => "Invalid file type",
            _ => "Cannot open file",
        }
    }
}

impl std::fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::InvalidType => write!(f, "not a CSV file"),
            Self::BinaryFile => write!(f, "binary file"),
            Self::TooLarge { size_mb } => write!(f, "file too large ({:.1} MB)", size_mb),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

/// Check if a file path has a delimited-text extension
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CSV_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a file is likely binary by scanning for null bytes
///
/// Reads the first 8KB of the file and checks for null bytes,
/// which are common in binary files but rare in text files.
///
/// Returns `false` on any read error (let the actual open fail with a better error).
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; 8192];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// Validate a file before handing it to the parser
///
/// Checks, in order:
/// - File exists, is not a directory, is readable
/// - Has a `.csv`, `.tsv` or `.psv` extension
/// - Does not exceed size limit
/// - Does not look binary
pub fn validate_csv_file(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound,
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied,
        _ => FileOpenError::IoError(e.to_string()),
    })?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if !is_csv_file(path) {
        return Err(FileOpenError::InvalidType);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    if is_likely_binary(path) {
        return Err(FileOpenError::BinaryFile);
    }

    Ok(())
}

/// Get the filename from a path for display in messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
