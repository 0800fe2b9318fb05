//! Utility modules

pub mod file_validation;
pub mod text;

pub use text::{format_count, pluralize_rows};

pub use file_validation::{
    filename_for_display, is_csv_file, is_likely_binary, validate_csv_file, FileOpenError,
    MAX_FILE_SIZE,
};
