//! CSV serialization of the table
//!
//! Writes the header then every row in original (unsorted) order, quoting
//! only the fields that need it.

use serde::{Deserialize, Serialize};

use super::model::{Delimiter, Table};

/// Line ending written after each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Crlf,
    Lf,
}

impl LineTerminator {
    fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::Crlf => csv::Terminator::CRLF,
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}

/// Error type for CSV export
#[derive(Debug)]
pub struct ExportError {
    pub message: String,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CSV export error: {}", self.message)
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Serialize the table to CSV bytes
///
/// A table with columns but no rows produces just the header; a table with
/// no columns produces nothing.
pub fn export_csv(
    table: &Table,
    delimiter: Delimiter,
    terminator: LineTerminator,
) -> Result<Vec<u8>, ExportError> {
    let (rows, columns) = table.snapshot();
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .terminator(terminator.to_csv())
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }

    writer.into_inner().map_err(|e| ExportError {
        message: e.error().to_string(),
    })
}
