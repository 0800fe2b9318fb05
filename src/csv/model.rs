//! Tabular data model
//!
//! A [`Table`] is an ordered list of [`Row`]s plus the column names fixed by
//! the header of the loaded file. Rows store their cells positionally, aligned
//! with the table's column list, so every row has exactly the table's column
//! set.

use serde::{Deserialize, Serialize};

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// The delimiter as the single byte the `csv` crate expects
    pub fn byte(self) -> u8 {
        self.char() as u8
    }

    /// Delimiter implied by a file extension
    ///
    /// Only `.tsv` and `.psv` name one; `.csv` files are sniffed instead.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tsv" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// One record of the table
///
/// Cells are positional: `cells[i]` belongs to the table's `columns[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell value by column position
    pub fn cell(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pad with empty cells or drop trailing cells so the row has `width` cells
    pub(crate) fn normalize(&mut self, width: usize) {
        self.cells.resize(width, String::new());
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A completed single-cell edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    /// Original (unsorted) row index
    pub row: usize,
    pub column: String,
    pub old_value: String,
    pub new_value: String,
}

/// In-memory table: ordered rows plus the column list from the header
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    /// Separator of the loaded file, reused on export
    delimiter: Delimiter,
    /// Bumped on every mutation; keys memoized projections
    revision: u64,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table directly from a header and rows (rows are normalized)
    pub fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Self::new();
        table.set_columns(columns);
        table.append(rows);
        table
    }

    /// Drop all rows and columns (a new upload starts)
    pub fn reset(&mut self) {
        self.columns.clear();
        self.rows.clear();
        self.delimiter = Delimiter::default();
        self.revision += 1;
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter = delimiter;
    }

    /// Fix the column set. Only the first call has an effect.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        if !self.columns.is_empty() {
            tracing::warn!(
                existing = self.columns.len(),
                "Ignoring column set change after columns were fixed"
            );
            return;
        }
        self.columns = columns;
        self.revision += 1;
    }

    /// Append a batch of rows, normalizing each to the column width
    pub fn append(&mut self, rows: impl IntoIterator<Item = Row>) {
        let width = self.columns.len();
        let before = self.rows.len();
        self.rows.extend(rows.into_iter().map(|mut row| {
            row.normalize(width);
            row
        }));
        if self.rows.len() != before {
            self.revision += 1;
        }
    }

    /// Replace one cell value
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range or `column` is not one of the table's
    /// columns. Callers check with [`Table::contains_cell`] first.
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) -> CellEdit {
        let row_count = self.rows.len();
        assert!(
            row < row_count,
            "set_cell: row index {row} out of range (row count {row_count})"
        );
        let col = match self.column_index(column) {
            Some(col) => col,
            None => panic!("set_cell: unknown column {column:?}"),
        };

        let new_value = value.into();
        let old_value = std::mem::replace(&mut self.rows[row].cells[col], new_value.clone());
        self.revision += 1;

        CellEdit {
            row,
            column: column.to_string(),
            old_value,
            new_value,
        }
    }

    /// Whether `set_cell(row, column, ..)` would be valid
    pub fn contains_cell(&self, row: usize, column: &str) -> bool {
        row < self.rows.len() && self.column_index(column).is_some()
    }

    /// Cell value by original row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.cell(col)
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Both halves of the table at once
    pub fn snapshot(&self) -> (&[Row], &[String]) {
        (&self.rows, &self.columns)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::from_parts(
            vec!["name".into(), "age".into()],
            vec![
                Row::from_iter(["Alice", "30"]),
                Row::from_iter(["Bob", "25"]),
                Row::from_iter(["Carol", "41"]),
            ],
        )
    }

    #[test]
    fn test_from_parts() {
        let table = people();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.get(1, "name"), Some("Bob"));
        assert_eq!(table.get(1, "missing"), None);
        assert_eq!(table.get(9, "name"), None);
    }

    #[test]
    fn test_set_cell_isolates_change() {
        let mut table = people();
        let before: Vec<Row> = table.rows().to_vec();

        let edit = table.set_cell(2, "age", "42");
        assert_eq!(edit.old_value, "41");
        assert_eq!(edit.new_value, "42");

        let (rows, columns) = table.snapshot();
        assert_eq!(columns, ["name", "age"]);
        for (i, (old, new)) in before.iter().zip(rows).enumerate() {
            for col in 0..2 {
                if i == 2 && col == 1 {
                    assert_eq!(new.cell(col), Some("42"));
                } else {
                    assert_eq!(old.cell(col), new.cell(col));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_cell_row_out_of_range_panics() {
        let mut table = people();
        table.set_cell(3, "name", "x");
    }

    #[test]
    #[should_panic(expected = "unknown column")]
    fn test_set_cell_unknown_column_panics() {
        let mut table = people();
        table.set_cell(0, "email", "x");
    }

    #[test]
    fn test_append_normalizes_ragged_rows() {
        let mut table = Table::new();
        table.set_columns(vec!["a".into(), "b".into(), "c".into()]);
        table.append(vec![
            Row::from_iter(["1", "2"]),
            Row::from_iter(["1", "2", "3", "4"]),
        ]);

        assert_eq!(table.row(0).map(Row::len), Some(3));
        assert_eq!(table.get(0, "c"), Some(""));
        assert_eq!(table.row(1).map(Row::len), Some(3));
        assert_eq!(table.get(1, "c"), Some("3"));
    }

    #[test]
    fn test_columns_fixed_once() {
        let mut table = Table::new();
        table.set_columns(vec!["a".into()]);
        table.set_columns(vec!["x".into(), "y".into()]);
        assert_eq!(table.columns(), ["a"]);
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut table = people();
        let r0 = table.revision();
        table.set_cell(0, "name", "Alicia");
        assert!(table.revision() > r0);

        let r1 = table.revision();
        table.append(Vec::new());
        assert_eq!(table.revision(), r1);

        table.reset();
        assert!(table.revision() > r1);
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_contains_cell() {
        let table = people();
        assert!(table.contains_cell(0, "age"));
        assert!(!table.contains_cell(3, "age"));
        assert!(!table.contains_cell(0, "height"));
    }

    #[test]
    fn test_delimiter_bytes() {
        assert_eq!(Delimiter::default(), Delimiter::Comma);
        assert_eq!(Delimiter::Tab.byte(), b'\t');
        assert_eq!(Delimiter::Semicolon.byte(), b';');
    }

    #[test]
    fn test_delimiter_from_extension() {
        assert_eq!(Delimiter::from_extension("tsv"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::from_extension("PSV"), Some(Delimiter::Pipe));
        assert_eq!(Delimiter::from_extension("csv"), None);
    }
}
