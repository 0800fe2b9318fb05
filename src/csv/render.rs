//! Text grid rendering
//!
//! Renders one page of the table as plain-text lines:
//! - Column headers with sort indicators
//! - Row-number gutter (1-based position on the page)
//! - Only the rows inside the viewport's render range
//! - The cell being edited, with a caret marker
//! - A footer with the entry range and page indicator

use super::edit::EditCursor;
use super::model::Table;
use super::projection::{Projection, SortDescriptor, SortDirection};
use super::viewport::GridViewport;

const MIN_WIDTH: usize = 4;
const MAX_WIDTH: usize = 40;

/// Caret marker drawn inside the cell being edited
pub const CARET: char = '|';

/// Check if a string looks like a number (for right-alignment)
pub fn is_number(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.parse::<f64>().is_ok()
}

/// Truncate text with ellipsis if too long
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        s.chars().take(max_chars).collect()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('…');
        result
    }
}

fn sort_indicator(column: &str, sort: Option<&SortDescriptor>) -> char {
    match sort {
        Some(s) if s.column == column => match s.direction {
            SortDirection::Ascending => '▲',
            SortDirection::Descending => '▼',
        },
        _ => '↕',
    }
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let len = text.chars().count();
    let fill = " ".repeat(width.saturating_sub(len));
    if right_align {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

/// Everything the renderer needs for one frame
pub struct GridFrame<'a> {
    pub table: &'a Table,
    pub projection: &'a Projection,
    pub viewport: &'a GridViewport,
    pub sort: Option<&'a SortDescriptor>,
    pub editing: Option<&'a EditCursor>,
}

impl GridFrame<'_> {
    fn cell_text(&self, row_in_page: usize, col: usize, column: &str) -> String {
        if let Some(edit) = self.editing {
            if edit.position.row_in_page == row_in_page && edit.position.column == column {
                let (before, after) = edit.split_at_caret();
                return format!("{}{}{}", before, CARET, after);
            }
        }
        self.projection
            .original_index_of(row_in_page)
            .and_then(|index| self.table.row(index))
            .and_then(|row| row.cell(col))
            .unwrap_or_default()
            .to_string()
    }

    /// Column widths from the header and the rows being drawn
    fn column_widths(&self, rows: &std::ops::Range<usize>) -> Vec<usize> {
        self.table
            .columns()
            .iter()
            .enumerate()
            .map(|(col, name)| {
                // header text + space + indicator
                let mut width = name.chars().count() + 2;
                for r in rows.clone() {
                    width = width.max(self.cell_text(r, col, name).chars().count());
                }
                width.clamp(MIN_WIDTH, MAX_WIDTH)
            })
            .collect()
    }

    /// Render the frame to lines of text
    pub fn render(&self) -> Vec<String> {
        let columns = self.table.columns();
        if columns.is_empty() {
            return vec!["(no data loaded)".to_string()];
        }

        let range = self.viewport.render_range(self.projection.len());
        let widths = self.column_widths(&range);
        let gutter = (range.end.max(1)).to_string().len().max(1);

        let mut lines = Vec::with_capacity(range.len() + 4);

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(name, &w)| {
                let label = format!("{} {}", name, sort_indicator(name, self.sort));
                pad(&truncate_text(&label, w), w, false)
            })
            .collect();
        lines.push(format!("{} | {}", pad("#", gutter, true), header.join(" | ")));

        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        lines.push(format!("{}-+-{}", "-".repeat(gutter), rule.join("-+-")));

        for r in range {
            let cells: Vec<String> = columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (name, &w))| {
                    let text = self.cell_text(r, col, name);
                    pad(&truncate_text(&text, w), w, is_number(&text))
                })
                .collect();
            lines.push(format!(
                "{} | {}",
                pad(&(r + 1).to_string(), gutter, true),
                cells.join(" | ")
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "{}  ·  Page {} of {}",
            self.projection.range_label(),
            self.projection.page_index() + 1,
            self.projection.page_count().max(1)
        ));

        lines
    }
}
