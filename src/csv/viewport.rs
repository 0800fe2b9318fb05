//! Virtualized row window
//!
//! Tracks which rows of the current page are on screen. Only the rows in
//! [`GridViewport::render_range`] are drawn, so drawing cost depends on the
//! viewport height, not on the table size.

use std::ops::Range;

/// Viewport state for the grid
#[derive(Debug, Clone)]
pub struct GridViewport {
    /// First visible row of the page (0-indexed)
    pub top_row: usize,
    /// Number of rows that fit in the viewport
    pub visible_rows: usize,
    /// Extra rows drawn above and below the visible region
    pub overscan: usize,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self::new(15, 2)
    }
}

impl GridViewport {
    /// Create a new viewport with given dimensions
    pub fn new(visible_rows: usize, overscan: usize) -> Self {
        Self {
            top_row: 0,
            visible_rows: visible_rows.max(1),
            overscan,
        }
    }

    /// Rows to draw for a page of `row_count` rows
    pub fn render_range(&self, row_count: usize) -> Range<usize> {
        let start = self.top_row.saturating_sub(self.overscan).min(row_count);
        let end = (self.top_row + self.visible_rows + self.overscan).min(row_count);
        start..end
    }

    /// Scroll by `delta` rows, clamped to the page
    pub fn scroll_by(&mut self, delta: i32, row_count: usize) {
        let top = if delta.is_negative() {
            self.top_row.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.top_row.saturating_add(delta as usize)
        };
        self.top_row = top.min(self.max_top(row_count));
    }

    /// Ensure a row is visible, scrolling if necessary
    pub fn ensure_visible(&mut self, row: usize, row_count: usize) {
        if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row + self.visible_rows {
            self.top_row = row.saturating_sub(self.visible_rows - 1);
        }
        self.top_row = self.top_row.min(self.max_top(row_count));
    }

    /// Back to the first row (page change)
    pub fn reset(&mut self) {
        self.top_row = 0;
    }

    fn max_top(&self, row_count: usize) -> usize {
        row_count.saturating_sub(self.visible_rows)
    }
}
