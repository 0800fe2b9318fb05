//! Single-cell edit state
//!
//! At most one cell is open for editing at a time. The cursor remembers the
//! cell by its position on the current page, so committing it has to go
//! through the page projection to find the row in the table.

/// Position of a cell on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPosition {
    /// Row within the current page (not an index into the table)
    pub row_in_page: usize,
    pub column: String,
}

impl CellPosition {
    pub fn new(row_in_page: usize, column: impl Into<String>) -> Self {
        Self {
            row_in_page,
            column: column.into(),
        }
    }
}

/// The open cell editor: pending text plus caret
///
/// The caret is a char index into `text`. It is only moved by the editing
/// operations below, so redrawing the grid never resets it.
#[derive(Debug, Clone)]
pub struct EditCursor {
    pub position: CellPosition,
    text: String,
    caret: usize,
    /// Value before editing started
    original: String,
}

impl EditCursor {
    /// Open an editor on `value` with the caret at the end
    pub fn new(position: CellPosition, value: impl Into<String>) -> Self {
        let text = value.into();
        let caret = text.chars().count();
        Self {
            position,
            original: text.clone(),
            text,
            caret,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of char index `idx`
    fn byte_offset(&self, idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(idx)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    /// Replace the whole text, keeping the caret where the input control put
    /// it (clamped to the new length)
    pub fn set_text(&mut self, text: impl Into<String>, caret: usize) {
        self.text = text.into();
        self.caret = caret.min(self.char_count());
    }

    /// Insert character at the caret
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.caret);
        self.text.insert(at, ch);
        self.caret += 1;
    }

    /// Insert text at the caret (paste)
    pub fn insert_text(&mut self, text: &str) {
        // Cell editing is single-line
        let clean: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        let at = self.byte_offset(self.caret);
        self.text.insert_str(at, &clean);
        self.caret += clean.chars().count();
    }

    /// Delete character before the caret (backspace)
    pub fn delete_backward(&mut self) {
        if self.caret == 0 {
            return;
        }
        let at = self.byte_offset(self.caret - 1);
        self.text.remove(at);
        self.caret -= 1;
    }

    /// Delete character at the caret (delete)
    pub fn delete_forward(&mut self) {
        if self.caret >= self.char_count() {
            return;
        }
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
    }

    pub fn cursor_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.caret = (self.caret + 1).min(self.char_count());
    }

    pub fn cursor_home(&mut self) {
        self.caret = 0;
    }

    pub fn cursor_end(&mut self) {
        self.caret = self.char_count();
    }

    /// Text split at the caret, for drawing the caret marker
    pub fn split_at_caret(&self) -> (&str, &str) {
        self.text.split_at(self.byte_offset(self.caret))
    }

    /// Consume the editor, returning its position and final text
    pub fn finish(self) -> (CellPosition, String) {
        (self.position, self.text)
    }
}
