//! Cell editing
//!
//! At most one cell is open at a time. The open cell is addressed by its
//! position on the current page; committing resolves that position to the
//! row's load-order index through the projection, so edits land on the right
//! row whatever the sort.

use crate::commands::Cmd;
use crate::csv::{CellPosition, EditCursor};
use crate::messages::EditMsg;
use crate::model::AppModel;

/// Handle cell editing messages
pub fn update_edit(model: &mut AppModel, msg: EditMsg) -> Option<Cmd> {
    match msg {
        EditMsg::ActivateCell { row, column } => {
            activate_cell(model, row, &column);
            Some(Cmd::Redraw)
        }
        EditMsg::InsertChar(ch) => with_cursor(model, |c| c.insert_char(ch)),
        EditMsg::InsertText(text) => with_cursor(model, |c| c.insert_text(&text)),
        EditMsg::SetText { text, caret } => with_cursor(model, |c| c.set_text(text, caret)),
        EditMsg::DeleteBackward => with_cursor(model, EditCursor::delete_backward),
        EditMsg::DeleteForward => with_cursor(model, EditCursor::delete_forward),
        EditMsg::CursorLeft => with_cursor(model, EditCursor::cursor_left),
        EditMsg::CursorRight => with_cursor(model, EditCursor::cursor_right),
        EditMsg::CursorHome => with_cursor(model, EditCursor::cursor_home),
        EditMsg::CursorEnd => with_cursor(model, EditCursor::cursor_end),
        EditMsg::Commit => {
            model.editing.as_ref()?;
            commit_pending_edit(model);
            Some(Cmd::Redraw)
        }
        EditMsg::Cancel => {
            let cursor = model.editing.take()?;
            tracing::debug!(
                row = cursor.position.row_in_page,
                column = %cursor.position.column,
                "Edit cancelled"
            );
            Some(Cmd::Redraw)
        }
        EditMsg::CommitCell { row, column, text } => {
            if activate_cell(model, row, &column) {
                if let Some(cursor) = model.editing.as_mut() {
                    let caret = text.chars().count();
                    cursor.set_text(text, caret);
                }
                commit_pending_edit(model);
            }
            Some(Cmd::Redraw)
        }
    }
}

fn with_cursor(model: &mut AppModel, f: impl FnOnce(&mut EditCursor)) -> Option<Cmd> {
    let Some(cursor) = model.editing.as_mut() else {
        tracing::debug!("Edit operation with no cell open");
        return None;
    };
    f(cursor);
    Some(Cmd::Redraw)
}

/// Open the cell at `row` (on the current page) in `column`
///
/// Any other open cell is committed first. Returns whether the requested
/// cell ended up open.
fn activate_cell(model: &mut AppModel, row: usize, column: &str) -> bool {
    if model.load.status.is_loading() {
        tracing::warn!("Ignoring cell edit while a file is loading");
        return false;
    }
    if model.table.column_index(column).is_none() {
        tracing::warn!("Ignoring edit on unknown column {:?}", column);
        return false;
    }

    let Some(original) = model.projection().original_index_of(row) else {
        tracing::warn!(row, "Ignoring edit on row outside the current page");
        return false;
    };

    if let Some(open) = &model.editing {
        if open.position.row_in_page == row && open.position.column == column {
            return true;
        }
    }

    let target = if commit_pending_edit(model) {
        // The commit may have moved rows under the active sort
        let projection = model.projection();
        match projection.page_indices().iter().position(|&i| i == original) {
            Some(moved_to) => moved_to,
            None => {
                tracing::debug!("Edited row moved off the page; not opening the cell");
                return false;
            }
        }
    } else {
        row
    };

    let rows_on_page = model.projection().len();
    let value = model.table.get(original, column).unwrap_or_default().to_string();

    model.editing = Some(EditCursor::new(CellPosition::new(target, column), value));
    model.viewport.ensure_visible(target, rows_on_page);
    true
}

/// Write the open cell back to the table and close it
///
/// Returns whether the table changed. Unmodified text closes the cell
/// without touching the table.
pub(super) fn commit_pending_edit(model: &mut AppModel) -> bool {
    let Some(cursor) = model.editing.take() else {
        return false;
    };
    if !cursor.is_modified() {
        return false;
    }

    let (position, text) = cursor.finish();
    let Some(index) = model.projection().original_index_of(position.row_in_page) else {
        tracing::warn!(
            row = position.row_in_page,
            "Open cell no longer on the page; dropping edit"
        );
        return false;
    };
    if !model.table.contains_cell(index, &position.column) {
        tracing::warn!(index, column = %position.column, "Dropping edit for missing cell");
        return false;
    }

    let edit = model.table.set_cell(index, &position.column, text);
    tracing::debug!(
        row = edit.row,
        column = %edit.column,
        old = %edit.old_value,
        new = %edit.new_value,
        "Cell updated"
    );
    true
}
