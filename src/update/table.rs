//! Sorting, paging and scrolling

use crate::commands::Cmd;
use crate::csv::{clamp_page, offset_page, SortDescriptor};
use crate::messages::TableMsg;
use crate::model::AppModel;

use super::edit::commit_pending_edit;

/// Handle grid view messages
pub fn update_table(model: &mut AppModel, msg: TableMsg) -> Option<Cmd> {
    match msg {
        TableMsg::HeaderClicked(column) => header_clicked(model, &column),
        TableMsg::SetSort(sort) => {
            if model.table.column_index(&sort.column).is_none() {
                tracing::warn!("Ignoring sort on unknown column {:?}", sort.column);
                return None;
            }
            commit_pending_edit(model);
            model.sort = Some(sort);
            Some(Cmd::Redraw)
        }
        TableMsg::PageChanged(delta) => {
            let target = offset_page(
                model.page_index,
                delta,
                model.table.row_count(),
                model.page_size,
            );
            go_to_page(model, target)
        }
        TableMsg::GoToPage(page) => {
            let target = clamp_page(page, model.table.row_count(), model.page_size);
            if target != page {
                tracing::warn!(requested = page, clamped = target, "Page out of range");
            }
            go_to_page(model, target)
        }
        TableMsg::Scroll(delta) => {
            let rows_on_page = model.projection().len();
            let before = model.viewport.top_row;
            model.viewport.scroll_by(delta, rows_on_page);
            (model.viewport.top_row != before).then_some(Cmd::Redraw)
        }
    }
}

/// Advance the clicked column through ascending, descending, unsorted
fn header_clicked(model: &mut AppModel, column: &str) -> Option<Cmd> {
    if model.table.column_index(column).is_none() {
        tracing::warn!("Ignoring sort on unknown column {:?}", column);
        return None;
    }

    commit_pending_edit(model);

    model.sort = SortDescriptor::cycle(model.sort.as_ref(), column);
    model.page_index = clamp_page(model.page_index, model.table.row_count(), model.page_size);

    tracing::debug!(sort = ?model.sort, "Sort changed");
    Some(Cmd::Redraw)
}

fn go_to_page(model: &mut AppModel, target: usize) -> Option<Cmd> {
    if target == model.page_index {
        return None;
    }

    commit_pending_edit(model);

    model.page_index = target;
    model.viewport.reset();
    Some(Cmd::Redraw)
}
