//! Export and lifecycle

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::AppModel;

use super::edit::commit_pending_edit;

/// Handle app messages
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::ExportRequested(path) => export_requested(model, path),
        AppMsg::ExportCompleted(Ok(path)) => {
            tracing::info!("Exported to {}", path.display());
            model.notifications.info(
                "Export successful",
                format!("Your data has been exported to {}.", path.display()),
            );
            Some(Cmd::Redraw)
        }
        AppMsg::ExportCompleted(Err(e)) => {
            tracing::error!("Export failed: {}", e);
            model.notifications.error("Export failed", e);
            Some(Cmd::Redraw)
        }
        AppMsg::Quit => {
            commit_pending_edit(model);
            Some(Cmd::Quit)
        }
    }
}

fn export_requested(model: &mut AppModel, path: Option<PathBuf>) -> Option<Cmd> {
    commit_pending_edit(model);

    if model.table.column_count() == 0 {
        model
            .notifications
            .warning("Nothing to export", "Load a CSV file first.");
        return Some(Cmd::Redraw);
    }

    let contents = match model.export_bytes() {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!("{}", e);
            model.notifications.error("Export failed", e.to_string());
            return Some(Cmd::Redraw);
        }
    };

    let path = path.unwrap_or_else(|| PathBuf::from(&model.config.export_file_name));
    tracing::debug!(bytes = contents.len(), "Writing export to {}", path.display());
    Some(Cmd::WriteExport { path, contents })
}
