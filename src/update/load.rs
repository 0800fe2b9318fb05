//! File selection and parser progress

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::csv::{Chunk, ParseError, ParseEvent};
use crate::messages::LoadMsg;
use crate::model::{AppModel, LoadStatus};
use crate::util::{filename_for_display, format_count, validate_csv_file};

/// Handle loading messages
pub fn update_load(model: &mut AppModel, msg: LoadMsg) -> Option<Cmd> {
    match msg {
        LoadMsg::FileSelected(path) => file_selected(model, path),
        LoadMsg::Parsed { session, event } => {
            if session != model.load.session {
                tracing::debug!(
                    session,
                    current = model.load.session,
                    "Discarding parse event from superseded upload"
                );
                return None;
            }
            match event {
                ParseEvent::Chunk(chunk) => chunk_received(model, chunk),
                ParseEvent::Complete { rows } => parse_completed(model, rows),
                ParseEvent::Failed(error) => parse_failed(model, error),
            }
        }
    }
}

fn file_selected(model: &mut AppModel, path: PathBuf) -> Option<Cmd> {
    let filename = filename_for_display(&path);

    if let Err(e) = validate_csv_file(&path) {
        tracing::warn!("Rejected {}: {}", path.display(), e);
        model
            .notifications
            .error(e.title(), e.user_message(&filename));
        return Some(Cmd::Redraw);
    }

    // A worker still running for the previous session gets cancelled by the
    // runtime when it sees the new StartParse
    model.load.session += 1;
    model.reset_view();
    model.load.file = Some(path.clone());
    model.load.status = LoadStatus::Loading { rows_received: 0 };

    tracing::info!(
        session = model.load.session,
        "Loading {}",
        path.display()
    );

    Some(Cmd::StartParse {
        session: model.load.session,
        path,
        config: model.config.parser_config(),
    })
}

fn chunk_received(model: &mut AppModel, chunk: Chunk) -> Option<Cmd> {
    if model.table.column_count() == 0 {
        model.table.set_columns(chunk.headers.as_ref().clone());
        model.table.set_delimiter(chunk.delimiter);
    }
    model.table.append(chunk.rows);

    let rows_received = model.table.row_count();
    if let LoadStatus::Loading { rows_received: r } = &mut model.load.status {
        *r = rows_received;
    }

    Some(Cmd::Redraw)
}

fn parse_completed(model: &mut AppModel, reported: usize) -> Option<Cmd> {
    let rows = model.table.row_count();
    if rows != reported {
        tracing::warn!(
            reported,
            received = rows,
            "Parser row count differs from rows received"
        );
    }

    model.load.status = LoadStatus::Loaded { rows };
    let description = if rows == 1 {
        "1 row has been loaded.".to_string()
    } else {
        format!("{} rows have been loaded.", format_count(rows))
    };
    model
        .notifications
        .info("File uploaded successfully", description);

    tracing::info!(session = model.load.session, rows, "Load complete");
    Some(Cmd::Redraw)
}

fn parse_failed(model: &mut AppModel, error: ParseError) -> Option<Cmd> {
    tracing::warn!(
        session = model.load.session,
        kept_rows = model.table.row_count(),
        "Parse failed: {}",
        error
    );

    model
        .notifications
        .error("Error parsing file", format!("Please check your CSV file format. {}", error));
    model.load.status = LoadStatus::Failed {
        error: error.to_string(),
    };
    Some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::{Delimiter, ParseErrorKind, Row};
    use std::io::Write;
    use std::sync::Arc;

    fn chunk(headers: &[&str], rows: &[&[&str]]) -> Chunk {
        Chunk {
            headers: Arc::new(headers.iter().map(|h| h.to_string()).collect()),
            delimiter: Delimiter::Comma,
            rows: rows.iter().map(|r| Row::from_iter(r.iter().copied())).collect(),
        }
    }

    fn parsed(session: u64, event: ParseEvent) -> LoadMsg {
        LoadMsg::Parsed { session, event }
    }

    #[test]
    fn test_file_selected_starts_parse() {
        let mut temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp, "a,b").unwrap();

        let mut model = AppModel::default();
        let cmd = update_load(&mut model, LoadMsg::FileSelected(temp.path().to_path_buf()));

        assert!(matches!(cmd, Some(Cmd::StartParse { session: 1, .. })));
        assert_eq!(model.load.session, 1);
        assert!(model.load.status.is_loading());
    }

    #[test]
    fn test_invalid_file_changes_nothing() {
        let mut model = AppModel::default();
        model.load.session = 4;

        let cmd = update_load(&mut model, LoadMsg::FileSelected("notes.txt".into()));

        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert_eq!(model.load.session, 4);
        assert_eq!(model.load.status, LoadStatus::Idle);
        let pending = model.notifications.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].is_error());
    }

    #[test]
    fn test_chunks_fix_columns_then_append() {
        let mut model = AppModel::default();
        model.load.session = 1;
        model.load.status = LoadStatus::Loading { rows_received: 0 };

        update_load(&mut model, parsed(1, ParseEvent::Chunk(chunk(&["a"], &[&["1"]]))));
        update_load(&mut model, parsed(1, ParseEvent::Chunk(chunk(&["a"], &[&["2"], &["3"]]))));

        assert_eq!(model.table.columns(), &["a".to_string()]);
        assert_eq!(model.table.row_count(), 3);
        assert_eq!(
            model.load.status,
            LoadStatus::Loading { rows_received: 3 }
        );

        update_load(&mut model, parsed(1, ParseEvent::Complete { rows: 3 }));
        assert_eq!(model.load.status, LoadStatus::Loaded { rows: 3 });
        let pending = model.notifications.take_pending();
        assert_eq!(pending[0].title, "File uploaded successfully");
        assert_eq!(pending[0].description, "3 rows have been loaded.");
    }

    #[test]
    fn test_stale_session_ignored() {
        let mut model = AppModel::default();
        model.load.session = 2;

        let cmd = update_load(&mut model, parsed(1, ParseEvent::Chunk(chunk(&["a"], &[&["x"]]))));
        assert!(cmd.is_none());
        assert_eq!(model.table.column_count(), 0);

        update_load(&mut model, parsed(1, ParseEvent::Complete { rows: 1 }));
        assert!(model.notifications.is_empty());
    }

    #[test]
    fn test_failure_keeps_partial_rows() {
        let mut model = AppModel::default();
        model.load.session = 1;
        update_load(&mut model, parsed(1, ParseEvent::Chunk(chunk(&["a"], &[&["1"]]))));

        let error = ParseError {
            kind: ParseErrorKind::Malformed,
            message: "bad quote".into(),
            line: Some(3),
        };
        update_load(&mut model, parsed(1, ParseEvent::Failed(error)));

        assert_eq!(model.table.row_count(), 1);
        assert!(matches!(model.load.status, LoadStatus::Failed { .. }));
        let pending = model.notifications.take_pending();
        assert_eq!(pending[0].title, "Error parsing file");
        assert!(pending[0].description.contains("line 3"));
    }
}
