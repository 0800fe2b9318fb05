//! Line-oriented front end
//!
//! Each input line is one command. Commands map onto the same messages a
//! graphical grid would send (header click, page buttons, cell input
//! events), so the shell exercises the whole update path. Row numbers are
//! 1-based and relative to the current page, matching the grid gutter.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config_paths;
use crate::messages::{AppMsg, EditMsg, Msg, TableMsg};
use crate::model::AppModel;

use super::app::App;

pub const HELP: &str = "\
Commands:
  open PATH              load a CSV file
  show                   draw the current page
  sort COLUMN            cycle the sort on COLUMN (asc, desc, off)
  next | prev            next / previous page
  page DELTA             move DELTA pages
  scroll DELTA           scroll DELTA rows within the page
  edit ROW COLUMN        open a cell (ROW as shown in the # column)
  type TEXT              insert TEXT at the caret
  text TEXT              replace the cell text, keeping the caret
  left | right | home | end
  backspace | delete
  commit | cancel        close the open cell
  set ROW COLUMN VALUE   edit and commit in one step
  export [PATH]          write the table as CSV
  status                 show load state
  help                   this text
  quit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(PathBuf),
    Show,
    Sort(String),
    Page(i64),
    Scroll(i32),
    Edit {
        row: usize,
        column: String,
    },
    Type(String),
    Text(String),
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Commit,
    Cancel,
    Set {
        row: usize,
        column: String,
        value: String,
    },
    Export(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// The message this command sends, or `None` for display-only commands
    ///
    /// `text` keeps the open cell's caret where it is, the way an input
    /// control reports its own caret alongside a value change.
    pub fn to_msg(&self, model: &AppModel) -> Option<Msg> {
        let msg = match self {
            ShellCommand::Open(path) => Msg::file_selected(path.clone()),
            ShellCommand::Sort(column) => Msg::header_clicked(column.clone()),
            ShellCommand::Page(delta) => Msg::page_changed(*delta),
            ShellCommand::Scroll(delta) => Msg::Table(TableMsg::Scroll(*delta)),
            ShellCommand::Edit { row, column } => Msg::Edit(EditMsg::ActivateCell {
                row: *row,
                column: column.clone(),
            }),
            ShellCommand::Type(text) => Msg::Edit(EditMsg::InsertText(text.clone())),
            ShellCommand::Text(text) => {
                let caret = model.editing.as_ref().map_or(0, |e| e.caret());
                Msg::Edit(EditMsg::SetText {
                    text: text.clone(),
                    caret,
                })
            }
            ShellCommand::Left => Msg::Edit(EditMsg::CursorLeft),
            ShellCommand::Right => Msg::Edit(EditMsg::CursorRight),
            ShellCommand::Home => Msg::Edit(EditMsg::CursorHome),
            ShellCommand::End => Msg::Edit(EditMsg::CursorEnd),
            ShellCommand::Backspace => Msg::Edit(EditMsg::DeleteBackward),
            ShellCommand::Delete => Msg::Edit(EditMsg::DeleteForward),
            ShellCommand::Commit => Msg::Edit(EditMsg::Commit),
            ShellCommand::Cancel => Msg::Edit(EditMsg::Cancel),
            ShellCommand::Set { row, column, value } => {
                Msg::cell_committed(*row, column.clone(), value.clone())
            }
            ShellCommand::Export(path) => Msg::export_requested(path.clone()),
            ShellCommand::Quit => Msg::App(AppMsg::Quit),
            ShellCommand::Show | ShellCommand::Status | ShellCommand::Help => return None,
        };
        Some(msg)
    }

    /// Whether the grid is drawn after this command runs
    fn shows_grid(&self) -> bool {
        !matches!(
            self,
            ShellCommand::Export(_)
                | ShellCommand::Status
                | ShellCommand::Help
                | ShellCommand::Quit
        )
    }
}

/// Split off up to `count - 1` leading words; the last element is the rest
/// of the line. Leading words may be double-quoted to include spaces.
fn split_args(input: &str, count: usize) -> Vec<String> {
    let mut args = Vec::with_capacity(count);
    let mut rest = input.trim_start();

    while args.len() + 1 < count && !rest.is_empty() {
        let (word, remainder) = if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            }
        } else {
            match rest.find(char::is_whitespace) {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            }
        };
        args.push(word.to_string());
        rest = remainder.trim_start();
    }

    if !rest.is_empty() {
        let last = rest
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .unwrap_or(rest);
        args.push(last.to_string());
    }
    args
}

fn parse_row(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(0) => Err("Row numbers start at 1".to_string()),
        Ok(row) => Ok(row - 1),
        Err(_) => Err(format!("Not a row number: {}", word)),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn parse_delta<T: std::str::FromStr>(word: Option<&str>, name: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("{} needs a number", name))?;
    word.trim()
        .parse()
        .map_err(|_| format!("Not a number: {}", word))
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (name, rest) = match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim_start()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "open" => {
            if rest.is_empty() {
                return Err("open needs a PATH".to_string());
            }
            ShellCommand::Open(PathBuf::from(rest))
        }
        "show" | "" => ShellCommand::Show,
        "sort" => {
            let column = split_args(rest, 1).pop().ok_or("sort needs a COLUMN")?;
            ShellCommand::Sort(column)
        }
        "next" => ShellCommand::Page(1),
        "prev" => ShellCommand::Page(-1),
        "page" => ShellCommand::Page(parse_delta(non_empty(rest), "page")?),
        "scroll" => ShellCommand::Scroll(parse_delta(non_empty(rest), "scroll")?),
        "edit" => {
            let args = split_args(rest, 2);
            let [row, column] = args.as_slice() else {
                return Err("usage: edit ROW COLUMN".to_string());
            };
            ShellCommand::Edit {
                row: parse_row(row)?,
                column: column.clone(),
            }
        }
        "type" => ShellCommand::Type(rest.to_string()),
        "text" => ShellCommand::Text(rest.to_string()),
        "left" => ShellCommand::Left,
        "right" => ShellCommand::Right,
        "home" => ShellCommand::Home,
        "end" => ShellCommand::End,
        "backspace" => ShellCommand::Backspace,
        "delete" => ShellCommand::Delete,
        "commit" => ShellCommand::Commit,
        "cancel" => ShellCommand::Cancel,
        "set" => {
            let args = split_args(rest, 3);
            match args.as_slice() {
                [row, column, value] => ShellCommand::Set {
                    row: parse_row(row)?,
                    column: column.clone(),
                    value: value.clone(),
                },
                [row, column] => ShellCommand::Set {
                    row: parse_row(row)?,
                    column: column.clone(),
                    value: String::new(),
                },
                _ => return Err("usage: set ROW COLUMN VALUE".to_string()),
            }
        }
        "export" => ShellCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {} (try help)", other)),
    };
    Ok(command)
}

fn print_notifications(app: &mut App, out: &mut impl Write) -> Result<()> {
    for notification in app.model_mut().notifications.take_pending() {
        writeln!(out, "{}", notification)?;
    }
    Ok(())
}

fn print_grid(app: &mut App, out: &mut impl Write) -> Result<()> {
    for line in app.model_mut().render() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn print_status(app: &App, out: &mut impl Write) -> Result<()> {
    let model = app.model();
    let file = model
        .load
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "File: {}", file)?;
    writeln!(out, "Status: {}", model.load.status.describe())?;
    writeln!(
        out,
        "Columns: {}",
        if model.table.columns().is_empty() {
            "-".to_string()
        } else {
            model.table.columns().join(", ")
        }
    )?;
    match &model.sort {
        Some(sort) => writeln!(out, "Sort: {} {:?}", sort.column, sort.direction)?,
        None => writeln!(out, "Sort: none")?,
    }
    if let Some(cursor) = &model.editing {
        writeln!(
            out,
            "Editing: row {} {} = {:?} (caret {})",
            cursor.position.row_in_page + 1,
            cursor.position.column,
            cursor.text(),
            cursor.caret()
        )?;
        if cursor.is_modified() {
            writeln!(out, "  was {:?}", cursor.original())?;
        }
    }
    if let Some(log) = config_paths::log_file() {
        writeln!(out, "Log: {}", log.display())?;
    }
    Ok(())
}

/// Note when a page move would run past the first or last page
fn page_bound_note(app: &mut App, delta: i64) -> Option<&'static str> {
    let projection = app.model_mut().projection();
    if delta > 0 && projection.is_last_page() {
        Some("(already on the last page)")
    } else if delta < 0 && projection.is_first_page() {
        Some("(already on the first page)")
    } else {
        None
    }
}

/// Run one command against the app, writing any output
///
/// Loads and exports are waited for so each command's output is complete
/// when it returns.
pub fn execute(app: &mut App, command: &ShellCommand, out: &mut impl Write) -> Result<()> {
    match command {
        ShellCommand::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(());
        }
        ShellCommand::Status => return print_status(app, out),
        ShellCommand::Page(delta) => {
            if let Some(note) = page_bound_note(app, *delta) {
                writeln!(out, "{}", note)?;
            }
        }
        _ => {}
    }

    if let Some(msg) = command.to_msg(app.model()) {
        app.dispatch(msg);
    }
    if matches!(command, ShellCommand::Open(_) | ShellCommand::Export(_)) {
        app.wait_until_idle();
    }
    app.process_async_messages();

    print_notifications(app, out)?;
    if command.shows_grid() {
        print_grid(app, out)?;
    }
    Ok(())
}

/// Read commands from `input` until `quit` or end of input
pub fn run_shell(app: &mut App, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "csvgrid {} (type help for commands)", env!("CARGO_PKG_VERSION"))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        match parse_command(&line) {
            Ok(command) => execute(app, &command, out)?,
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        if app.quit_requested() {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    tracing::debug!("Shell finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("next"), Ok(ShellCommand::Page(1)));
        assert_eq!(parse_command("  PREV "), Ok(ShellCommand::Page(-1)));
        assert_eq!(parse_command("page -3"), Ok(ShellCommand::Page(-3)));
        assert_eq!(parse_command("scroll 5"), Ok(ShellCommand::Scroll(5)));
        assert_eq!(parse_command(""), Ok(ShellCommand::Show));
        assert_eq!(parse_command("export"), Ok(ShellCommand::Export(None)));
        assert_eq!(
            parse_command("export out dir/a.csv"),
            Ok(ShellCommand::Export(Some(PathBuf::from("out dir/a.csv"))))
        );
    }

    #[test]
    fn test_parse_edit_rows_are_one_based() {
        assert_eq!(
            parse_command("edit 1 name"),
            Ok(ShellCommand::Edit {
                row: 0,
                column: "name".into()
            })
        );
        assert!(parse_command("edit 0 name").is_err());
        assert!(parse_command("edit x name").is_err());
        assert!(parse_command("edit 1").is_err());
    }

    #[test]
    fn test_parse_set_with_quoted_column() {
        assert_eq!(
            parse_command("set 2 \"first name\" Ada Lovelace"),
            Ok(ShellCommand::Set {
                row: 1,
                column: "first name".into(),
                value: "Ada Lovelace".into()
            })
        );
        assert_eq!(
            parse_command("set 1 name"),
            Ok(ShellCommand::Set {
                row: 0,
                column: "name".into(),
                value: String::new()
            })
        );
    }

    #[test]
    fn test_sort_takes_rest_of_line() {
        assert_eq!(
            parse_command("sort first name"),
            Ok(ShellCommand::Sort("first name".into()))
        );
        assert!(parse_command("sort").is_err());
        assert!(parse_command("page").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
    }

    #[test]
    fn test_text_keeps_current_caret() {
        let mut model = AppModel::default();
        model.editing = Some(crate::csv::EditCursor::new(
            crate::csv::CellPosition::new(0, "a"),
            "hello",
        ));
        if let Some(cursor) = model.editing.as_mut() {
            cursor.cursor_home();
            cursor.cursor_right();
        }

        let msg = ShellCommand::Text("hello world".into()).to_msg(&model);
        assert!(matches!(
            msg,
            Some(Msg::Edit(EditMsg::SetText { caret: 1, .. }))
        ));
    }
}
