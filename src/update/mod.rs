//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod edit;
mod load;
mod table;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::ModelSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use edit::update_edit;
pub use load::update_load;
pub use table::update_table;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Load(m) => load::update_load(model, m),
        Msg::Table(m) => table::update_table(model, m),
        Msg::Edit(m) => edit::update_edit(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after grid state and logs the diff. Parser chunks are
/// frequent, so only their state change is logged, not the message itself.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    use crate::csv::ParseEvent;
    use crate::messages::LoadMsg;

    let is_noisy = matches!(
        &msg,
        Msg::Load(LoadMsg::Parsed {
            event: ParseEvent::Chunk(_),
            ..
        })
    );

    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let before = ModelSnapshot::from_model(model);
    let result = update_inner(model, msg);

    if let Some(diff) = before.diff(&ModelSnapshot::from_model(model)) {
        debug!(target: "state", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting for small messages. Parser chunks are summarized by
/// row count so a 1000-row chunk does not end up in the log.
/// Example outputs:
/// - `Table::HeaderClicked("name")`
/// - `Load::Parsed(session=2, chunk of 1000 rows)`
/// - `Edit::InsertChar('x')`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::csv::ParseEvent;
    use crate::messages::{AppMsg, LoadMsg};

    match msg {
        Msg::Load(LoadMsg::Parsed { session, event }) => match event {
            ParseEvent::Chunk(chunk) => format!(
                "Load::Parsed(session={}, chunk of {} rows)",
                session,
                chunk.rows.len()
            ),
            ParseEvent::Complete { rows } => {
                format!("Load::Parsed(session={}, complete, {} rows)", session, rows)
            }
            ParseEvent::Failed(e) => format!("Load::Parsed(session={}, failed: {})", session, e),
        },
        Msg::Load(m) => format!("Load::{:?}", m),
        Msg::Table(m) => format!("Table::{:?}", m),
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::App(AppMsg::ExportCompleted(result)) => {
            format!("App::ExportCompleted(ok={})", result.is_ok())
        }
        Msg::App(m) => format!("App::{:?}", m),
    }
}
