//! Controller that owns the model and performs command side effects
//!
//! All state lives here on one thread. Parse workers and export writes run
//! on their own threads and report back over an mpsc channel; their messages
//! go through `update` like any other.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::commands::Cmd;
use crate::config::AppConfig;
use crate::csv::{ParseError, ParseEvent, ParseWorker, ParserConfig};
use crate::messages::{AppMsg, LoadMsg, Msg};
use crate::model::AppModel;
use crate::update::update;

/// How long blocking waits sleep between checks on the worker
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct App {
    model: AppModel,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Worker of the current upload, if any
    worker: Option<ParseWorker>,
    /// Export writes started but not yet reported
    pending_exports: usize,
    quit_requested: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model: AppModel::new(config),
            msg_tx,
            msg_rx,
            worker: None,
            pending_exports: 0,
            quit_requested: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether a parse or export is still outstanding
    pub fn is_busy(&self) -> bool {
        self.model.load.status.is_loading() || self.pending_exports > 0
    }

    /// Run one message through `update` and perform the resulting command
    ///
    /// Returns whether the grid needs a redraw.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        if matches!(msg, Msg::App(AppMsg::ExportCompleted(_))) {
            self.pending_exports = self.pending_exports.saturating_sub(1);
        }

        match update(&mut self.model, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::StartParse {
                session,
                path,
                config,
            } => self.start_parse(session, path, config),
            Cmd::WriteExport { path, contents } => {
                self.pending_exports += 1;
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = std::fs::write(&path, contents)
                        .map(|()| path.clone())
                        .map_err(|e| format!("Failed to write {}: {}", path.display(), e));
                    report_export(&tx, result);
                });
            }
            Cmd::Quit => {
                self.quit_requested = true;
            }
        }
    }

    fn start_parse(&mut self, session: u64, path: PathBuf, config: ParserConfig) {
        if let Some(previous) = self.worker.take() {
            tracing::debug!(
                previous = previous.session(),
                session,
                "Cancelling superseded parse worker"
            );
            previous.cancel();
        }

        let tx = self.msg_tx.clone();
        let spawned = ParseWorker::spawn(path, session, config, move |event| {
            tx.send(Msg::Load(LoadMsg::Parsed { session, event }))
                .is_ok()
        });

        match spawned {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                tracing::error!("Failed to start parse worker: {}", e);
                self.dispatch(Msg::Load(LoadMsg::Parsed {
                    session,
                    event: ParseEvent::Failed(ParseError::io(&e)),
                }));
            }
        }
    }

    /// Handle every message waiting on the channel without blocking
    ///
    /// Returns whether any of them needs a redraw.
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            if self.dispatch(msg) {
                needs_redraw = true;
            }
        }
        needs_redraw
    }

    /// Block until the current parse and any export writes have reported
    pub fn wait_until_idle(&mut self) {
        while self.is_busy() {
            match self.msg_rx.recv_timeout(WAIT_POLL_INTERVAL) {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.model.load.status.is_loading() && self.worker_exited() {
                        // Drain anything sent just before the thread exited
                        self.process_async_messages();
                        if self.model.load.status.is_loading() {
                            self.abandon_load();
                        }
                    }
                }
                // We hold a sender, so the channel cannot disconnect
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn worker_exited(&self) -> bool {
        self.worker.as_ref().map_or(true, ParseWorker::is_finished)
    }

    /// The worker ended without a terminal event (it panicked)
    fn abandon_load(&mut self) {
        tracing::error!(
            session = self.model.load.session,
            "Parse worker exited without reporting"
        );
        let error = ParseError::io(&std::io::Error::other("parser stopped unexpectedly"));
        let session = self.model.load.session;
        self.dispatch(Msg::Load(LoadMsg::Parsed {
            session,
            event: ParseEvent::Failed(error),
        }));
    }
}

/// Send an export outcome back to the app
///
/// Returns `false` when the app has already gone away.
fn report_export(tx: &Sender<Msg>, result: Result<PathBuf, String>) -> bool {
    match tx.send(Msg::App(AppMsg::ExportCompleted(result))) {
        Ok(()) => true,
        Err(mpsc::SendError(msg)) => {
            tracing::debug!(?msg, "Dropping export result; app has shut down");
            false
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoadStatus;
    use std::io::Write;

    fn fast_config() -> AppConfig {
        AppConfig {
            chunk_rows: 2,
            chunk_pause_ms: 0,
            ..AppConfig::default()
        }
    }

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_load_runs_to_completion() {
        let file = csv_file("id,name\n1,a\n2,b\n3,c\n");
        let mut app = App::new(fast_config());

        app.dispatch(Msg::file_selected(file.path()));
        app.wait_until_idle();

        assert_eq!(app.model().load.status, LoadStatus::Loaded { rows: 3 });
        assert_eq!(app.model().table.get(2, "name"), Some("c"));
    }

    #[test]
    fn test_export_writes_file() {
        let file = csv_file("id,name\n1,a\n");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let mut app = App::new(fast_config());

        app.dispatch(Msg::file_selected(file.path()));
        app.wait_until_idle();
        app.dispatch(Msg::export_requested(Some(out.clone())));
        app.wait_until_idle();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "id,name\r\n1,a\r\n"
        );
        let titles: Vec<String> = app
            .model_mut()
            .notifications
            .take_pending()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["File uploaded successfully", "Export successful"]);
    }

    #[test]
    fn test_export_result_after_shutdown_is_dropped() {
        let (tx, rx) = mpsc::channel();
        assert!(report_export(&tx, Ok(PathBuf::from("out.csv"))));
        assert!(matches!(
            rx.try_recv(),
            Ok(Msg::App(AppMsg::ExportCompleted(Ok(_))))
        ));

        drop(rx);
        assert!(!report_export(&tx, Err("disk full".to_string())));
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut app = App::new(fast_config());
        app.dispatch(Msg::App(AppMsg::Quit));
        assert!(app.quit_requested());
    }
}
