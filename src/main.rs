#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;

use csvgrid::cli::{CliArgs, InitialSort, StartupConfig, StartupMode};
use csvgrid::csv::SortDescriptor;
use csvgrid::messages::{Msg, TableMsg};
use csvgrid::model::LoadStatus;
use csvgrid::runtime::{run_shell, shell, App, ShellCommand};

fn initial_sort_msg(sort: &InitialSort) -> Msg {
    let descriptor = if sort.descending {
        SortDescriptor::descending(sort.column.clone())
    } else {
        SortDescriptor::ascending(sort.column.clone())
    };
    Msg::Table(TableMsg::SetSort(descriptor))
}

/// Load, export, exit. Notifications go to stderr.
fn run_headless(app: &mut App, startup: &StartupConfig, output: PathBuf) -> Result<()> {
    let Some(file) = &startup.file else {
        bail!("--export needs a FILE to load");
    };

    app.dispatch(Msg::file_selected(file.clone()));
    app.wait_until_idle();
    if let LoadStatus::Failed { error } = &app.model().load.status {
        bail!("Failed to load {}: {}", file.display(), error);
    }
    if app.model().load.file.is_none() {
        let reason = app
            .model()
            .notifications
            .latest()
            .map(|n| n.description.clone())
            .unwrap_or_default();
        bail!("Could not open {}: {}", file.display(), reason);
    }

    app.dispatch(Msg::export_requested(Some(output)));
    app.wait_until_idle();

    let notifications = app.model_mut().notifications.take_pending();
    let mut stderr = io::stderr().lock();
    for notification in &notifications {
        writeln!(stderr, "{}", notification)?;
    }
    if let Some(failed) = notifications.iter().find(|n| n.is_error()) {
        return Err(anyhow!("{}: {}", failed.title, failed.description));
    }
    Ok(())
}

fn run_interactive(app: &mut App, startup: &StartupConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    if let Some(file) = &startup.file {
        shell::execute(app, &ShellCommand::Open(file.clone()), &mut stdout)?;
        if let Some(sort) = &startup.sort {
            app.dispatch(initial_sort_msg(sort));
            shell::execute(app, &ShellCommand::Show, &mut stdout)?;
        }
    }

    run_shell(app, stdin.lock(), &mut stdout)
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    csvgrid::tracing::init();

    let startup = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;
    let mut app = App::new(startup.app_config());

    match startup.mode.clone() {
        StartupMode::Export { output } => run_headless(&mut app, &startup, output),
        StartupMode::Interactive => run_interactive(&mut app, &startup),
    }
}
