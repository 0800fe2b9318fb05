//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use csvgrid::config::AppConfig;
use csvgrid::csv::{Row, Table};
use csvgrid::model::AppModel;
use csvgrid::runtime::App;
use tempfile::NamedTempFile;

/// Config with tiny chunks and no inter-chunk pause
pub fn fast_config() -> AppConfig {
    AppConfig {
        chunk_rows: 2,
        chunk_pause_ms: 0,
        ..AppConfig::default()
    }
}

/// Write `content` to a temporary `.csv` file
pub fn csv_file(content: &str) -> NamedTempFile {
    let mut temp = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    temp.write_all(content.as_bytes()).expect("write temp csv");
    temp.flush().expect("flush temp csv");
    temp
}

/// CSV text with an `id,name,score` header and `rows` generated rows
pub fn generated_csv(rows: usize) -> String {
    let mut out = String::from("id,name,score\n");
    for i in 0..rows {
        out.push_str(&format!("{},name{},{}\n", i, i % 7, (i * 37) % 100));
    }
    out
}

/// Create a model holding a one-column `name` table
pub fn names_model(values: &[&str]) -> AppModel {
    let mut model = AppModel::new(fast_config());
    model.table = Table::from_parts(
        vec!["name".to_string()],
        values.iter().map(|v| Row::from_iter([*v])).collect(),
    );
    model
}

/// Load `path` into a fresh app and wait for the parse to finish
pub fn loaded_app(path: &Path) -> App {
    loaded_app_with(path, fast_config())
}

pub fn loaded_app_with(path: &Path, config: AppConfig) -> App {
    let mut app = App::new(config);
    app.dispatch(csvgrid::Msg::file_selected(path));
    app.wait_until_idle();
    app
}

/// Values of `column` on the current page, in display order
pub fn page_column(model: &mut AppModel, column: &str) -> Vec<String> {
    let projection = model.projection();
    projection
        .page_indices()
        .iter()
        .map(|&i| model.table.get(i, column).unwrap_or_default().to_string())
        .collect()
}
