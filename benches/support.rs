//! Shared helpers for benchmarks

use csvgrid::csv::{Row, Table};
use csvgrid::model::AppModel;

/// CSV text with `rows` rows of mixed text and numbers
#[allow(dead_code)]
pub fn make_csv(rows: usize) -> String {
    let mut out = String::with_capacity(rows * 40);
    out.push_str("id,name,city,score\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{},Person {},\"City, {}\",{}\n",
            i,
            (i * 7919) % rows.max(1),
            i % 50,
            (i * 37) % 1000
        ));
    }
    out
}

/// Table with `rows` rows in the same shape as [`make_csv`]
#[allow(dead_code)]
pub fn make_table(rows: usize) -> Table {
    Table::from_parts(
        vec!["id".into(), "name".into(), "city".into(), "score".into()],
        (0..rows)
            .map(|i| {
                Row::from_iter([
                    i.to_string(),
                    format!("Person {}", (i * 7919) % rows.max(1)),
                    format!("City, {}", i % 50),
                    ((i * 37) % 1000).to_string(),
                ])
            })
            .collect(),
    )
}

/// AppModel holding [`make_table`]
#[allow(dead_code)]
pub fn make_model(rows: usize) -> AppModel {
    let mut model = AppModel::default();
    model.table = make_table(rows);
    model
}
