//! Benchmarks for sorting, paging and the update loop
//!
//! Run with: cargo bench projection

mod support;
use support::{make_model, make_table};

use csvgrid::csv::{project, sort_permutation, ProjectionCache, SortDescriptor};
use csvgrid::messages::Msg;
use csvgrid::update::update;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

// ============================================================================
// Sorting
// ============================================================================

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn sort_text_column(bencher: divan::Bencher, rows: usize) {
    let table = make_table(rows);
    let sort = SortDescriptor::ascending("name");
    bencher.bench_local(|| sort_permutation(divan::black_box(&table), Some(&sort)));
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn sort_descending(bencher: divan::Bencher, rows: usize) {
    let table = make_table(rows);
    let sort = SortDescriptor::descending("city");
    bencher.bench_local(|| sort_permutation(divan::black_box(&table), Some(&sort)));
}

// ============================================================================
// Paging
// ============================================================================

#[divan::bench(args = [10_000, 100_000])]
fn page_uncached(bencher: divan::Bencher, rows: usize) {
    let table = make_table(rows);
    let sort = SortDescriptor::ascending("name");
    bencher.bench_local(|| project(&table, Some(&sort), divan::black_box(5), 100));
}

#[divan::bench(args = [10_000, 100_000])]
fn page_cached(bencher: divan::Bencher, rows: usize) {
    let table = make_table(rows);
    let sort = SortDescriptor::ascending("name");
    let mut cache = ProjectionCache::new();
    cache.project(&table, Some(&sort), 0, 100);
    bencher.bench_local(|| cache.project(&table, Some(&sort), divan::black_box(5), 100));
}

// ============================================================================
// Update + render
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn update_page_forward(iterations: usize) {
    let mut model = make_model(100_000);
    for _ in 0..iterations {
        let cmd = update(&mut model, Msg::page_changed(1));
        divan::black_box(cmd);
    }
}

#[divan::bench(args = [10, 100])]
fn update_edit_sorted(iterations: usize) {
    let mut model = make_model(10_000);
    update(&mut model, Msg::header_clicked("name"));
    for i in 0..iterations {
        let cmd = update(&mut model, Msg::cell_committed(i % 100, "city", format!("Edited {}", i)));
        divan::black_box(cmd);
    }
}

#[divan::bench]
fn render_page_100k() -> Vec<String> {
    let mut model = make_model(100_000);
    model.render()
}
