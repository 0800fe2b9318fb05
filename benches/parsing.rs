//! Benchmarks for chunked CSV parsing and export
//!
//! Run with: cargo bench parsing

mod support;
use support::{make_csv, make_table};

use std::ops::ControlFlow;
use std::time::Duration;

use csvgrid::csv::{export_csv, parse_reader, Delimiter, LineTerminator, ParserConfig};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn config(chunk_rows: usize) -> ParserConfig {
    ParserConfig {
        chunk_rows,
        chunk_pause: Duration::ZERO,
        ..ParserConfig::default()
    }
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn parse_rows(bencher: divan::Bencher, rows: usize) {
    let text = make_csv(rows);
    let config = config(1000);
    bencher.bench_local(|| {
        parse_reader(divan::black_box(text.as_bytes()), &config, |chunk| {
            divan::black_box(chunk);
            ControlFlow::Continue(())
        })
    });
}

#[divan::bench(args = [10, 100, 1000, 10_000])]
fn parse_chunk_size(bencher: divan::Bencher, chunk_rows: usize) {
    let text = make_csv(50_000);
    let config = config(chunk_rows);
    bencher.bench_local(|| {
        parse_reader(text.as_bytes(), &config, |chunk| {
            divan::black_box(chunk);
            ControlFlow::Continue(())
        })
    });
}

#[divan::bench(args = [1_000, 100_000])]
fn export_rows(bencher: divan::Bencher, rows: usize) {
    let table = make_table(rows);
    bencher.bench_local(|| export_csv(&table, Delimiter::Comma, LineTerminator::Crlf));
}
