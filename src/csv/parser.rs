//! Chunked CSV parsing using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields and escaped
//! quotes. Rows are delivered in batches ([`Chunk`]) so a consumer can show
//! progress while a large file is still being read. [`ParseWorker`] runs the
//! parse on its own thread and reports through a callback, pausing briefly
//! between chunks.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::model::{Delimiter, Row, Table};

/// What went wrong while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The source could not be read
    Io,
    /// The source is not valid UTF-8
    Encoding,
    /// The csv reader rejected the input
    Malformed,
}

/// Error type for CSV parsing
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: Option<u64>,
}

impl ParseError {
    pub fn io(err: &io::Error) -> Self {
        Self {
            kind: ParseErrorKind::Io,
            message: err.to_string(),
            line: None,
        }
    }

    fn from_csv(err: &csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        let kind = match err.kind() {
            csv::ErrorKind::Io(_) => ParseErrorKind::Io,
            csv::ErrorKind::Utf8 { .. } => ParseErrorKind::Encoding,
            _ => ParseErrorKind::Malformed,
        };
        Self {
            kind,
            message: err.to_string(),
            line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "CSV parse error at line {}: {}", line, self.message),
            None => write!(f, "CSV parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Bytes read ahead to guess the delimiter
const SNIFF_BYTES: usize = 8 * 1024;

/// Records looked at when guessing the delimiter
const SNIFF_RECORDS: usize = 5;

/// Parser settings
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fixed delimiter; `None` detects it from the file
    pub delimiter: Option<Delimiter>,
    /// Rows per delivered chunk
    pub chunk_rows: usize,
    /// Pause between chunk deliveries on the worker thread
    pub chunk_pause: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            chunk_rows: 1000,
            chunk_pause: Duration::from_millis(50),
        }
    }
}

/// A batch of parsed rows, in file order
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Column names from the header row (deduplicated)
    pub headers: Arc<Vec<String>>,
    /// Delimiter the file was read with
    pub delimiter: Delimiter,
    pub rows: Vec<Row>,
}

/// Outcome of a [`parse_reader`] run that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSummary {
    pub rows: usize,
    pub chunks: usize,
    /// The chunk callback asked to stop before the end of input
    pub stopped: bool,
}

/// Guess the delimiter from the first few records of `sample`
///
/// Counts each candidate outside quoted fields and picks the most frequent.
/// Ties and samples with no candidate at all fall back to comma.
pub fn detect_delimiter(sample: &str) -> Delimiter {
    const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Semicolon,
        Delimiter::Pipe,
    ];

    let mut counts = [0usize; CANDIDATES.len()];
    let mut in_quotes = false;
    let mut records = 0;
    for ch in sample.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                records += 1;
                if records == SNIFF_RECORDS {
                    break;
                }
            }
            _ if !in_quotes => {
                if let Some(i) = CANDIDATES.iter().position(|d| d.char() == ch) {
                    counts[i] += 1;
                }
            }
            _ => {}
        }
    }

    let mut best = 0;
    for i in 1..CANDIDATES.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    CANDIDATES[best]
}

/// Make header names unique: later duplicates get `_1`, `_2`, ...
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for (i, name) in raw.enumerate() {
        let name = if i == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}_{}", name, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Parse CSV from `reader`, delivering rows in chunks
///
/// The first line is the header. Empty lines are skipped. Records shorter
/// than the header are padded with empty cells; extra fields are dropped.
/// Returning [`ControlFlow::Break`] from `on_chunk` stops parsing.
pub fn parse_reader<R: Read>(
    reader: R,
    config: &ParserConfig,
    mut on_chunk: impl FnMut(Chunk) -> ControlFlow<()>,
) -> Result<ParseSummary, ParseError> {
    let mut reader = BufReader::with_capacity(SNIFF_BYTES, reader);
    let delimiter = match config.delimiter {
        Some(delimiter) => delimiter,
        None => {
            let sample = reader.fill_buf().map_err(|e| ParseError::io(&e))?;
            let detected = detect_delimiter(&String::from_utf8_lossy(sample));
            tracing::debug!(delimiter = ?detected, "Detected CSV delimiter");
            detected
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| ParseError::from_csv(&e))?;
    let headers = Arc::new(unique_headers(headers.iter()));
    let width = headers.len();
    let chunk_rows = config.chunk_rows.max(1);

    let mut summary = ParseSummary::default();
    let mut batch: Vec<Row> = Vec::with_capacity(chunk_rows);
    let mut record = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(ParseError::from_csv(&e)),
        }

        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        if record.len() != width {
            tracing::debug!(
                line = record.position().map(|p| p.line()),
                fields = record.len(),
                expected = width,
                "Normalizing ragged CSV record"
            );
        }

        let mut row: Row = record.iter().collect();
        row.normalize(width);
        batch.push(row);

        if batch.len() >= chunk_rows {
            summary.rows += batch.len();
            summary.chunks += 1;
            let rows = std::mem::replace(&mut batch, Vec::with_capacity(chunk_rows));
            if on_chunk(Chunk {
                headers: Arc::clone(&headers),
                delimiter,
                rows,
            })
            .is_break()
            {
                summary.stopped = true;
                return Ok(summary);
            }
        }
    }

    if !batch.is_empty() {
        summary.rows += batch.len();
        summary.chunks += 1;
        if on_chunk(Chunk {
            headers,
            delimiter,
            rows: batch,
        })
        .is_break()
        {
            summary.stopped = true;
        }
    }

    Ok(summary)
}

/// Parse a whole CSV string into a table
pub fn parse_table(content: &str, config: &ParserConfig) -> Result<Table, ParseError> {
    let mut table = Table::new();
    parse_reader(content.as_bytes(), config, |chunk| {
        if table.column_count() == 0 {
            table.set_columns(chunk.headers.to_vec());
            table.set_delimiter(chunk.delimiter);
        }
        table.append(chunk.rows);
        ControlFlow::Continue(())
    })?;
    Ok(table)
}

/// Progress reported by a [`ParseWorker`]
#[derive(Debug, Clone)]
pub enum ParseEvent {
    Chunk(Chunk),
    /// All chunks delivered
    Complete { rows: usize },
    Failed(ParseError),
}

/// Background parse of one file
///
/// The thread stops at the next chunk boundary once the worker is cancelled
/// or dropped, or once the event callback reports that nobody is listening.
/// A cancelled parse sends no terminal event.
#[derive(Debug)]
pub struct ParseWorker {
    session: u64,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ParseWorker {
    /// Start parsing `path` on a new thread
    ///
    /// `emit` is called from the worker thread and returns `false` when the
    /// receiving side has gone away.
    pub fn spawn<F>(path: PathBuf, session: u64, config: ParserConfig, emit: F) -> io::Result<Self>
    where
        F: Fn(ParseEvent) -> bool + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name(format!("csv-parse-{}", session))
            .spawn(move || run_worker(&path, session, &config, &flag, emit))?;

        tracing::debug!(session, "Spawned CSV parse worker");

        Ok(Self {
            session,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Ask the worker to stop at the next chunk boundary
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker thread to exit
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(session = self.session, "CSV parse worker panicked");
            }
        }
    }
}

impl Drop for ParseWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
        }
    }
}

fn run_worker<F>(path: &Path, session: u64, config: &ParserConfig, cancel: &AtomicBool, emit: F)
where
    F: Fn(ParseEvent) -> bool,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(session, "Failed to open {}: {}", path.display(), e);
            emit(ParseEvent::Failed(ParseError::io(&e)));
            return;
        }
    };

    let mut config = config.clone();
    if config.delimiter.is_none() {
        config.delimiter = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Delimiter::from_extension);
    }

    let mut delivered = 0usize;
    let result = parse_reader(file, &config, |chunk| {
        if delivered > 0 && !config.chunk_pause.is_zero() {
            thread::sleep(config.chunk_pause);
        }
        if cancel.load(Ordering::Relaxed) {
            return ControlFlow::Break(());
        }
        delivered += 1;
        if emit(ParseEvent::Chunk(chunk)) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    });

    match result {
        Ok(summary) if summary.stopped => {
            tracing::debug!(session, rows = summary.rows, "CSV parse stopped early");
        }
        Ok(summary) => {
            tracing::debug!(
                session,
                rows = summary.rows,
                chunks = summary.chunks,
                "CSV parse complete"
            );
            emit(ParseEvent::Complete { rows: summary.rows });
        }
        Err(e) => {
            tracing::warn!(session, "CSV parse failed: {}", e);
            emit(ParseEvent::Failed(e));
        }
    }
}
