//! CSV table core
//!
//! Loads CSV files into an in-memory table and presents it as a sortable,
//! paginated, editable grid:
//! - Chunked parsing on a background thread (`parser`)
//! - Row storage with point updates (`model`)
//! - Sort permutation + page window (`projection`)
//! - Single-cell editing with a caret (`edit`)
//! - Virtualized text rendering (`viewport`, `render`)
//! - CSV export (`export`)
//!
//! # Architecture
//!
//! ```text
//! Table (rows in load order, never reordered)
//! └── Projection (derived from table revision + sort + page)
//!     ├── page_indices()      visible row -> original row
//!     └── GridViewport        which page rows get drawn
//! EditCursor (row on page, column) ──original_index_of──> Table::set_cell
//! ```

mod edit;
mod export;
mod model;
mod parser;
mod projection;
pub mod render;
mod viewport;

pub use edit::{CellPosition, EditCursor};
pub use export::{export_csv, ExportError, LineTerminator};
pub use model::{CellEdit, Delimiter, Row, Table};
pub use parser::{
    parse_reader, parse_table, Chunk, ParseError, ParseErrorKind, ParseEvent, ParseSummary,
    ParseWorker, ParserConfig,
};
pub use projection::{
    clamp_page, offset_page, page_count, project, sort_permutation, Projection, ProjectionCache,
    SortDescriptor, SortDirection,
};
pub use viewport::GridViewport;
