//! Output formats for filtered papers.
//!
//! - [`csv`]: the six-column export written by `--export` and served by the
//!   HTTP endpoint, plus a reader for the same layout
//! - [`json`]: the `{"papers": [...]}` envelope
//! - [`table`]: a console table for interactive use

pub mod csv;
pub mod json;
pub mod table;

/// Separator used when a multi-valued field is flattened into one cell.
pub const LIST_DELIMITER: &str = "; ";

/// Errors from encoding or decoding output documents
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV header: {0}")]
    Header(String),

    #[error("invalid record on line {line}: {source}")]
    Record {
        line: u64,
        source: crate::models::RecordError,
    },
}
