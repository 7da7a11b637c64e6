//! Error types.

use thiserror::Error;

/// Errors produced while decoding area text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AreaError {
    #[error("Area text is empty")]
    Empty,
    #[error("Row {index} is not an unsigned decimal number: {segment:?}")]
    InvalidSegment { index: usize, segment: String },
    #[error("Row {row} needs {bits} bits but the grid has {columns} columns")]
    RowOverflow { row: usize, bits: usize, columns: usize },
}

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for area decoding.
pub type AreaResult<T> = Result<T, AreaError>;
