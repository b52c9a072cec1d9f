//! Error types for gct

use crate::index::Axis;
use gct_core::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gct operations
pub type Result<T> = std::result::Result<T, GctError>;

/// Error types that can occur while reading or querying a dataset
#[derive(Debug, Error)]
pub enum GctError {
    /// Source path has an extension no reader handles
    #[error("unsupported source format (expected .gct or .gctx): {}", path.display())]
    UnsupportedFormat {
        /// Offending path
        path: PathBuf,
    },

    /// Version, dimensions or title line of a dense text file is unusable
    #[error("malformed header at line {line}: {message}")]
    MalformedHeader {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// A line or the file as a whole disagrees with the declared dimensions
    #[error("line {line}: expected {expected} fields or lines, found {actual}")]
    RowCountMismatch {
        /// 1-based line number
        line: usize,
        /// Count implied by the dimensions line
        expected: usize,
        /// Count actually found
        actual: usize,
    },

    /// A matrix cell does not parse as a number
    #[error("line {line}, field {field}: invalid number {value:?}")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// 0-based field index
        field: usize,
        /// Raw field text
        value: String,
    },

    /// Metadata table schema misuse
    #[error("schema error on {axis} metadata: {message}")]
    Schema {
        /// Axis the table belongs to
        axis: Axis,
        /// What was wrong
        message: String,
    },

    /// Query named a header the table does not declare
    #[error("no header {header:?} in {axis} metadata")]
    UnknownHeader {
        /// Axis the table belongs to
        axis: Axis,
        /// Requested header
        header: String,
    },

    /// Explicit position outside an axis
    #[error("{axis} position {index} out of bounds for axis of length {len}")]
    IndexOutOfBounds {
        /// Axis the position refers to
        axis: Axis,
        /// Requested position
        index: usize,
        /// Axis length
        len: usize,
    },

    /// Requested column slab extends past the matrix
    #[error("slice {start}..{end} out of bounds for column axis of length {len}")]
    SliceOutOfBounds {
        /// Slab start
        start: usize,
        /// Slab end (exclusive)
        end: usize,
        /// Column axis length
        len: usize,
    },

    /// Store lacks a required group, dataset or attribute
    #[error("store has no entry at {path}")]
    MissingEntry {
        /// Logical path
        path: String,
    },

    /// Predicate operator is not recognized
    #[error("invalid comparison operator {0:?}")]
    InvalidOperator(String),

    /// I/O error on a source file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// HDF5 library error while opening or reading a store
    #[error("HDF5 error on {}: {source}", path.display())]
    Hdf5 {
        /// Store being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: hdf5::Error,
    },

    /// Fetched cells do not fill the requested shape
    #[error("matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Store layout violation
    #[error("invalid store layout: {0}")]
    Format(#[from] FormatError),
}

impl GctError {
    /// Wrap an HDF5 error with the store it occurred on
    pub(crate) fn hdf5(path: impl Into<PathBuf>, source: hdf5::Error) -> Self {
        GctError::Hdf5 {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GctError::Io {
            path: path.into(),
            source,
        }
    }
}
