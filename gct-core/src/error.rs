//! Error types for GCTX store layout operations

/// Errors that can occur while interpreting a GCTX store layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// File does not carry an HDF5 superblock signature
    InvalidHeader,
    /// Dataset has the wrong number of dimensions
    InvalidRank,
    /// Cell or metadata type is not one this reader understands
    UnknownDataType,
    /// Index out of bounds
    IndexOutOfBounds,
    /// Size calculation would overflow
    ArraySizeOverflow,
    /// A metadata array or the matrix disagrees with its axis length
    AxisMismatch,
    /// Dimensions line does not hold four non-negative integers
    InvalidDims,
    /// Start of a range is past its end
    InvalidRange,
    /// Text payload is not valid UTF-8
    InvalidUtf8,
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            FormatError::InvalidHeader => "Missing HDF5 superblock signature",
            FormatError::InvalidRank => "Dataset has the wrong number of dimensions",
            FormatError::UnknownDataType => "Unknown data type",
            FormatError::IndexOutOfBounds => "Index out of bounds",
            FormatError::ArraySizeOverflow => "Array size overflow",
            FormatError::AxisMismatch => "Array length does not match its axis",
            FormatError::InvalidDims => "Dimensions must be four non-negative integers",
            FormatError::InvalidRange => "Invalid range",
            FormatError::InvalidUtf8 => "Text is not valid UTF-8",
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for FormatError {}

/// Result type for layout operations
pub type Result<T> = core::result::Result<T, FormatError>;
