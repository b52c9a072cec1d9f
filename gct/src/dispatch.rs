//! Source format detection

use crate::error::{GctError, Result};
use std::fmt;
use std::path::Path;

/// Extension of dense text files
pub const DENSE_TEXT_EXTENSION: &str = "gct";

/// Extension of chunked binary stores
pub const CHUNKED_BINARY_EXTENSION: &str = "gctx";

/// Reader a source path is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// `.gct` dense tab-separated text
    DenseText,
    /// `.gctx` chunked binary store
    ChunkedBinary,
}

impl SourceFormat {
    /// Pick the format from the path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(DENSE_TEXT_EXTENSION) => Ok(SourceFormat::DenseText),
            Some(CHUNKED_BINARY_EXTENSION) => Ok(SourceFormat::ChunkedBinary),
            _ => Err(GctError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// File extension without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            SourceFormat::DenseText => DENSE_TEXT_EXTENSION,
            SourceFormat::ChunkedBinary => CHUNKED_BINARY_EXTENSION,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::DenseText => write!(f, "dense text (.{})", self.extension()),
            SourceFormat::ChunkedBinary => write!(f, "chunked binary (.{})", self.extension()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(
            SourceFormat::from_path("data/sample.gct").unwrap(),
            SourceFormat::DenseText
        );
        assert_eq!(
            SourceFormat::from_path("/tmp/level3.n978x12.gctx").unwrap(),
            SourceFormat::ChunkedBinary
        );
    }

    #[test]
    fn test_unsupported() {
        for path in ["sample.csv", "sample", "sample.GCT", "sample.gct.gz"] {
            match SourceFormat::from_path(path) {
                Err(GctError::UnsupportedFormat { path: offending }) => {
                    assert_eq!(offending, PathBuf::from(path));
                }
                other => panic!("{path}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceFormat::ChunkedBinary.to_string(), "chunked binary (.gctx)");
    }
}
