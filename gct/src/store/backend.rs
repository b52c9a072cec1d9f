//! Byte backends used to sniff store files before HDF5 opens them
//!
//! With the `mmap` feature a file is memory-mapped read-only, so only the
//! pages holding candidate superblock offsets are touched; without it the
//! leading bytes of the file are read into a buffer.

use crate::error::{GctError, Result};
use gct_core::format::constants::SIGNATURE_SCAN_BYTES;
use gct_core::{find_superblock, StorageBackend};
use std::io::Read;
use std::path::Path;

/// Memory-mapped file
#[cfg(feature = "mmap")]
pub struct MmapBackend {
    mmap: memmap2::Mmap,
}

#[cfg(feature = "mmap")]
impl MmapBackend {
    /// Map a file read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| GctError::io(path, e))?;

        // SAFETY: the mapping is read-only and dropped before the store is
        // handed to HDF5; the file is not modified while it is mapped.
        let mmap = unsafe {
            memmap2::MmapOptions::new()
                .map(&file)
                .map_err(|e| GctError::io(path, e))?
        };

        Ok(Self { mmap })
    }
}

#[cfg(feature = "mmap")]
impl StorageBackend for MmapBackend {
    fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

/// File bytes held in memory
#[derive(Debug, Clone, Default)]
pub struct BufferBackend {
    bytes: Vec<u8>,
}

impl BufferBackend {
    /// Wrap bytes already in memory
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read at most `limit` leading bytes of a file
    pub fn read_prefix(path: &Path, limit: usize) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| GctError::io(path, e))?;
        let mut bytes = Vec::new();
        file.take(limit as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| GctError::io(path, e))?;
        Ok(Self { bytes })
    }
}

impl StorageBackend for BufferBackend {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// Open the default backend for a file
pub(crate) fn open_file(path: &Path) -> Result<Box<dyn StorageBackend>> {
    #[cfg(feature = "mmap")]
    {
        Ok(Box::new(MmapBackend::open(path)?))
    }
    #[cfg(not(feature = "mmap"))]
    {
        Ok(Box::new(BufferBackend::read_prefix(path, SIGNATURE_SCAN_BYTES)?))
    }
}

/// Locate the HDF5 superblock of a store file
///
/// Files without one fail with [`FormatError::InvalidHeader`] before the
/// HDF5 library sees them.
///
/// [`FormatError::InvalidHeader`]: gct_core::FormatError::InvalidHeader
pub(crate) fn superblock_offset(path: &Path) -> Result<usize> {
    let backend = open_file(path)?;
    let bytes = backend.as_slice();
    let scanned = &bytes[..bytes.len().min(SIGNATURE_SCAN_BYTES)];
    Ok(find_superblock(scanned)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gct_core::{FormatError, HDF5_SIGNATURE};
    use std::io::Write;

    #[test]
    fn test_read_prefix_stops_at_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();
        file.flush().unwrap();

        let backend = BufferBackend::read_prefix(file.path(), 4).unwrap();
        assert_eq!(backend.as_slice(), b"0123");
        assert_eq!(BufferBackend::new(vec![1, 2]).size(), 2);
    }

    #[test]
    fn test_open_file_matches_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"store bytes").unwrap();
        file.flush().unwrap();

        let backend = open_file(file.path()).unwrap();
        assert_eq!(backend.as_slice(), b"store bytes");
    }

    #[test]
    fn test_superblock_after_user_block() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 512]).unwrap();
        file.write_all(&HDF5_SIGNATURE).unwrap();
        file.flush().unwrap();

        assert_eq!(superblock_offset(file.path()).unwrap(), 512);
    }

    #[test]
    fn test_text_file_is_not_a_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#1.3\n2\t1\t1\t1\n").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            superblock_offset(file.path()),
            Err(GctError::Format(FormatError::InvalidHeader))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.gctx");
        match open_file(&missing) {
            Err(GctError::Io { path, .. }) => assert_eq!(path, missing),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("missing file opened"),
        }
    }
}
