//! Byte source trait for files the readers inspect
//!
//! This module defines the abstract interface for the bytes of an opened
//! file. It is a pure interface with no implementations.

/// Trait for backends that hold the bytes of an opened file
///
/// This trait provides a minimal interface for accessing the underlying
/// byte data, regardless of how it's held (memory-mapped file, in-memory
/// buffer, etc.).
pub trait StorageBackend {
    /// Get a slice of the underlying data
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }
}
