//! Chunk and position bounds checks
//!
//! Pure validation functions with no I/O dependencies.

use crate::FormatError;

/// Validate chunk boundary constraints
///
/// Ensures that a half-open chunk `start..end` lies inside an axis of
/// `total_size` elements.
pub const fn validate_chunk_boundaries(
    start: usize,
    end: usize,
    total_size: usize,
) -> Result<(), FormatError> {
    if start > end {
        return Err(FormatError::InvalidRange);
    }

    if end > total_size {
        return Err(FormatError::IndexOutOfBounds);
    }

    Ok(())
}

/// Validate that every position is inside an axis of `len` elements
///
/// Returns the first offending position on failure.
pub fn validate_positions(positions: &[usize], len: usize) -> Result<(), usize> {
    match positions.iter().find(|&&pos| pos >= len) {
        Some(&pos) => Err(pos),
        None => Ok(()),
    }
}
