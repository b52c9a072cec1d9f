//! Parsing utilities for GCT header fields and stored text
//!
//! This module provides pure parsing functions with no I/O dependencies.

use crate::FormatError;

/// The four integers on the dimensions line of a dense text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dims {
    /// Number of data rows
    pub rows: usize,
    /// Number of data columns
    pub cols: usize,
    /// Number of row metadata columns, excluding the row id
    pub row_meta_cols: usize,
    /// Number of column metadata lines
    pub col_meta_rows: usize,
}

impl Dims {
    /// Number of leading fields on each line before the column values
    pub const fn leading_fields(&self) -> usize {
        self.row_meta_cols.saturating_add(1)
    }

    /// Number of fields expected on every title, metadata and data line
    pub const fn line_width(&self) -> usize {
        self.leading_fields().saturating_add(self.cols)
    }
}

/// Parse the dimensions line: exactly four non-negative integers
///
/// Fields may be separated by tabs or spaces; empty trailing fields are
/// ignored.
pub fn parse_dims(line: &str) -> Result<Dims, FormatError> {
    let mut values = [0usize; 4];
    let mut count = 0;

    for field in line.split(|c: char| c == '\t' || c == ' ').filter(|f| !f.is_empty()) {
        if count >= 4 {
            return Err(FormatError::InvalidDims);
        }
        values[count] = parse_usize(field.trim_end_matches('\r')).map_err(|_| FormatError::InvalidDims)?;
        count += 1;
    }

    if count != 4 {
        return Err(FormatError::InvalidDims);
    }

    Ok(Dims {
        rows: values[0],
        cols: values[1],
        row_meta_cols: values[2],
        col_meta_rows: values[3],
    })
}

/// Parse a usize from a string with error handling
pub fn parse_usize(s: &str) -> Result<usize, FormatError> {
    if s.is_empty() {
        return Err(FormatError::InvalidRange);
    }

    let mut result: usize = 0;

    for byte in s.bytes() {
        if !byte.is_ascii_digit() {
            return Err(FormatError::InvalidRange);
        }

        let digit = (byte - b'0') as usize;

        if result > (usize::MAX - digit) / 10 {
            return Err(FormatError::ArraySizeOverflow);
        }

        result = result * 10 + digit;
    }

    Ok(result)
}

/// Strip fixed-width padding (NUL bytes and trailing whitespace)
pub fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0 && !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}
