//! Signature checks for GCTX stores
//!
//! An HDF5 superblock sits at offset 0 or at a power-of-two offset of at
//! least 512 bytes when the file carries a user block.

use crate::format::constants::{HDF5_SIGNATURE, SUPERBLOCK_MIN_OFFSET};
use crate::FormatError;

/// Compare magic bytes with an expected pattern in a const-friendly way
pub const fn validate_magic_bytes<const N: usize>(
    actual: &[u8; N],
    expected: &[u8; N],
) -> Result<(), FormatError> {
    let mut i = 0;
    while i < N {
        if actual[i] != expected[i] {
            return Err(FormatError::InvalidHeader);
        }
        i += 1;
    }
    Ok(())
}

/// Offsets at which an HDF5 superblock may start, in search order
pub fn superblock_offsets(len: usize) -> impl Iterator<Item = usize> {
    core::iter::once(0)
        .chain(core::iter::successors(Some(SUPERBLOCK_MIN_OFFSET), |&offset| {
            offset.checked_mul(2)
        }))
        .take_while(move |&offset| offset < len)
}

/// Find the offset of the HDF5 superblock in the leading bytes of a file
pub fn find_superblock(bytes: &[u8]) -> Result<usize, FormatError> {
    superblock_offsets(bytes.len())
        .find(|&offset| {
            bytes
                .get(offset..offset + HDF5_SIGNATURE.len())
                .and_then(|window| <&[u8; 8]>::try_from(window).ok())
                .is_some_and(|window| validate_magic_bytes(window, &HDF5_SIGNATURE).is_ok())
        })
        .ok_or(FormatError::InvalidHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_magic_bytes() {
        assert_eq!(validate_magic_bytes(b"GCTX", b"GCTX"), Ok(()));
        assert_eq!(
            validate_magic_bytes(b"GCT1", b"GCTX"),
            Err(FormatError::InvalidHeader)
        );
    }

    #[test]
    fn test_superblock_offsets() {
        let offsets: Vec<usize> = superblock_offsets(3000).collect();
        assert_eq!(offsets, vec![0, 512, 1024, 2048]);
        assert_eq!(superblock_offsets(0).count(), 0);
    }

    #[test]
    fn test_find_superblock() {
        let mut bytes = vec![0u8; 2048];
        assert_eq!(find_superblock(&bytes), Err(FormatError::InvalidHeader));

        bytes[1024..1032].copy_from_slice(&HDF5_SIGNATURE);
        assert_eq!(find_superblock(&bytes), Ok(1024));

        bytes[..8].copy_from_slice(&HDF5_SIGNATURE);
        assert_eq!(find_superblock(&bytes), Ok(0));

        // Signature cut off by the end of the buffer
        assert_eq!(find_superblock(&HDF5_SIGNATURE[..4]), Err(FormatError::InvalidHeader));
        assert_eq!(find_superblock(b"#1.2\n2\t1\t1\t1\n"), Err(FormatError::InvalidHeader));
    }
}
