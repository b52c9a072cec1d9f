//! Format constants and logical layout paths for GCTX stores

/// Signature that opens an HDF5 superblock
pub const HDF5_SIGNATURE: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

/// Smallest non-zero superblock offset; later candidates double from here
pub const SUPERBLOCK_MIN_OFFSET: usize = 512;

/// Bytes scanned for a superblock when a file cannot be memory-mapped
pub const SIGNATURE_SCAN_BYTES: usize = 1 << 20;

/// Number of columns fetched per chunk on the chunked matrix path
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Logical paths inside a GCTX store
pub mod paths {
    /// Root attribute holding the dataset version string
    pub const VERSION_ATTR: &str = "version";

    /// Numeric matrix dataset, shaped columns x rows
    pub const MATRIX: &str = "/0/DATA/0/matrix";

    /// Group holding the named column metadata datasets
    pub const COL_META: &str = "/0/META/COL";

    /// Group holding the named row metadata datasets
    pub const ROW_META: &str = "/0/META/ROW";

    /// Name of the identifier dataset inside each metadata group
    pub const ID: &str = "id";
}
