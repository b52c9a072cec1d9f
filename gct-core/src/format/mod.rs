//! Layout definitions for GCTX stores
//!
//! GCTX stores are HDF5 files with a fixed group layout. This module names
//! that layout and the cell types it may hold; no I/O happens here.

pub mod constants;
pub mod types;

pub use types::DataType;
