#![cfg_attr(not(test), no_std)]

//! GCT Core - Expression Matrix Format Definitions
//!
//! This crate provides the GCTX store layout (HDF5 group paths and cell
//! types), element traits and pure validation helpers shared by the GCT
//! text and GCTX binary readers.

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::constants::{paths, DEFAULT_CHUNK_SIZE, HDF5_SIGNATURE};
pub use format::*;
pub use traits::*;
pub use validation::{find_superblock, parse_dims, trim_padding, Dims};
