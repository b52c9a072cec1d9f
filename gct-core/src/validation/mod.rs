//! Validation and parsing utilities for the GCTX store layout
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;
pub mod format;
pub mod parsing;

pub use bounds::{validate_chunk_boundaries, validate_positions};
pub use format::{find_superblock, superblock_offsets, validate_magic_bytes};
pub use parsing::{parse_dims, trim_padding, Dims};
