//! Abstract interfaces for the GCTX store layout
//!
//! Traits are pure interfaces - no concrete implementations.

pub mod backend;
pub mod element;

pub use backend::StorageBackend;
pub use element::MatrixElement;
