//! GCT - Expression matrix reader for dense text and chunked binary stores
//!
//! This library reads axis-labeled numeric matrices from `.gct` dense text
//! files and `.gctx` chunked HDF5 stores, and exposes per-axis metadata
//! through a queryable index.
//!
//! ## Architecture
//!
//! GCT follows a layout/implementation separation:
//!
//! - **gct-core**: Store layout definitions, element traits, and validation (no I/O)
//! - **gct**: Readers, the scoped HDF5 store handle, and the metadata index
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gct::{Axis, Dataset, MatchMode, Operator, ReadRequest};
//!
//! fn example() -> gct::Result<()> {
//!     // Two row identifiers, every sample whose id contains "CPC"
//!     let request = ReadRequest::new()
//!         .row_patterns(["200814_at", "1007_s_at"])
//!         .row_match(MatchMode::Exact)
//!         .col_patterns(["CPC"]);
//!     let dataset = Dataset::read_from("level3.gctx", &request)?;
//!
//!     println!("{dataset}");
//!     let high_dose = dataset.query_by_predicate(Axis::Col, "pert_dose", "5", Operator::Gt)?;
//!     let samples = dataset.ordered_identifiers(Axis::Col)?;
//!     for ind in high_dose {
//!         println!("{}: {:?}", samples[ind], dataset.matrix().column(ind));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Subset reads**: Select rows and columns by position or identifier pattern
//! - **Bounded memory**: Wide selections are fetched in fixed-width column chunks
//! - **HDF5 stores**: Matrix hyperslabs are read per operation; numeric
//!   metadata comes back as text
//! - **Metadata queries**: Typed predicates over per-axis metadata tables

pub use gct_core::{DataType, Dims, FormatError, MatrixElement, DEFAULT_CHUNK_SIZE};

pub mod binary;
pub mod chunked;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod progress;
pub mod resolver;
pub mod store;
pub mod text;

pub use binary::ChunkedBinaryReader;
pub use chunked::{fetch_matrix, ChunkConfig, ColumnSource, FetchStrategy};
pub use dataset::{Dataset, ReadRequest};
pub use dispatch::SourceFormat;
pub use error::{GctError, Result};
pub use index::{cast_real, Axis, MetadataIndex, Operator};
pub use progress::{LogProgress, NoProgress, Progress};
pub use resolver::{matching_identifiers, resolve_indices, AxisSelection, MatchMode};
pub use store::{MatrixView, Store};
pub use text::{DenseText, DenseTextReader};
