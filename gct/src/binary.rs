//! Reader for `.gctx` chunked binary stores
//!
//! Every operation opens the store, does its work and closes it again; no
//! handle outlives a call.

use crate::chunked::{fetch_matrix, ChunkConfig};
use crate::error::{GctError, Result};
use crate::index::{Axis, MetadataIndex, IND};
use crate::progress::Progress;
use crate::resolver::{matching_identifiers, resolve_indices, AxisSelection, MatchMode};
use crate::store::Store;
use gct_core::validation::validate_positions;
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Subset reader for one binary store
#[derive(Debug, Clone)]
pub struct ChunkedBinaryReader {
    path: PathBuf,
    config: ChunkConfig,
}

impl ChunkedBinaryReader {
    /// Reader for the store at `path` with the default chunk configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: ChunkConfig::default(),
        }
    }

    /// Replace the chunk configuration
    pub fn with_config(mut self, config: ChunkConfig) -> Self {
        self.config = config;
        self
    }

    /// Store path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chunk configuration used by matrix reads
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    fn open(&self) -> Result<Store> {
        Store::open(&self.path)
    }

    /// Root version attribute
    pub fn version(&self) -> Result<String> {
        self.open()?.version()
    }

    /// Column positions whose identifiers contain any of `patterns`
    pub fn column_indices<P: AsRef<str>>(&self, patterns: Option<&[P]>) -> Result<Vec<usize>> {
        let ids = self.open()?.ids(Axis::Col)?;
        Ok(resolve_indices(&ids, patterns, MatchMode::Substring))
    }

    /// Row positions whose identifiers match `patterns`
    pub fn row_indices<P: AsRef<str>>(
        &self,
        patterns: Option<&[P]>,
        mode: MatchMode,
    ) -> Result<Vec<usize>> {
        let ids = self.open()?.ids(Axis::Row)?;
        Ok(resolve_indices(&ids, patterns, mode))
    }

    /// Column identifiers matching `patterns`, in resolution order
    pub fn column_ids<P: AsRef<str>>(&self, patterns: Option<&[P]>) -> Result<Vec<String>> {
        let ids = self.open()?.ids(Axis::Col)?;
        Ok(matching_identifiers(&ids, patterns, MatchMode::Substring))
    }

    /// Row identifiers matching `patterns`, in resolution order
    pub fn row_ids<P: AsRef<str>>(
        &self,
        patterns: Option<&[P]>,
        mode: MatchMode,
    ) -> Result<Vec<String>> {
        let ids = self.open()?.ids(Axis::Row)?;
        Ok(matching_identifiers(&ids, patterns, mode))
    }

    /// Resolve a selection on an axis into positions
    ///
    /// Explicit positions are returned as given; exact matching only applies
    /// on the row axis.
    pub fn resolve(
        &self,
        axis: Axis,
        selection: &AxisSelection,
        mode: MatchMode,
    ) -> Result<Vec<usize>> {
        if let AxisSelection::Positions(positions) = selection {
            return Ok(positions.clone());
        }
        let mode = match axis {
            Axis::Row => mode,
            Axis::Col => MatchMode::Substring,
        };
        let ids = self.open()?.ids(axis)?;
        Ok(selection.resolve(&ids, mode))
    }

    /// Column metadata for the given positions
    pub fn read_col_meta(
        &self,
        positions: &[usize],
        progress: &mut dyn Progress,
    ) -> Result<MetadataIndex> {
        self.read_meta(Axis::Col, positions, progress)
    }

    /// Row metadata for the given positions
    pub fn read_row_meta(
        &self,
        positions: &[usize],
        progress: &mut dyn Progress,
    ) -> Result<MetadataIndex> {
        self.read_meta(Axis::Row, positions, progress)
    }

    /// Build an axis's metadata table: `ind` plus every dataset on the axis
    ///
    /// Headers follow the metadata group's member order. Rows are inserted in the order of `positions`. Each `ind` is the
    /// element's position in the matrix read with the same selection.
    pub fn read_meta(
        &self,
        axis: Axis,
        positions: &[usize],
        progress: &mut dyn Progress,
    ) -> Result<MetadataIndex> {
        let store = self.open()?;
        let len = store.axis_len(axis)?;
        validate_positions(positions, len).map_err(|index| GctError::IndexOutOfBounds {
            axis,
            index,
            len,
        })?;

        let mut headers = vec![IND.to_string()];
        let mut columns = Vec::new();
        for name in store.meta_arrays(axis)? {
            columns.push(store.meta_values_at(axis, &name, positions)?);
            headers.push(name);
        }

        let mut index = MetadataIndex::new(axis);
        index.create_schema(headers)?;

        let phase = format!("reading {axis} metadata");
        let ranks = output_ranks(positions);
        for (k, rank) in ranks.into_iter().enumerate() {
            progress.update(&phase, k, positions.len());
            let values = columns.iter().map(|column| column[k].clone());
            index.insert(std::iter::once(rank.to_string()).chain(values))?;
        }
        progress.finish();

        Ok(index)
    }

    /// Matrix of the selected rows and columns, shaped `(rows, cols)`
    pub fn read_matrix(&self, rows: &[usize], cols: &[usize]) -> Result<Array2<f64>> {
        let store = self.open()?;
        let view = store.matrix()?;
        fetch_matrix(&view, rows, cols, &self.config)
    }
}

/// Rank of each position in the ascending order the matrix is read in,
/// ties kept in selection order
fn output_ranks(positions: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by_key(|&k| positions[k]);

    let mut ranks = vec![0; positions.len()];
    for (rank, k) in order.into_iter().enumerate() {
        ranks[k] = rank;
    }
    ranks
}
