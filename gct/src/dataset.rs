//! Dataset entry point
//!
//! A [`Dataset`] is bound to one source path. Each [`Dataset::read`] loads
//! the version, the matrix and both metadata indices from that source and
//! replaces whatever an earlier read left behind. A failed read leaves the
//! previous state untouched.

use crate::binary::ChunkedBinaryReader;
use crate::chunked::ChunkConfig;
use crate::dispatch::SourceFormat;
use crate::error::Result;
use crate::index::{Axis, MetadataIndex, Operator};
use crate::progress::{NoProgress, Progress};
use crate::resolver::{AxisSelection, MatchMode};
use crate::text::DenseTextReader;
use ndarray::Array2;
use std::fmt;
use std::path::{Path, PathBuf};

/// What to load in a read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadRequest {
    /// Row selection (binary stores only)
    pub rows: AxisSelection,
    /// Column selection (binary stores only)
    pub cols: AxisSelection,
    /// How row patterns match row identifiers
    pub row_match: MatchMode,
    /// Skip both metadata indices (binary stores only)
    pub matrix_only: bool,
    /// Chunked fetch configuration
    pub chunk: ChunkConfig,
}

impl ReadRequest {
    /// Read everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row selection
    pub fn rows(mut self, rows: AxisSelection) -> Self {
        self.rows = rows;
        self
    }

    /// Set the column selection
    pub fn cols(mut self, cols: AxisSelection) -> Self {
        self.cols = cols;
        self
    }

    /// Select rows whose identifiers match any of `patterns`
    pub fn row_patterns<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows(AxisSelection::patterns(patterns))
    }

    /// Select columns whose identifiers contain any of `patterns`
    pub fn col_patterns<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cols(AxisSelection::patterns(patterns))
    }

    /// Select rows by position
    pub fn row_positions(self, positions: impl Into<Vec<usize>>) -> Self {
        self.rows(AxisSelection::positions(positions))
    }

    /// Select columns by position
    pub fn col_positions(self, positions: impl Into<Vec<usize>>) -> Self {
        self.cols(AxisSelection::positions(positions))
    }

    /// Set how row patterns match
    pub fn row_match(mut self, mode: MatchMode) -> Self {
        self.row_match = mode;
        self
    }

    /// Load only the version and the matrix
    pub fn matrix_only(mut self, matrix_only: bool) -> Self {
        self.matrix_only = matrix_only;
        self
    }

    /// Set the chunked fetch configuration
    pub fn chunk(mut self, chunk: ChunkConfig) -> Self {
        self.chunk = chunk;
        self
    }

    fn selects_all(&self) -> bool {
        self.rows.is_all() && self.cols.is_all()
    }
}

/// One source's matrix and metadata
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    format: SourceFormat,
    version: String,
    matrix: Array2<f64>,
    row_index: MetadataIndex,
    col_index: MetadataIndex,
}

impl Dataset {
    /// Bind to a source without reading it
    ///
    /// Fails with [`GctError::UnsupportedFormat`](crate::GctError::UnsupportedFormat)
    /// when the extension is neither `.gct` nor `.gctx`.
    pub fn open(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let format = SourceFormat::from_path(source)?;
        Ok(Self {
            source: source.to_path_buf(),
            format,
            version: String::new(),
            matrix: Array2::zeros((0, 0)),
            row_index: MetadataIndex::new(Axis::Row),
            col_index: MetadataIndex::new(Axis::Col),
        })
    }

    /// Open a source and read it
    pub fn read_from(source: impl AsRef<Path>, request: &ReadRequest) -> Result<Self> {
        let mut dataset = Self::open(source)?;
        dataset.read(request)?;
        Ok(dataset)
    }

    /// Read the source, replacing any previous contents
    pub fn read(&mut self, request: &ReadRequest) -> Result<()> {
        self.read_with_progress(request, &mut NoProgress)
    }

    /// Read the source, reporting progress during long scans
    pub fn read_with_progress(
        &mut self,
        request: &ReadRequest,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        match self.format {
            SourceFormat::DenseText => self.read_dense_text(request, progress)?,
            SourceFormat::ChunkedBinary => self.read_chunked_binary(request, progress)?,
        }

        log::info!(
            "read {}: version {}, {} rows x {} columns",
            self.source.display(),
            self.version,
            self.matrix.nrows(),
            self.matrix.ncols()
        );
        Ok(())
    }

    fn read_dense_text(&mut self, request: &ReadRequest, progress: &mut dyn Progress) -> Result<()> {
        if !request.selects_all() || request.matrix_only {
            log::warn!(
                "{}: selections and matrix-only reads apply to binary stores; reading the whole file",
                self.source.display()
            );
        }

        let data = DenseTextReader::open(&self.source)?.read(progress)?;
        self.version = data.version;
        self.matrix = data.matrix;
        self.row_index = data.row_index;
        self.col_index = data.col_index;
        Ok(())
    }

    fn read_chunked_binary(
        &mut self,
        request: &ReadRequest,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let reader = ChunkedBinaryReader::new(&self.source).with_config(request.chunk);
        let version = reader.version()?;
        let cols = reader.resolve(Axis::Col, &request.cols, MatchMode::Substring)?;
        let rows = reader.resolve(Axis::Row, &request.rows, request.row_match)?;

        let (row_index, col_index) = if request.matrix_only {
            (MetadataIndex::new(Axis::Row), MetadataIndex::new(Axis::Col))
        } else {
            let col_index = reader.read_col_meta(&cols, progress)?;
            let row_index = reader.read_row_meta(&rows, progress)?;
            (row_index, col_index)
        };
        let matrix = reader.read_matrix(&rows, &cols)?;

        self.version = version;
        self.matrix = matrix;
        self.row_index = row_index;
        self.col_index = col_index;
        Ok(())
    }

    /// Source path
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Source format
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Version string of the last read (empty before the first)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `(rows, cols)` matrix of the last read
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Matrix shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.dim()
    }

    /// Row metadata index
    pub fn row_index(&self) -> &MetadataIndex {
        &self.row_index
    }

    /// Column metadata index
    pub fn col_index(&self) -> &MetadataIndex {
        &self.col_index
    }

    /// Metadata index of an axis
    pub fn index(&self, axis: Axis) -> &MetadataIndex {
        match axis {
            Axis::Row => &self.row_index,
            Axis::Col => &self.col_index,
        }
    }

    /// Values of one header on an axis, in insertion order
    pub fn query_by_header(&self, axis: Axis, header: &str) -> Result<Vec<&str>> {
        self.index(axis).query_by_header(header)
    }

    /// `ind` values of the elements on an axis where `header op value` holds
    pub fn query_by_predicate(
        &self,
        axis: Axis,
        header: &str,
        value: &str,
        op: Operator,
    ) -> Result<Vec<usize>> {
        self.index(axis).query_by_predicate(header, value, op)
    }

    /// Identifiers on an axis in matrix order
    pub fn ordered_identifiers(&self, axis: Axis) -> Result<Vec<&str>> {
        self.index(axis).ordered_identifiers()
    }

    /// Declared headers of an axis
    pub fn headers(&self, axis: Axis) -> &[String] {
        self.index(axis).headers()
    }

    /// All metadata of one element on an axis
    pub fn record(&self, axis: Axis, id: &str) -> Result<Option<Vec<(&str, &str)>>> {
        self.index(axis).record(id)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.shape();
        write!(f, "{} [{}]", self.source.display(), self.format)?;
        if !self.version.is_empty() {
            write!(f, " version {}", self.version)?;
        }
        write!(f, ": {rows} rows x {cols} columns")
    }
}
