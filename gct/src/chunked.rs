//! Bounded-memory matrix fetch
//!
//! Fetches a row and column selection out of a column-major source, either
//! directly or in fixed-width column chunks, and canonicalizes the result to
//! `(rows, cols)` orientation in ascending positional order.

use crate::error::{GctError, Result};
use crate::index::Axis;
use crate::store::MatrixView;
use gct_core::validation::validate_positions;
use gct_core::DEFAULT_CHUNK_SIZE;
use ndarray::Array2;
use std::ops::Range;

/// Which fetch path a matrix read takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// Direct when fewer columns than rows are selected, chunked otherwise
    #[default]
    Auto,
    /// Always select the columns first, then the rows
    Direct,
    /// Always walk the column axis in chunks
    Chunked,
}

/// Configuration for chunked matrix reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Width of each chunk along the column axis
    pub chunk_size: usize,
    /// Fetch path selection
    pub strategy: FetchStrategy,
}

impl ChunkConfig {
    /// Set chunk width in columns (at least 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the fetch strategy
    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Get chunk width in columns
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn use_direct(&self, ncols: usize, nrows: usize) -> bool {
        match self.strategy {
            FetchStrategy::Auto => ncols < nrows,
            FetchStrategy::Direct => true,
            FetchStrategy::Chunked => false,
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: FetchStrategy::Auto,
        }
    }
}

/// Column-major matrix source that can be read by column
pub trait ColumnSource {
    /// Length of the column axis
    fn ncols(&self) -> usize;

    /// Length of the row axis
    fn nrows(&self) -> usize;

    /// Contiguous column range restricted to `rows`, column-major
    ///
    /// Must fail with [`GctError::SliceOutOfBounds`] when the range ends past
    /// the column axis.
    fn slab(&self, cols: Range<usize>, rows: &[usize]) -> Result<Vec<f64>>;

    /// Listed columns restricted to `rows`, column-major
    fn columns(&self, cols: &[usize], rows: &[usize]) -> Result<Vec<f64>>;
}

impl ColumnSource for MatrixView<'_> {
    fn ncols(&self) -> usize {
        MatrixView::ncols(self)
    }

    fn nrows(&self) -> usize {
        MatrixView::nrows(self)
    }

    fn slab(&self, cols: Range<usize>, rows: &[usize]) -> Result<Vec<f64>> {
        MatrixView::slab(self, cols, rows)
    }

    fn columns(&self, cols: &[usize], rows: &[usize]) -> Result<Vec<f64>> {
        MatrixView::columns(self, cols, rows)
    }
}

/// Read `rows` x `cols` from a source into a `(rows, cols)` matrix
///
/// Both selections are reordered ascending before the fetch; duplicates are
/// kept.
pub fn fetch_matrix<S: ColumnSource + ?Sized>(
    source: &S,
    rows: &[usize],
    cols: &[usize],
    config: &ChunkConfig,
) -> Result<Array2<f64>> {
    check_positions(Axis::Row, rows, source.nrows())?;
    check_positions(Axis::Col, cols, source.ncols())?;

    let rows = sorted(rows);
    let cols = sorted(cols);

    let cells = if config.use_direct(cols.len(), rows.len()) {
        log::debug!("direct fetch of {} columns x {} rows", cols.len(), rows.len());
        source.columns(&cols, &rows)?
    } else {
        log::debug!(
            "chunked fetch of {} columns x {} rows ({} columns per chunk)",
            cols.len(),
            rows.len(),
            config.chunk_size()
        );
        fetch_chunked(source, &rows, &cols, config.chunk_size())?
    };

    let by_col = Array2::from_shape_vec((cols.len(), rows.len()), cells)?;
    Ok(by_col.reversed_axes().as_standard_layout().into_owned())
}

/// Walk the column axis in chunks, keeping only the selected columns
///
/// `cols` must be sorted.
fn fetch_chunked<S: ColumnSource + ?Sized>(
    source: &S,
    rows: &[usize],
    cols: &[usize],
    chunk_size: usize,
) -> Result<Vec<f64>> {
    let chunk_size = chunk_size.max(1);
    let mut out = Vec::with_capacity(cols.len() * rows.len());
    let mut next = 0;

    while next < cols.len() {
        let start = cols[next] / chunk_size * chunk_size;
        let mut end = start + chunk_size;

        let slab = match source.slab(start..end, rows) {
            Ok(slab) => slab,
            Err(GctError::SliceOutOfBounds { len, .. }) => {
                log::warn!("chunk {start}..{end} clamped to column axis length {len}");
                end = len;
                source.slab(start..end, rows)?
            }
            Err(e) => return Err(e),
        };

        while next < cols.len() && cols[next] < end {
            let offset = (cols[next] - start) * rows.len();
            out.extend_from_slice(&slab[offset..offset + rows.len()]);
            next += 1;
        }
    }

    Ok(out)
}

fn sorted(positions: &[usize]) -> Vec<usize> {
    let mut positions = positions.to_vec();
    positions.sort_unstable();
    positions
}

fn check_positions(axis: Axis, positions: &[usize], len: usize) -> Result<()> {
    validate_positions(positions, len).map_err(|index| GctError::IndexOutOfBounds { axis, index, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::cell::RefCell;

    /// In-memory source where cell (c, r) = 1000c + r
    struct Grid {
        ncols: usize,
        nrows: usize,
        slabs: RefCell<Vec<Range<usize>>>,
    }

    impl Grid {
        fn new(ncols: usize, nrows: usize) -> Self {
            Self {
                ncols,
                nrows,
                slabs: RefCell::new(Vec::new()),
            }
        }

        fn cell(col: usize, row: usize) -> f64 {
            (col * 1000 + row) as f64
        }
    }

    impl ColumnSource for Grid {
        fn ncols(&self) -> usize {
            self.ncols
        }

        fn nrows(&self) -> usize {
            self.nrows
        }

        fn slab(&self, cols: Range<usize>, rows: &[usize]) -> Result<Vec<f64>> {
            self.slabs.borrow_mut().push(cols.clone());
            if cols.end > self.ncols {
                return Err(GctError::SliceOutOfBounds {
                    start: cols.start,
                    end: cols.end,
                    len: self.ncols,
                });
            }
            Ok(cols
                .flat_map(move |c| rows.iter().map(move |&r| Grid::cell(c, r)))
                .collect())
        }

        fn columns(&self, cols: &[usize], rows: &[usize]) -> Result<Vec<f64>> {
            Ok(cols
                .iter()
                .flat_map(move |&c| rows.iter().map(move |&r| Grid::cell(c, r)))
                .collect())
        }
    }

    fn direct() -> ChunkConfig {
        ChunkConfig::default().with_strategy(FetchStrategy::Direct)
    }

    fn chunked(size: usize) -> ChunkConfig {
        ChunkConfig::default()
            .with_strategy(FetchStrategy::Chunked)
            .with_chunk_size(size)
    }

    #[test]
    fn test_default_config() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size(), 1000);
        assert_eq!(config.strategy, FetchStrategy::Auto);
        assert_eq!(ChunkConfig::default().with_chunk_size(0).chunk_size(), 1);
    }

    #[test]
    fn test_auto_strategy_rule() {
        let config = ChunkConfig::default();
        assert!(config.use_direct(2, 3));
        assert!(!config.use_direct(3, 3));
        assert!(!config.use_direct(4, 3));
    }

    #[test]
    fn test_output_is_rows_by_cols_ascending() {
        let grid = Grid::new(5, 4);
        let matrix = fetch_matrix(&grid, &[3, 1], &[4, 0, 2], &direct()).unwrap();
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[0, 0]], Grid::cell(0, 1));
        assert_eq!(matrix[[0, 2]], Grid::cell(4, 1));
        assert_eq!(matrix[[1, 1]], Grid::cell(2, 3));
    }

    #[test]
    fn test_chunked_clamps_final_chunk() {
        let grid = Grid::new(5, 2);
        let matrix = fetch_matrix(&grid, &[0, 1], &[0, 3, 4], &chunked(3)).unwrap();
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[1, 2]], Grid::cell(4, 1));
        assert_eq!(*grid.slabs.borrow(), vec![0..3, 3..6, 3..5]);
    }

    #[test]
    fn test_chunked_skips_unselected_chunks() {
        let grid = Grid::new(10, 1);
        fetch_matrix(&grid, &[0], &[9, 1], &chunked(4)).unwrap();
        assert_eq!(*grid.slabs.borrow(), vec![0..4, 8..12, 8..10]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let grid = Grid::new(3, 3);
        for config in [direct(), chunked(2)] {
            let matrix = fetch_matrix(&grid, &[2, 2], &[1, 0, 1], &config).unwrap();
            assert_eq!(matrix.dim(), (2, 3));
            assert_eq!(matrix.row(0).to_vec(), vec![2.0, 1002.0, 1002.0]);
            assert_eq!(matrix.row(0), matrix.row(1));
        }
    }

    #[test]
    fn test_empty_selection() {
        let grid = Grid::new(3, 3);
        assert_eq!(fetch_matrix(&grid, &[], &[0, 1], &chunked(2)).unwrap().dim(), (0, 2));
        assert_eq!(fetch_matrix(&grid, &[1], &[], &direct()).unwrap().dim(), (1, 0));
    }

    #[test]
    fn test_position_out_of_bounds() {
        let grid = Grid::new(3, 2);
        assert!(matches!(
            fetch_matrix(&grid, &[2], &[0], &direct()),
            Err(GctError::IndexOutOfBounds { axis: Axis::Row, index: 2, len: 2 })
        ));
        assert!(matches!(
            fetch_matrix(&grid, &[0], &[5], &chunked(2)),
            Err(GctError::IndexOutOfBounds { axis: Axis::Col, index: 5, len: 3 })
        ));
    }

    #[test]
    fn test_direct_and_chunked_agree() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let grid = Grid::new(257, 31);

        for _ in 0..20 {
            let mut cols: Vec<usize> = (0..257).collect();
            cols.shuffle(&mut rng);
            cols.truncate(rng.gen_range(0..257));
            let rows: Vec<usize> = (0..rng.gen_range(0..40)).map(|_| rng.gen_range(0..31)).collect();
            let chunk_size = rng.gen_range(1..100);

            let a = fetch_matrix(&grid, &rows, &cols, &direct()).unwrap();
            let b = fetch_matrix(&grid, &rows, &cols, &chunked(chunk_size)).unwrap();
            assert_eq!(a.dim(), (rows.len(), cols.len()));
            assert_eq!(a, b);
        }
    }
}
