//! Typed view over the stored matrix
//!
//! The matrix dataset is shaped `(columns, rows)`, so one column's cells are
//! contiguous and a column range is a single hyperslab.

use crate::error::{GctError, Result};
use crate::index::Axis;
use gct_core::validation::validate_chunk_boundaries;
use gct_core::{DataType, FormatError, MatrixElement};
use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::{Dataset, H5Type};
use ndarray::{s, ArrayView1};
use std::ops::Range;
use std::path::Path;

/// View of the matrix dataset of an open store
///
/// The view borrows its store, so it cannot outlive the scoped handle.
#[derive(Debug, Clone)]
pub struct MatrixView<'a> {
    dataset: Dataset,
    data_type: DataType,
    ncols: usize,
    nrows: usize,
    path: &'a Path,
}

impl<'a> MatrixView<'a> {
    pub(crate) fn new(dataset: Dataset, path: &'a Path) -> Result<Self> {
        let shape = dataset.shape();
        let &[ncols, nrows] = shape.as_slice() else {
            return Err(FormatError::InvalidRank.into());
        };
        let descriptor = dataset
            .dtype()
            .and_then(|dtype| dtype.to_descriptor())
            .map_err(|e| GctError::hdf5(path, e))?;
        Ok(Self {
            dataset,
            data_type: cell_type(&descriptor)?,
            ncols,
            nrows,
            path,
        })
    }

    /// Number of stored columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Stored cell type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Read a contiguous column range restricted to `rows`
    ///
    /// Output is column-major: `rows.len()` values for each column in the
    /// range. A range ending past the column axis is a
    /// [`GctError::SliceOutOfBounds`].
    pub fn slab(&self, cols: Range<usize>, rows: &[usize]) -> Result<Vec<f64>> {
        validate_chunk_boundaries(cols.start, cols.end, self.ncols).map_err(|_| {
            GctError::SliceOutOfBounds {
                start: cols.start,
                end: cols.end,
                len: self.ncols,
            }
        })?;
        self.check_rows(rows)?;
        match self.data_type {
            DataType::F32 => self.slab_typed::<f32>(cols, rows),
            DataType::F64 => self.slab_typed::<f64>(cols, rows),
            DataType::I32 => self.slab_typed::<i32>(cols, rows),
            DataType::I64 => self.slab_typed::<i64>(cols, rows),
        }
    }

    /// Read the listed columns, in the given order, restricted to `rows`
    pub fn columns(&self, cols: &[usize], rows: &[usize]) -> Result<Vec<f64>> {
        if let Some(&index) = cols.iter().find(|&&c| c >= self.ncols) {
            return Err(GctError::IndexOutOfBounds {
                axis: Axis::Col,
                index,
                len: self.ncols,
            });
        }
        self.check_rows(rows)?;
        match self.data_type {
            DataType::F32 => self.columns_typed::<f32>(cols, rows),
            DataType::F64 => self.columns_typed::<f64>(cols, rows),
            DataType::I32 => self.columns_typed::<i32>(cols, rows),
            DataType::I64 => self.columns_typed::<i64>(cols, rows),
        }
    }

    fn check_rows(&self, rows: &[usize]) -> Result<()> {
        match rows.iter().find(|&&r| r >= self.nrows) {
            Some(&index) => Err(GctError::IndexOutOfBounds {
                axis: Axis::Row,
                index,
                len: self.nrows,
            }),
            None => Ok(()),
        }
    }

    fn slab_typed<T: MatrixElement + H5Type>(
        &self,
        cols: Range<usize>,
        rows: &[usize],
    ) -> Result<Vec<f64>> {
        debug_assert_eq!(T::data_type(), self.data_type);
        let mut out = Vec::with_capacity(cols.len().saturating_mul(rows.len()));
        if cols.is_empty() {
            return Ok(out);
        }

        let cells = self
            .dataset
            .read_slice_2d::<T, _>(s![cols.start..cols.end, ..])
            .map_err(|e| GctError::hdf5(self.path, e))?;
        for column in cells.outer_iter() {
            gather(column, rows, &mut out);
        }
        Ok(out)
    }

    fn columns_typed<T: MatrixElement + H5Type>(
        &self,
        cols: &[usize],
        rows: &[usize],
    ) -> Result<Vec<f64>> {
        debug_assert_eq!(T::data_type(), self.data_type);
        let mut out = Vec::with_capacity(cols.len().saturating_mul(rows.len()));
        for &col in cols {
            let column = self
                .dataset
                .read_slice_1d::<T, _>(s![col, ..])
                .map_err(|e| GctError::hdf5(self.path, e))?;
            gather(column.view(), rows, &mut out);
        }
        Ok(out)
    }
}

fn gather<T: MatrixElement>(column: ArrayView1<'_, T>, rows: &[usize], out: &mut Vec<f64>) {
    out.extend(rows.iter().map(|&row| column[row].to_f64()));
}

/// Cell type a stored numeric type is read as
fn cell_type(descriptor: &TypeDescriptor) -> Result<DataType> {
    match descriptor {
        TypeDescriptor::Float(FloatSize::U4) => Ok(DataType::F32),
        TypeDescriptor::Float(FloatSize::U8) => Ok(DataType::F64),
        TypeDescriptor::Integer(IntSize::U8) => Ok(DataType::I64),
        TypeDescriptor::Integer(_) => Ok(DataType::I32),
        TypeDescriptor::Unsigned(IntSize::U1 | IntSize::U2) => Ok(DataType::I32),
        TypeDescriptor::Unsigned(IntSize::U4) => Ok(DataType::I64),
        _ => Err(FormatError::UnknownDataType.into()),
    }
}
