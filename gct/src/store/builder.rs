//! Store writer for test fixtures

use gct_core::format::constants::paths;
use hdf5::types::{FixedAscii, VarLenUnicode};
use ndarray::Array2;
use std::path::Path;

/// Width of fixed-length strings written by [`StoreBuilder::col_meta_fixed`]
const FIXED_WIDTH: usize = 16;

enum Column {
    Text(Vec<String>),
    Fixed(Vec<String>),
    Float(Vec<f64>),
    Int(Vec<i64>),
}

enum Cells {
    F32(Array2<f32>),
    F64(Array2<f64>),
    I32(Array2<i32>),
}

/// Builds an HDF5 `.gctx` store with the standard group layout
#[derive(Default)]
pub(crate) struct StoreBuilder {
    version: Option<String>,
    fixed_version: bool,
    col_meta: Vec<(String, Column)>,
    row_meta: Vec<(String, Column)>,
    matrix: Option<Cells>,
}

impl StoreBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Root version attribute as a variable-length string
    pub(crate) fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Root version attribute as a fixed-length ASCII string
    pub(crate) fn fixed_version(mut self, version: &str) -> Self {
        self.fixed_version = true;
        self.version(version)
    }

    /// Add a variable-length string column dataset (`id` names the identifiers)
    pub(crate) fn col_meta(mut self, name: &str, values: &[&str]) -> Self {
        self.col_meta.push((name.to_string(), Column::Text(owned(values))));
        self
    }

    /// Add a fixed-length ASCII column dataset
    pub(crate) fn col_meta_fixed(mut self, name: &str, values: &[&str]) -> Self {
        self.col_meta.push((name.to_string(), Column::Fixed(owned(values))));
        self
    }

    /// Add a float column dataset
    pub(crate) fn col_meta_f64(mut self, name: &str, values: &[f64]) -> Self {
        self.col_meta.push((name.to_string(), Column::Float(values.to_vec())));
        self
    }

    /// Add a variable-length string row dataset (`id` names the identifiers)
    pub(crate) fn row_meta(mut self, name: &str, values: &[&str]) -> Self {
        self.row_meta.push((name.to_string(), Column::Text(owned(values))));
        self
    }

    /// Add an integer row dataset
    pub(crate) fn row_meta_i64(mut self, name: &str, values: &[i64]) -> Self {
        self.row_meta.push((name.to_string(), Column::Int(values.to_vec())));
        self
    }

    /// Add the matrix from column-major f64 cells (`ncols` x `nrows`)
    pub(crate) fn matrix_f64(mut self, ncols: usize, nrows: usize, cells: &[f64]) -> Self {
        self.matrix = Some(Cells::F64(shaped(ncols, nrows, cells)));
        self
    }

    /// Add the matrix from column-major f32 cells (`ncols` x `nrows`)
    pub(crate) fn matrix_f32(mut self, ncols: usize, nrows: usize, cells: &[f32]) -> Self {
        self.matrix = Some(Cells::F32(shaped(ncols, nrows, cells)));
        self
    }

    /// Add the matrix from column-major i32 cells (`ncols` x `nrows`)
    pub(crate) fn matrix_i32(mut self, ncols: usize, nrows: usize, cells: &[i32]) -> Self {
        self.matrix = Some(Cells::I32(shaped(ncols, nrows, cells)));
        self
    }

    /// Write the store to `path`
    pub(crate) fn write(&self, path: &Path) -> hdf5::Result<()> {
        let file = hdf5::File::create(path)?;

        if let Some(version) = &self.version {
            if self.fixed_version {
                let value = FixedAscii::<FIXED_WIDTH>::from_ascii(version).unwrap();
                file.new_attr::<FixedAscii<FIXED_WIDTH>>()
                    .shape(())
                    .create(paths::VERSION_ATTR)?
                    .write_scalar(&value)?;
            } else {
                let value: VarLenUnicode = version.parse().unwrap();
                file.new_attr::<VarLenUnicode>()
                    .shape(())
                    .create(paths::VERSION_ATTR)?
                    .write_scalar(&value)?;
            }
        }

        let root = file.create_group("0")?;
        let data = root.create_group("DATA")?.create_group("0")?;
        let meta = root.create_group("META")?;
        write_columns(&meta.create_group("COL")?, &self.col_meta)?;
        write_columns(&meta.create_group("ROW")?, &self.row_meta)?;

        let name = "matrix";
        match &self.matrix {
            Some(Cells::F32(cells)) => {
                data.new_dataset_builder().with_data(cells).create(name)?;
            }
            Some(Cells::F64(cells)) => {
                data.new_dataset_builder().with_data(cells).create(name)?;
            }
            Some(Cells::I32(cells)) => {
                data.new_dataset_builder().with_data(cells).create(name)?;
            }
            None => {}
        }
        Ok(())
    }
}

fn write_columns(group: &hdf5::Group, columns: &[(String, Column)]) -> hdf5::Result<()> {
    for (name, column) in columns {
        let name = name.as_str();
        match column {
            Column::Text(values) => {
                let values: Vec<VarLenUnicode> =
                    values.iter().map(|v| v.parse().unwrap()).collect();
                group.new_dataset_builder().with_data(&values).create(name)?;
            }
            Column::Fixed(values) => {
                let values: Vec<FixedAscii<FIXED_WIDTH>> = values
                    .iter()
                    .map(|v| FixedAscii::from_ascii(v).unwrap())
                    .collect();
                group.new_dataset_builder().with_data(&values).create(name)?;
            }
            Column::Float(values) => {
                group.new_dataset_builder().with_data(values).create(name)?;
            }
            Column::Int(values) => {
                group.new_dataset_builder().with_data(values).create(name)?;
            }
        }
    }
    Ok(())
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn shaped<T: Clone>(ncols: usize, nrows: usize, cells: &[T]) -> Array2<T> {
    Array2::from_shape_vec((ncols, nrows), cells.to_vec()).unwrap()
}
