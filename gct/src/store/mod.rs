//! Read-only access to `.gctx` stores
//!
//! A `.gctx` store is an HDF5 file: the matrix dataset lives at
//! `/0/DATA/0/matrix` shaped `(columns, rows)`, each axis's metadata
//! datasets live under `/0/META/COL` and `/0/META/ROW` with the identifiers
//! in `id`, and the root carries a `version` attribute.
//!
//! A [`Store`] is a scoped handle: it is opened for one logical operation and
//! closed when dropped. Opening checks the HDF5 signature and that every
//! metadata dataset and the matrix agree with the axis lengths.

mod backend;
#[cfg(test)]
pub(crate) mod builder;
mod matrix;
mod values;

pub use backend::BufferBackend;
#[cfg(feature = "mmap")]
pub use backend::MmapBackend;
pub use matrix::MatrixView;

use crate::error::{GctError, Result};
use crate::index::Axis;
use gct_core::format::constants::paths;
use gct_core::FormatError;
use hdf5::{Dataset, File, Group};
use std::path::{Path, PathBuf};
use values::DecodeError;

/// Group holding an axis's metadata datasets
pub(crate) const fn meta_group(axis: Axis) -> &'static str {
    match axis {
        Axis::Col => paths::COL_META,
        Axis::Row => paths::ROW_META,
    }
}

/// An open store
pub struct Store {
    path: PathBuf,
    file: File,
}

impl Store {
    /// Open and validate a store file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let superblock = backend::superblock_offset(path)?;
        let file = File::open(path).map_err(|e| GctError::hdf5(path, e))?;
        let store = Self {
            path: path.to_path_buf(),
            file,
        };
        store.check_axes()?;

        log::debug!(
            "opened store {} (superblock at {superblock})",
            store.path.display()
        );
        Ok(store)
    }

    /// Path the store was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The root version attribute
    pub fn version(&self) -> Result<String> {
        let names = self.file.attr_names().map_err(|e| self.hdf5(e))?;
        if !names.iter().any(|name| name == paths::VERSION_ATTR) {
            return Err(GctError::MissingEntry {
                path: format!("/{}", paths::VERSION_ATTR),
            });
        }
        let attr = self.file.attr(paths::VERSION_ATTR).map_err(|e| self.hdf5(e))?;
        values::text_scalar(&attr).map_err(|e| self.decode(e))
    }

    /// Identifiers along an axis, trimmed of padding
    pub fn ids(&self, axis: Axis) -> Result<Vec<String>> {
        self.meta_values(axis, paths::ID)
    }

    /// Length of an axis, taken from its identifier dataset
    pub fn axis_len(&self, axis: Axis) -> Result<usize> {
        let dataset = self.dataset(&meta_path(axis, paths::ID))?;
        vector_len(&dataset)
    }

    /// Names of an axis's metadata datasets, in group member order
    pub fn meta_arrays(&self, axis: Axis) -> Result<Vec<String>> {
        let group = self.group(meta_group(axis))?;
        let names = group.member_names().map_err(|e| self.hdf5(e))?;
        Ok(names
            .into_iter()
            .filter(|name| group.dataset(name).is_ok())
            .collect())
    }

    /// Every value of one metadata dataset as text
    ///
    /// Numeric datasets are formatted; strings are trimmed of padding.
    pub fn meta_values(&self, axis: Axis, name: &str) -> Result<Vec<String>> {
        let dataset = self.dataset(&meta_path(axis, name))?;
        vector_len(&dataset)?;
        values::text_values(&dataset).map_err(|e| self.decode(e))
    }

    /// Selected values of one metadata dataset as text
    pub fn meta_values_at(&self, axis: Axis, name: &str, positions: &[usize]) -> Result<Vec<String>> {
        let values = self.meta_values(axis, name)?;
        positions
            .iter()
            .map(|&pos| {
                values.get(pos).cloned().ok_or(GctError::IndexOutOfBounds {
                    axis,
                    index: pos,
                    len: values.len(),
                })
            })
            .collect()
    }

    /// View of the stored matrix
    pub fn matrix(&self) -> Result<MatrixView<'_>> {
        let dataset = self.dataset(paths::MATRIX)?;
        MatrixView::new(dataset, &self.path)
    }

    fn group(&self, path: &str) -> Result<Group> {
        if !self.file.link_exists(path) {
            return Err(GctError::MissingEntry {
                path: path.to_string(),
            });
        }
        self.file.group(path).map_err(|e| self.hdf5(e))
    }

    fn dataset(&self, path: &str) -> Result<Dataset> {
        if !self.file.link_exists(path) {
            return Err(GctError::MissingEntry {
                path: path.to_string(),
            });
        }
        self.file.dataset(path).map_err(|e| self.hdf5(e))
    }

    /// Every dataset on an axis matches the identifier length, and the
    /// matrix matches both identifier lengths
    fn check_axes(&self) -> Result<()> {
        let mut lengths = [None, None];
        for (slot, axis) in [Axis::Col, Axis::Row].into_iter().enumerate() {
            let id_len = match self.axis_len(axis) {
                Ok(len) => len,
                Err(GctError::MissingEntry { .. }) => continue,
                Err(err) => return Err(err),
            };
            for name in self.meta_arrays(axis)? {
                let dataset = self.dataset(&meta_path(axis, &name))?;
                if vector_len(&dataset)? != id_len {
                    return Err(FormatError::AxisMismatch.into());
                }
            }
            lengths[slot] = Some(id_len);
        }

        if self.file.link_exists(paths::MATRIX) {
            let view = self.matrix()?;
            let [cols, rows] = lengths;
            if cols.is_some_and(|n| n != view.ncols()) || rows.is_some_and(|n| n != view.nrows()) {
                return Err(FormatError::AxisMismatch.into());
            }
            log::debug!(
                "matrix {} x {} of {} ({} bytes per column)",
                view.ncols(),
                view.nrows(),
                view.data_type(),
                view.nrows().saturating_mul(view.data_type().size_bytes())
            );
        }
        Ok(())
    }

    fn hdf5(&self, source: hdf5::Error) -> GctError {
        GctError::hdf5(&self.path, source)
    }

    fn decode(&self, err: DecodeError) -> GctError {
        match err {
            DecodeError::Hdf5(source) => self.hdf5(source),
            DecodeError::Format(err) => err.into(),
        }
    }
}

fn meta_path(axis: Axis, name: &str) -> String {
    format!("{}/{name}", meta_group(axis))
}

/// Length of a one-dimensional dataset
fn vector_len(dataset: &Dataset) -> Result<usize> {
    match dataset.shape().as_slice() {
        &[len] => Ok(len),
        _ => Err(FormatError::InvalidRank.into()),
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        log::debug!("closed store {}", self.path.display());
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}
