//! Reader for `.gct` dense text files
//!
//! The whole file is read in one pass. Column metadata is loaded before the
//! data lines; each data line fills one matrix row and one row metadata
//! record. No selection is applied on this path.

use crate::error::{GctError, Result};
use crate::index::{Axis, MetadataIndex, ID, IND};
use crate::progress::Progress;
use gct_core::{parse_dims, Dims};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const FIELD_SEPARATOR: char = '\t';

/// Everything read from a dense text file
#[derive(Debug, Clone)]
pub struct DenseText {
    /// Version string from the first line
    pub version: String,
    /// `(rows, cols)` matrix in file order
    pub matrix: Array2<f64>,
    /// Row metadata: `ind` then the title line's row headers
    pub row_index: MetadataIndex,
    /// Column metadata: `ind`, `id`, then the column metadata headers
    pub col_index: MetadataIndex,
}

/// Line-oriented parser for the dense text format
pub struct DenseTextReader<R> {
    reader: R,
    path: PathBuf,
    line: usize,
    buf: String,
}

impl DenseTextReader<BufReader<File>> {
    /// Open a dense text file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GctError::io(path, e))?;
        Ok(Self::new(BufReader::new(file)).with_path(path))
    }
}

impl<R: BufRead> DenseTextReader<R> {
    /// Parse from any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            path: PathBuf::from("<input>"),
            line: 0,
            buf: String::new(),
        }
    }

    /// Path reported in I/O errors
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Read the whole file
    pub fn read(mut self, progress: &mut dyn Progress) -> Result<DenseText> {
        let version = self.read_version()?;
        let dims = self.read_dims()?;
        log::debug!(
            "{}: {} rows x {} columns, {} row metadata columns, {} column metadata lines",
            self.path.display(),
            dims.rows,
            dims.cols,
            dims.row_meta_cols,
            dims.col_meta_rows
        );

        let (row_headers, col_ids) = self.read_title(&dims)?;
        let col_index = self.read_col_meta(&dims, &col_ids)?;

        let mut row_index = MetadataIndex::new(Axis::Row);
        row_index.create_schema(std::iter::once(IND.to_string()).chain(row_headers))?;
        let matrix = self.read_data(&dims, &mut row_index, progress)?;
        self.check_trailing(&dims)?;

        Ok(DenseText {
            version,
            matrix,
            row_index,
            col_index,
        })
    }

    /// Advance to the next line, leaving it in `buf` without its line ending
    fn advance(&mut self) -> Result<bool> {
        self.buf.clear();
        let read = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|e| GctError::io(&self.path, e))?;
        if read == 0 {
            return Ok(false);
        }
        self.line += 1;
        let len = self.buf.trim_end_matches(['\n', '\r']).len();
        self.buf.truncate(len);
        Ok(true)
    }

    /// Next line split into fields, failing at end of input
    fn required_fields(&mut self, what: &str) -> Result<Vec<String>> {
        if !self.advance()? {
            return Err(GctError::MalformedHeader {
                line: self.line + 1,
                message: format!("file ends before the {what}"),
            });
        }
        Ok(self.buf.split(FIELD_SEPARATOR).map(str::to_string).collect())
    }

    fn read_version(&mut self) -> Result<String> {
        let fields = self.required_fields("version line")?;
        let version = fields[0].trim();
        if version.is_empty() {
            return Err(GctError::MalformedHeader {
                line: self.line,
                message: "empty version string".to_string(),
            });
        }
        Ok(version.to_string())
    }

    fn read_dims(&mut self) -> Result<Dims> {
        if !self.advance()? {
            return Err(GctError::MalformedHeader {
                line: self.line + 1,
                message: "file ends before the dimensions line".to_string(),
            });
        }
        parse_dims(&self.buf).map_err(|_| GctError::MalformedHeader {
            line: self.line,
            message: format!("expected four integers, found {:?}", self.buf),
        })
    }

    /// Row metadata headers and column identifiers from the title line
    fn read_title(&mut self, dims: &Dims) -> Result<(Vec<String>, Vec<String>)> {
        let mut fields = self.required_fields("title line")?;
        self.check_width(dims, fields.len())?;
        let col_ids = fields.split_off(dims.leading_fields());
        Ok((fields, col_ids))
    }

    /// Transpose the column metadata lines into one record per column
    fn read_col_meta(&mut self, dims: &Dims, col_ids: &[String]) -> Result<MetadataIndex> {
        let mut headers = vec![IND.to_string(), ID.to_string()];
        let mut lines = Vec::new();
        for _ in 0..dims.col_meta_rows {
            let mut fields = self.required_fields("end of the column metadata")?;
            self.check_width(dims, fields.len())?;
            lines.push(fields.split_off(dims.leading_fields()));
            fields.truncate(1);
            headers.append(&mut fields);
        }

        let mut index = MetadataIndex::new(Axis::Col);
        index.create_schema(headers)?;
        for (col, id) in col_ids.iter().enumerate() {
            let values = lines.iter().map(|values| values[col].clone());
            index.insert([col.to_string(), id.clone()].into_iter().chain(values))?;
        }
        Ok(index)
    }

    fn read_data(
        &mut self,
        dims: &Dims,
        row_index: &mut MetadataIndex,
        progress: &mut dyn Progress,
    ) -> Result<Array2<f64>> {
        let leading = dims.leading_fields();
        let width = dims.line_width();
        let mut cells = Vec::new();

        for row in 0..dims.rows {
            progress.update("reading data rows", row, dims.rows);
            if !self.advance()? {
                return Err(GctError::RowCountMismatch {
                    line: self.line + 1,
                    expected: dims.rows,
                    actual: row,
                });
            }

            let line = self.line;
            cells.reserve(dims.cols);
            let fields: Vec<&str> = self.buf.split(FIELD_SEPARATOR).collect();
            if fields.len() != width {
                return Err(GctError::RowCountMismatch {
                    line,
                    expected: width,
                    actual: fields.len(),
                });
            }

            for (field, value) in fields.iter().enumerate().skip(leading) {
                let number = value.trim().parse::<f64>().map_err(|_| GctError::InvalidNumber {
                    line,
                    field,
                    value: value.to_string(),
                })?;
                cells.push(number);
            }

            let meta = fields[..leading].iter().map(|value| value.to_string());
            row_index.insert(std::iter::once(row.to_string()).chain(meta))?;
        }
        progress.finish();

        Ok(Array2::from_shape_vec((dims.rows, dims.cols), cells)?)
    }

    /// Only blank lines may follow the last data line
    fn check_trailing(&mut self, dims: &Dims) -> Result<()> {
        let mut first_extra = None;
        let mut extra = 0;
        while self.advance()? {
            if !self.buf.trim().is_empty() {
                first_extra.get_or_insert(self.line);
                extra += 1;
            }
        }

        match first_extra {
            Some(line) => Err(GctError::RowCountMismatch {
                line,
                expected: dims.rows,
                actual: dims.rows + extra,
            }),
            None => Ok(()),
        }
    }

    fn check_width(&self, dims: &Dims, actual: usize) -> Result<()> {
        if actual != dims.line_width() {
            return Err(GctError::RowCountMismatch {
                line: self.line,
                expected: dims.line_width(),
                actual,
            });
        }
        Ok(())
    }
}
