//! Queryable per-axis metadata tables
//!
//! A [`MetadataIndex`] holds one text-valued row per loaded row or column of
//! the matrix. Queries are built from typed parts: an [`Operator`] plus a
//! literal classified once at query time. Header names and values are only
//! ever compared as data.

use crate::error::{GctError, Result};
use hashbrown::HashMap;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Header holding each element's position in the loaded matrix
pub const IND: &str = "ind";

/// Conventional header holding each element's identifier
pub const ID: &str = "id";

/// One of the two matrix dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Matrix rows (genes, features)
    Row,
    /// Matrix columns (samples)
    Col,
}

impl Axis {
    /// Short table name for this axis
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Col => "col",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator of a predicate query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// `=`
    #[default]
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Operator {
    /// Whether `stored <op> literal` holds given their ordering
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}

impl FromStr for Operator {
    type Err = GctError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            other => Err(GctError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// Right-hand side of a predicate, classified once per query
#[derive(Debug, Clone, PartialEq)]
enum Literal<'a> {
    Numeric(f64),
    Text(&'a str),
}

impl<'a> Literal<'a> {
    fn classify(value: &'a str) -> Self {
        match value.trim().parse::<f64>() {
            Ok(number) => Literal::Numeric(number),
            Err(_) => Literal::Text(value),
        }
    }

    fn compare(&self, stored: &str) -> Option<Ordering> {
        match self {
            Literal::Numeric(number) => cast_real(stored).partial_cmp(number),
            Literal::Text(text) => Some(stored.cmp(*text)),
        }
    }
}

/// Cast stored text to a real number
///
/// Uses the longest numeric prefix of the trimmed text; text without one
/// casts to 0.0.
pub fn cast_real(text: &str) -> f64 {
    let bytes = text.trim().as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    std::str::from_utf8(&bytes[..end])
        .ok()
        .and_then(|prefix| prefix.parse().ok())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone)]
struct Schema {
    headers: Vec<String>,
    positions: HashMap<String, usize>,
}

/// Axis-scoped key/value table with dynamic schema
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    axis: Axis,
    schema: Option<Schema>,
    rows: Vec<Vec<String>>,
}

impl MetadataIndex {
    /// Create an empty table for an axis; no schema is declared yet
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            schema: None,
            rows: Vec::new(),
        }
    }

    /// Axis this table describes
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Whether a schema has been declared since the last reset
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Drop the schema and every row
    pub fn reset(&mut self) {
        self.schema = None;
        self.rows.clear();
    }

    /// Declare the table's headers
    ///
    /// Headers must be non-empty, unique, and include [`IND`]. Declaring a
    /// schema twice without an intervening [`reset`](Self::reset) fails.
    pub fn create_schema<I, S>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.schema.is_some() {
            return Err(self.schema_error("schema already declared"));
        }

        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(headers.len());
        for (pos, header) in headers.iter().enumerate() {
            if header.is_empty() {
                return Err(self.schema_error(format!("empty header name at position {pos}")));
            }
            if positions.insert(header.clone(), pos).is_some() {
                return Err(self.schema_error(format!("duplicate header {header:?}")));
            }
        }
        if !positions.contains_key(IND) {
            return Err(self.schema_error(format!("schema must declare {IND:?}")));
        }

        self.schema = Some(Schema { headers, positions });
        Ok(())
    }

    /// Append one row; the value count must match the header count
    pub fn insert<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected = self.schema()?.headers.len();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() != expected {
            return Err(self.schema_error(format!(
                "row has {} values, schema declares {expected} headers",
                values.len()
            )));
        }
        self.rows.push(values);
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Declared header names in schema order; empty before a schema exists
    pub fn headers(&self) -> &[String] {
        self.schema
            .as_ref()
            .map_or(&[][..], |schema| schema.headers.as_slice())
    }

    /// All values of one header, in insertion order
    pub fn query_by_header(&self, header: &str) -> Result<Vec<&str>> {
        let column = self.column(header)?;
        Ok(self.rows.iter().map(|row| row[column].as_str()).collect())
    }

    /// Positions (`ind` values) of rows where `header <op> value` holds
    ///
    /// A `value` that parses as a number compares numerically against the
    /// stored text cast to a number; any other value compares as text.
    pub fn query_by_predicate(&self, header: &str, value: &str, op: Operator) -> Result<Vec<usize>> {
        let column = self.column(header)?;
        let literal = Literal::classify(value);

        self.rows
            .iter()
            .filter(|row| {
                literal
                    .compare(&row[column])
                    .is_some_and(|ordering| op.holds(ordering))
            })
            .map(|row| self.ind_of(row))
            .collect()
    }

    /// Identifiers sorted by their `ind` position
    ///
    /// The identifier header is [`ID`] when declared, otherwise the first
    /// header after [`IND`].
    pub fn ordered_identifiers(&self) -> Result<Vec<&str>> {
        let id_column = self.id_column()?;
        let mut keyed = self
            .rows
            .iter()
            .map(|row| self.ind_of(row).map(|ind| (ind, row[id_column].as_str())))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|&(ind, _)| ind);
        Ok(keyed.into_iter().map(|(_, id)| id).collect())
    }

    /// All `(header, value)` pairs for the element with identifier `id`
    pub fn record(&self, id: &str) -> Result<Option<Vec<(&str, &str)>>> {
        let id_column = self.id_column()?;
        let headers = self.headers();
        Ok(self
            .rows
            .iter()
            .find(|row| row[id_column] == id)
            .map(|row| {
                headers
                    .iter()
                    .zip(row)
                    .map(|(header, value)| (header.as_str(), value.as_str()))
                    .collect()
            }))
    }

    fn schema(&self) -> Result<&Schema> {
        self.schema
            .as_ref()
            .ok_or_else(|| self.schema_error("no schema declared"))
    }

    fn column(&self, header: &str) -> Result<usize> {
        self.schema()?
            .positions
            .get(header)
            .copied()
            .ok_or_else(|| GctError::UnknownHeader {
                axis: self.axis,
                header: header.to_string(),
            })
    }

    fn id_column(&self) -> Result<usize> {
        let schema = self.schema()?;
        if let Some(&pos) = schema.positions.get(ID) {
            return Ok(pos);
        }
        schema
            .headers
            .iter()
            .position(|header| header != IND)
            .ok_or_else(|| GctError::UnknownHeader {
                axis: self.axis,
                header: ID.to_string(),
            })
    }

    fn ind_of(&self, row: &[String]) -> Result<usize> {
        let column = self.column(IND)?;
        row[column]
            .trim()
            .parse()
            .map_err(|_| self.schema_error(format!("non-integer {IND} value {:?}", row[column])))
    }

    fn schema_error(&self, message: impl Into<String>) -> GctError {
        GctError::Schema {
            axis: self.axis,
            message: message.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MetadataIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("MetadataIndex", 3)?;
        state.serialize_field("axis", &self.axis)?;
        state.serialize_field("headers", self.headers())?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}
