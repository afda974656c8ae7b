//! In-memory columnar table
//!
//! A [`TabularDataset`] is an ordered list of named, typed columns of equal
//! length. It is built once from CSV and never mutated afterwards: filtering
//! and column derivation return new tables.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::dataset::TabularDataset;
//!
//! let csv = "Start Station,Trip Duration\nClark St,300\nState St,\n";
//! let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert!(table.has_column("Trip Duration"));
//! assert_eq!(table.numbers("Trip Duration").unwrap(), vec![Some(300.0), None]);
//!
//! let long_trips = table.filter(|row| row.number("Trip Duration").is_some_and(|d| d > 100.0));
//! assert_eq!(long_trips.row_count(), 1);
//! ```

use crate::error::{BikeshareError, Result};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Read;
use tracing::debug;

/// Rendering of a missing cell
pub const NOT_AVAILABLE: &str = "not available";

/// Typed storage for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

/// Type tag of a column, used in error messages and schema listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Timestamp,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Timestamp(_) => ColumnKind::Timestamp,
        }
    }

    /// Cell at `row`; out-of-range rows read as missing
    pub fn cell(&self, row: usize) -> Cell<'_> {
        let cell = match self {
            ColumnData::Text(v) => v.get(row).and_then(|c| c.as_deref()).map(Cell::Text),
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(Cell::Integer),
            ColumnData::Float(v) => v.get(row).copied().flatten().map(Cell::Float),
            ColumnData::Timestamp(v) => v.get(row).copied().flatten().map(Cell::Timestamp),
        };
        cell.unwrap_or(Cell::Missing)
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        fn pick<T: Clone>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices
                .iter()
                .map(|&i| values.get(i).cloned().flatten())
                .collect()
        }

        match self {
            ColumnData::Text(v) => ColumnData::Text(pick(v, indices)),
            ColumnData::Integer(v) => ColumnData::Integer(pick(v, indices)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, indices)),
            ColumnData::Timestamp(v) => ColumnData::Timestamp(pick(v, indices)),
        }
    }

    /// Infer the narrowest type that fits every non-missing value
    fn infer(raw: Vec<Option<String>>) -> ColumnData {
        let present = || raw.iter().flatten();

        if present().all(|s| s.parse::<i64>().is_ok()) && present().next().is_some() {
            return ColumnData::Integer(
                raw.iter()
                    .map(|c| c.as_deref().and_then(|s| s.parse().ok()))
                    .collect(),
            );
        }
        // "nan" and "inf" parse as f64 but are not measurements
        let finite = |s: &str| s.parse::<f64>().ok().filter(|f| f.is_finite());
        if present().all(|s| finite(s).is_some()) && present().next().is_some() {
            return ColumnData::Float(raw.iter().map(|c| c.as_deref().and_then(finite)).collect());
        }
        ColumnData::Text(raw)
    }
}

/// Borrowed view of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Missing,
    Text(&'a str),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
}

impl Cell<'_> {
    /// Numeric value of an integer or float cell
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Owned, totally ordered key for grouping
    pub fn group_key(&self) -> GroupKey {
        match self {
            Cell::Missing => GroupKey::Missing,
            Cell::Text(s) => GroupKey::Text((*s).to_string()),
            Cell::Integer(i) => GroupKey::Integer(*i),
            Cell::Float(f) => GroupKey::Float(FloatKey(*f)),
            Cell::Timestamp(ts) => GroupKey::Timestamp(*ts),
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "{NOT_AVAILABLE}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// `f64` wrapper with a total order so floats can key a `BTreeMap`
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Grouping key for one cell
///
/// Ordering is by variant first, then by value; within a column all keys share
/// a variant except `Missing`, which sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Missing,
    Integer(i64),
    Float(FloatKey),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl GroupKey {
    pub fn is_missing(&self) -> bool {
        matches!(self, GroupKey::Missing)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GroupKey::Integer(i) => Some(*i),
            GroupKey::Float(f) => Some(f.0 as i64),
            _ => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Missing => write!(f, "{NOT_AVAILABLE}"),
            GroupKey::Integer(i) => write!(f, "{i}"),
            GroupKey::Float(v) => write!(f, "{}", v.0),
            GroupKey::Text(s) => write!(f, "{s}"),
            GroupKey::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    data: ColumnData,
}

/// Rows x named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    columns: Vec<Column>,
    rows: usize,
}

impl TabularDataset {
    /// Empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the columns differ in length or a name repeats.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnData)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(Self::new(), |table, (name, data)| {
                let name = name.into();
                if table.has_column(&name) {
                    return Err(BikeshareError::InvalidData(format!(
                        "duplicate column '{name}'"
                    )));
                }
                table.with_column(name, data)
            })
    }

    /// Read a comma-separated table with a header row
    ///
    /// Fields are trimmed; empty fields become missing cells. Column types are
    /// inferred per column (integer, then float, then text). A blank header is
    /// named `column_<position>`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if h.is_empty() {
                    format!("column_{i}")
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (values, field) in raw.iter_mut().zip(record.iter()) {
                values.push((!field.is_empty()).then(|| field.to_string()));
            }
        }

        let table = Self::from_columns(
            headers
                .into_iter()
                .zip(raw)
                .map(|(name, values)| (name, ColumnData::infer(values))),
        )?;
        debug!(
            "Parsed CSV with {} rows across {} columns",
            table.row_count(),
            table.columns.len()
        );
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Typed column data
    ///
    /// # Errors
    ///
    /// Returns `Schema` if the column does not exist.
    pub fn column(&self, name: &str) -> Result<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
            .ok_or_else(|| BikeshareError::missing_column(name))
    }

    /// Values of an integer column
    pub fn integers(&self, name: &str) -> Result<&[Option<i64>]> {
        match self.column(name)? {
            ColumnData::Integer(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Integer, other.kind())),
        }
    }

    /// Values of a timestamp column
    pub fn timestamps(&self, name: &str) -> Result<&[Option<NaiveDateTime>]> {
        match self.column(name)? {
            ColumnData::Timestamp(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Timestamp, other.kind())),
        }
    }

    /// Values of an integer or float column, widened to `f64`
    ///
    /// A column with no values at all reads as all-missing whatever its type.
    pub fn numbers(&self, name: &str) -> Result<Vec<Option<f64>>> {
        match self.column(name)? {
            ColumnData::Integer(v) => Ok(v.iter().map(|c| c.map(|i| i as f64)).collect()),
            ColumnData::Float(v) => Ok(v.clone()),
            ColumnData::Text(v) if v.iter().all(Option::is_none) => Ok(vec![None; v.len()]),
            other => Err(Self::wrong_kind(name, ColumnKind::Float, other.kind())),
        }
    }

    fn wrong_kind(name: &str, expected: ColumnKind, found: ColumnKind) -> BikeshareError {
        BikeshareError::InvalidData(format!(
            "column '{name}' holds {found} values, expected {expected}"
        ))
    }

    /// Add a column, replacing any existing column of the same name
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the length differs from the table's row count.
    /// The first column of an empty table sets the row count.
    pub fn with_column(mut self, name: impl Into<String>, data: ColumnData) -> Result<Self> {
        let name = name.into();
        if self.columns.is_empty() {
            self.rows = data.len();
        } else if data.len() != self.rows {
            return Err(BikeshareError::InvalidData(format!(
                "column '{name}' has {} values but the table has {} rows",
                data.len(),
                self.rows
            )));
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column { name, data }),
        }
        Ok(self)
    }

    /// View of one row
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.rows).then_some(RowView {
            table: self,
            index,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.rows).map(move |index| RowView { table: self, index })
    }

    /// New table with the rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.take(indices),
                })
                .collect(),
            rows: indices.len(),
        }
    }

    /// New table with the rows for which `predicate` holds, order preserved
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let keep: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index)
            .collect();
        self.take(&keep)
    }

    /// Number of rows per distinct combination of values in `columns`
    ///
    /// Keys iterate in ascending order, which callers rely on for
    /// deterministic tie-breaking. Missing cells group under
    /// [`GroupKey::Missing`].
    pub fn group_counts(&self, columns: &[&str]) -> Result<BTreeMap<Vec<GroupKey>, usize>> {
        let data: Vec<&ColumnData> = columns
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<_>>()?;

        let mut counts = BTreeMap::new();
        for row in 0..self.rows {
            let key: Vec<GroupKey> = data.iter().map(|c| c.cell(row).group_key()).collect();
            *counts.entry(key).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a TabularDataset,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Position of the row within its table
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in `column`, `None` if the column does not exist
    pub fn get(&self, column: &str) -> Option<Cell<'a>> {
        self.table.column(column).ok().map(|c| c.cell(self.index))
    }

    /// Integer cell in `column`
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Cell::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Numeric cell in `column`, integers widened
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column)?.as_f64()
    }

    /// All cells of the row with their column names, in column order
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, Cell<'a>)> + 'a {
        let index = self.index;
        self.table
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), c.data.cell(index)))
    }
}
