//! Tabular catalogue layer
//!
//! Every input table of the planner shares one contract: a declared ordered
//! column list, a subset of key columns with primary-key semantics, a subset
//! of required columns, per-column defaults and scalar types. The
//! [`Catalogue`] container enforces that contract on construction and exposes
//! key-indexed lookup, last-write-wins upserts, partial updates and a
//! left-join merge over common key columns.
//!
//! Concrete tables implement [`Record`] with a statically known schema; the
//! dynamic column metadata only matters at load boundaries, where cells
//! arrive as text and must be coerced to their declared types.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::domain::errors::CatalogueError;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Coerces the value to the declared column kind.
    ///
    /// Text cells are parsed (`"1"` with an integer column yields `1`,
    /// `"inf"` with a float column yields `+∞`); integers widen to floats;
    /// floats narrow to integers only when integral. Anything else is a
    /// coercion failure.
    pub fn coerce(&self, kind: ColumnKind) -> Option<Value> {
        match (self, kind) {
            (Value::Str(s), ColumnKind::Str) => Some(Value::Str(s.clone())),
            (Value::Int(i), ColumnKind::Str) => Some(Value::Str(i.to_string())),
            (Value::Float(f), ColumnKind::Str) => Some(Value::Str(f.to_string())),
            (Value::Int(i), ColumnKind::Int) => Some(Value::Int(*i)),
            (Value::Str(s), ColumnKind::Int) => s.trim().parse::<i64>().ok().map(Value::Int),
            (Value::Float(f), ColumnKind::Int) if f.fract() == 0.0 => Some(Value::Int(*f as i64)),
            (Value::Float(_), ColumnKind::Int) => None,
            (Value::Float(f), ColumnKind::Float) => Some(Value::Float(*f)),
            (Value::Int(i), ColumnKind::Float) => Some(Value::Float(*i as f64)),
            (Value::Str(s), ColumnKind::Float) => s.trim().parse::<f64>().ok().map(Value::Float),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Declared scalar type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Str,
    Int,
    Float,
}

impl ColumnKind {
    fn name(self) -> &'static str {
        match self {
            ColumnKind::Str => "str",
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
        }
    }
}

/// Schema entry for one catalogue column
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub key: bool,
    pub required: bool,
    /// Fill value for missing optional columns and null cells
    pub default: Option<Value>,
}

impl ColumnSpec {
    pub fn key(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            key: true,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &'static str, kind: ColumnKind, default: Value) -> Self {
        Self {
            name,
            kind,
            key: false,
            required: false,
            default: Some(default),
        }
    }
}

/// One input row as named cells; an absent entry is a null cell
pub type RawRow = BTreeMap<String, Value>;

/// A typed catalogue row with a statically known schema
pub trait Record: Clone {
    /// Key tuple identifying the row (primary-key semantics)
    type Key: Ord + Clone + fmt::Debug + std::hash::Hash;

    /// Catalogue name used in diagnostics
    fn catalogue_name() -> &'static str;

    /// Declared ordered column list
    fn columns() -> Vec<ColumnSpec>;

    fn key(&self) -> Self::Key;

    /// Builds a record from a fully defaulted and coerced cell map
    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError>;

    /// Dynamic accessor used by merge, update and grid printing
    fn get(&self, column: &str) -> Option<Value>;

    /// Assigns one non-key cell; the value has already been coerced
    fn set(&mut self, column: &str, value: &Value) -> Result<(), CatalogueError>;

    fn key_columns() -> Vec<&'static str> {
        Self::columns()
            .iter()
            .filter(|c| c.key)
            .map(|c| c.name)
            .collect()
    }
}

/// Construction behavior switches
#[derive(Debug, Clone, Copy)]
pub struct CatalogueOptions {
    /// Sort rows by key ascending after construction
    pub sort: bool,
    /// Drop duplicate keys keeping the last occurrence; when disabled a
    /// duplicate key is an error
    pub drop_duplicates: bool,
}

impl Default for CatalogueOptions {
    fn default() -> Self {
        Self {
            sort: true,
            drop_duplicates: true,
        }
    }
}

/// Validated, key-indexed table of records
#[derive(Debug, Clone)]
pub struct Catalogue<R: Record> {
    rows: Vec<R>,
}

impl<R: Record> Catalogue<R> {
    /// Builds a catalogue from typed rows with default options
    pub fn new(rows: Vec<R>) -> Result<Self, CatalogueError> {
        Self::with_options(rows, CatalogueOptions::default())
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn with_options(rows: Vec<R>, options: CatalogueOptions) -> Result<Self, CatalogueError> {
        let mut catalogue = Self { rows: Vec::new() };
        if options.drop_duplicates {
            for row in rows {
                catalogue.upsert(row);
            }
        } else {
            for row in rows {
                let key = row.key();
                if catalogue.find(&key).is_some() {
                    return Err(CatalogueError::DuplicateKey {
                        catalogue: R::catalogue_name(),
                        key: format!("{:?}", key),
                    });
                }
                catalogue.rows.push(row);
            }
        }
        if options.sort {
            catalogue.rows.sort_by(|a, b| a.key().cmp(&b.key()));
        }
        Ok(catalogue)
    }

    /// Builds a catalogue from an untyped table.
    ///
    /// `columns` is the set of column names the table actually carries;
    /// required columns must be among them. Unknown columns are warned about
    /// and dropped; missing optional columns and null cells are filled with
    /// their declared defaults; every cell is coerced to its declared type.
    pub fn from_table(columns: &[String], rows: Vec<RawRow>) -> Result<Self, CatalogueError> {
        Self::from_table_with_options(columns, rows, CatalogueOptions::default())
    }

    pub fn from_table_with_options(
        columns: &[String],
        rows: Vec<RawRow>,
        options: CatalogueOptions,
    ) -> Result<Self, CatalogueError> {
        let specs = R::columns();
        let name = R::catalogue_name();

        let missing_required: Vec<&str> = specs
            .iter()
            .filter(|s| s.required && !columns.iter().any(|c| c == s.name))
            .map(|s| s.name)
            .collect();
        if !missing_required.is_empty() {
            return Err(CatalogueError::MissingRequiredColumn {
                catalogue: name,
                columns: missing_required.join(", "),
            });
        }

        let unknown: Vec<&str> = columns
            .iter()
            .filter(|c| !specs.iter().any(|s| s.name == c.as_str()))
            .map(|c| c.as_str())
            .collect();
        if !unknown.is_empty() {
            warn!("[{}] unknown columns: {}", name, unknown.join(", "));
        }

        for spec in specs.iter().filter(|s| !s.required) {
            if !columns.iter().any(|c| c == spec.name) {
                warn!(
                    "[{}] no information for column {}; using its default",
                    name, spec.name
                );
            }
        }

        let mut typed = Vec::with_capacity(rows.len());
        for row in rows {
            typed.push(Self::typed_row(&specs, name, row)?);
        }
        Self::with_options(typed, options)
    }

    fn typed_row(
        specs: &[ColumnSpec],
        name: &'static str,
        raw: RawRow,
    ) -> Result<R, CatalogueError> {
        let mut cells = RawRow::new();
        for spec in specs {
            let cell = match raw.get(spec.name) {
                Some(value) => value.clone(),
                None => match &spec.default {
                    Some(default) => default.clone(),
                    None => {
                        return Err(CatalogueError::MissingRequiredColumn {
                            catalogue: name,
                            columns: spec.name.to_string(),
                        })
                    }
                },
            };
            let coerced = cell.coerce(spec.kind).ok_or_else(|| CatalogueError::BadType {
                catalogue: name,
                column: spec.name.to_string(),
                value: cell.to_string(),
                expected: spec.kind.name(),
            })?;
            cells.insert(spec.name.to_string(), coerced);
        }
        R::from_cells(&cells)
    }

    /// Adds one row; an existing row with the same key is silently replaced
    pub fn add(&mut self, row: R) {
        self.upsert(row);
        self.rows.sort_by(|a, b| a.key().cmp(&b.key()));
    }

    fn upsert(&mut self, row: R) {
        let key = row.key();
        if let Some(existing) = self.rows.iter_mut().find(|r| r.key() == key) {
            *existing = row;
        } else {
            self.rows.push(row);
        }
    }

    /// Applies partial rows by key.
    ///
    /// Only columns present in a partial row are written; key columns are
    /// never rewritten; partial rows whose key is not in the catalogue are
    /// silently ignored.
    pub fn update(&mut self, partial_rows: &[RawRow]) -> Result<(), CatalogueError> {
        let specs = R::columns();
        let name = R::catalogue_name();
        let key_columns = R::key_columns();

        for partial in partial_rows {
            let mut key_cells = RawRow::new();
            let mut key_complete = true;
            for column in &key_columns {
                let spec = specs
                    .iter()
                    .find(|s| s.name == *column)
                    .expect("key columns come from the declared schema");
                match partial.get(*column).and_then(|v| v.coerce(spec.kind)) {
                    Some(value) => {
                        key_cells.insert((*column).to_string(), value);
                    }
                    None => key_complete = false,
                }
            }
            if !key_complete {
                warn!("[{}] partial row without a complete key ignored", name);
                continue;
            }

            let target = self.rows.iter_mut().find(|row| {
                key_columns
                    .iter()
                    .all(|column| row.get(column) == key_cells.get(*column).cloned())
            });
            let Some(target) = target else {
                continue;
            };

            for (column, value) in partial {
                if key_columns.iter().any(|k| k == column) {
                    continue;
                }
                let Some(spec) = specs.iter().find(|s| s.name == column.as_str()) else {
                    warn!("[{}] unknown column '{}' in partial row", name, column);
                    continue;
                };
                let coerced = value.coerce(spec.kind).ok_or_else(|| CatalogueError::BadType {
                    catalogue: name,
                    column: column.clone(),
                    value: value.to_string(),
                    expected: spec.kind.name(),
                })?;
                target.set(column, &coerced)?;
            }
        }
        Ok(())
    }

    /// Left-joins another catalogue on the intersection of key columns.
    ///
    /// Each of this catalogue's rows is paired with the first matching row of
    /// `other`; with no common key columns the join degenerates to the
    /// original rows and a warning is logged.
    pub fn merge<'a, S: Record>(&self, other: &'a Catalogue<S>) -> Vec<(R, Option<&'a S>)> {
        let common: Vec<&str> = R::key_columns()
            .into_iter()
            .filter(|c| S::key_columns().contains(c))
            .collect();
        if common.is_empty() {
            warn!(
                "no common key columns between '{}' and '{}'",
                R::catalogue_name(),
                S::catalogue_name()
            );
            return self.rows.iter().map(|r| (r.clone(), None)).collect();
        }
        self.rows
            .iter()
            .map(|left| {
                let right = other
                    .rows
                    .iter()
                    .find(|r| common.iter().all(|c| left.get(c) == r.get(c)));
                (left.clone(), right)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn find(&self, key: &R::Key) -> Option<&R> {
        self.rows.iter().find(|r| r.key() == *key)
    }

    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.find(key).is_some()
    }

    /// View of the catalogue keyed by the key tuple
    pub fn by_key(&self) -> BTreeMap<R::Key, &R> {
        self.rows.iter().map(|r| (r.key(), r)).collect()
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Vec<Value> {
        self.rows.iter().filter_map(|r| r.get(name)).collect()
    }
}

impl<R: Record> fmt::Display for Catalogue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "Empty {}", R::catalogue_name());
        }
        let specs = R::columns();
        let mut widths: Vec<usize> = specs.iter().map(|s| s.name.len()).collect();
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let cells: Vec<String> = specs
                .iter()
                .map(|s| row.get(s.name).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
            grid.push(cells);
        }
        for (i, spec) in specs.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:<width$}", spec.name, width = widths[i])?;
        }
        for cells in grid {
            writeln!(f)?;
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:<width$}", cell, width = widths[i])?;
            }
        }
        Ok(())
    }
}

pub(crate) fn take_str(
    catalogue: &'static str,
    cells: &RawRow,
    column: &'static str,
) -> Result<String, CatalogueError> {
    cells
        .get(column)
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| CatalogueError::BadType {
            catalogue,
            column: column.to_string(),
            value: cells.get(column).map(|v| v.to_string()).unwrap_or_default(),
            expected: "str",
        })
}

pub(crate) fn take_uint(
    catalogue: &'static str,
    cells: &RawRow,
    column: &'static str,
) -> Result<u32, CatalogueError> {
    cells
        .get(column)
        .and_then(Value::as_int)
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| CatalogueError::BadType {
            catalogue,
            column: column.to_string(),
            value: cells.get(column).map(|v| v.to_string()).unwrap_or_default(),
            expected: "int >= 0",
        })
}

pub(crate) fn take_float(
    catalogue: &'static str,
    cells: &RawRow,
    column: &'static str,
) -> Result<f64, CatalogueError> {
    cells
        .get(column)
        .and_then(Value::as_float)
        .ok_or_else(|| CatalogueError::BadType {
            catalogue,
            column: column.to_string(),
            value: cells.get(column).map(|v| v.to_string()).unwrap_or_default(),
            expected: "float",
        })
}
