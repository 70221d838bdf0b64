//! Column-oriented table with positional row identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric view of the cell. Only `Int` and `Float` are numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Hashable identity used for equality grouping (mode, duplicates).
    pub fn key(&self) -> CellKey<'_> {
        match self {
            Self::Missing => CellKey::Missing,
            Self::Bool(v) => CellKey::Bool(*v),
            Self::Int(v) => CellKey::Int(*v),
            // -0.0 and 0.0 compare equal, so they must share a key.
            Self::Float(v) if *v == 0.0 => CellKey::Float(0.0_f64.to_bits()),
            Self::Float(v) => CellKey::Float(v.to_bits()),
            Self::Text(v) => CellKey::Text(v.as_str()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_numeric(*v)),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Borrowed, hashable form of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Missing,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Column of `len` copies of `value`.
    pub fn constant(name: impl Into<String>, value: &Cell, len: usize) -> Self {
        Self::new(name, vec![value.clone(); len])
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    /// Iterator over the non-missing cells, in row order.
    pub fn present(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| !cell.is_missing())
    }

    /// True when every present cell is numeric and at least one is present.
    pub fn is_numeric(&self) -> bool {
        let mut present = self.present().peekable();
        present.peek().is_some() && present.all(Cell::is_numeric)
    }
}

/// Ordered collection of equally long columns.
///
/// Rows have no key; identity is the row index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, rejecting ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(TableError::LengthMismatch {
                        column: column.name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Like [`Table::column`], but absence is a structural error.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| TableError::MissingColumn {
            column: name.to_string(),
        })
    }

    pub fn require_column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.column_mut(name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Appends a column, or replaces the existing column of the same name in place.
    pub fn upsert_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.height() {
            let actual = column.len();
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.height(),
                actual,
            });
        }
        match self.column_index(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Sets `name` to `derive` applied to each cell of `source`, appending the
    /// column if absent. Returns `false`, leaving the table as is, when
    /// `source` does not exist.
    pub fn derive_column(&mut self, name: &str, source: &str, derive: impl Fn(&Cell) -> Cell) -> bool {
        let Some(source) = self.column(source) else {
            return false;
        };
        let column = Column::new(name, source.cells.iter().map(derive).collect());
        match self.column_index(name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        true
    }

    /// Sets `name` to `value` on every row, appending the column if absent.
    pub fn set_constant(&mut self, name: &str, value: &Cell) {
        let column = Column::constant(name, value, self.height());
        match self.column_index(name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
    }

    /// Cells of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[idx]).collect()
    }

    /// Hashable identity of row `idx` across all columns.
    pub fn row_key(&self, idx: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.cells[idx].key()).collect()
    }

    /// Keeps the rows whose mask entry is `true`, preserving their order.
    pub fn filter_rows(self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.height() {
            return Err(TableError::MaskLength {
                expected: self.height(),
                actual: keep.len(),
            });
        }
        let columns = self
            .columns
            .into_iter()
            .map(|column| Column {
                name: column.name,
                cells: column
                    .cells
                    .into_iter()
                    .zip(keep)
                    .filter_map(|(cell, keep)| keep.then_some(cell))
                    .collect(),
            })
            .collect();
        Ok(Self { columns })
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }
}
