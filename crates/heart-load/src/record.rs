//! Typed rows of the `heart_disease` table.

use heart_model::{Cell, Column, HAS_DISEASE, PROCESSED_AT_COLUMN, SOURCE_COLUMN, TARGET, Table};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};

/// One stored record. The database assigns `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartDiseaseRecord {
    pub age: i64,
    pub sex: bool,
    pub cp: Option<i64>,
    pub trestbps: Option<i64>,
    pub chol: Option<i64>,
    pub fbs: Option<bool>,
    pub restecg: Option<i64>,
    pub thalach: Option<i64>,
    pub exang: Option<bool>,
    pub oldpeak: Option<f64>,
    pub slope: Option<i64>,
    pub ca: Option<i64>,
    pub thal: Option<i64>,
    pub target: i64,
    pub has_disease: Option<bool>,
    pub source: String,
    pub processed_at: String,
}

/// Column accessor for one table, resolving each name once.
struct Fields<'a> {
    table: &'a Table,
}

impl<'a> Fields<'a> {
    fn required(&self, name: &str) -> Result<&'a Column> {
        self.table
            .column(name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
    }

    fn optional(&self, name: &str) -> Option<&'a Column> {
        self.table.column(name)
    }
}

fn invalid(row: usize, column: &Column, expected: &'static str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.name.clone(),
        expected,
        value: column.cells[row].to_string(),
    }
}

fn int_at(column: &Column, row: usize) -> Result<Option<i64>> {
    match &column.cells[row] {
        Cell::Missing => Ok(None),
        Cell::Int(v) => Ok(Some(*v)),
        _ => Err(invalid(row, column, "integer")),
    }
}

fn bool_at(column: &Column, row: usize) -> Result<Option<bool>> {
    match &column.cells[row] {
        Cell::Missing => Ok(None),
        Cell::Bool(v) => Ok(Some(*v)),
        Cell::Int(0) => Ok(Some(false)),
        Cell::Int(1) => Ok(Some(true)),
        _ => Err(invalid(row, column, "boolean")),
    }
}

fn float_at(column: &Column, row: usize) -> Result<Option<f64>> {
    match &column.cells[row] {
        Cell::Missing => Ok(None),
        cell if cell.is_numeric() => Ok(cell.as_f64()),
        _ => Err(invalid(row, column, "number")),
    }
}

fn text_at(column: &Column, row: usize) -> Result<Option<String>> {
    match &column.cells[row] {
        Cell::Missing => Ok(None),
        Cell::Text(v) => Ok(Some(v.clone())),
        _ => Err(invalid(row, column, "text")),
    }
}

fn present<T>(value: Option<T>, row: usize, column: &Column) -> Result<T> {
    value.ok_or_else(|| LoadError::MissingValue {
        row,
        column: column.name.clone(),
    })
}

fn nullable<T>(
    column: Option<&Column>,
    row: usize,
    read: fn(&Column, usize) -> Result<Option<T>>,
) -> Result<Option<T>> {
    column.map_or(Ok(None), |c| read(c, row))
}

/// Converts a transformed table into records.
///
/// Fails on the first absent non-nullable column, missing non-nullable
/// cell, or cell of the wrong type. Columns outside the record are ignored.
pub fn records_from_table(table: &Table) -> Result<Vec<HeartDiseaseRecord>> {
    let fields = Fields { table };
    let age = fields.required("age")?;
    let sex = fields.required("sex")?;
    let target = fields.required(TARGET)?;
    let source = fields.required(SOURCE_COLUMN)?;
    let processed_at = fields.required(PROCESSED_AT_COLUMN)?;

    let cp = fields.optional("cp");
    let trestbps = fields.optional("trestbps");
    let chol = fields.optional("chol");
    let fbs = fields.optional("fbs");
    let restecg = fields.optional("restecg");
    let thalach = fields.optional("thalach");
    let exang = fields.optional("exang");
    let oldpeak = fields.optional("oldpeak");
    let slope = fields.optional("slope");
    let ca = fields.optional("ca");
    let thal = fields.optional("thal");
    let has_disease = fields.optional(HAS_DISEASE);

    (0..table.height())
        .map(|row| -> Result<HeartDiseaseRecord> {
            Ok(HeartDiseaseRecord {
                age: present(int_at(age, row)?, row, age)?,
                sex: present(bool_at(sex, row)?, row, sex)?,
                cp: nullable(cp, row, int_at)?,
                trestbps: nullable(trestbps, row, int_at)?,
                chol: nullable(chol, row, int_at)?,
                fbs: nullable(fbs, row, bool_at)?,
                restecg: nullable(restecg, row, int_at)?,
                thalach: nullable(thalach, row, int_at)?,
                exang: nullable(exang, row, bool_at)?,
                oldpeak: nullable(oldpeak, row, float_at)?,
                slope: nullable(slope, row, int_at)?,
                ca: nullable(ca, row, int_at)?,
                thal: nullable(thal, row, int_at)?,
                target: present(int_at(target, row)?, row, target)?,
                has_disease: nullable(has_disease, row, bool_at)?,
                source: present(text_at(source, row)?, row, source)?,
                processed_at: present(text_at(processed_at, row)?, row, processed_at)?,
            })
        })
        .collect()
}
