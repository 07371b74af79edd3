//! Immutable dataset snapshots and typed column views.
//!
//! A [`Dataset`] wraps a single Arrow [`RecordBatch`]: an ordered set of named,
//! equally long, nullable columns. Rules never touch Arrow arrays directly;
//! they read through a [`ColumnAccessor`], which normalizes the many Arrow
//! physical types into the four semantic types the engine understands:
//! text, integer, floating-point and date.

use crate::prelude::*;
use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Float64Array, Int64Array, RecordBatch, StringArray,
};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Date32Type, Field, Float64Type, Int64Type, Schema, SchemaRef};
use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// An immutable, rectangular, in-memory table.
///
/// Cloning is cheap: the underlying Arrow buffers are reference counted.
///
/// # Examples
///
/// ```rust
/// use arrow::array::{ArrayRef, Int64Array, StringArray};
/// use dq_guard::dataset::Dataset;
/// use std::sync::Arc;
///
/// let dataset = Dataset::from_columns(vec![
///     ("id", Arc::new(Int64Array::from(vec![Some(1), Some(2), None])) as ArrayRef),
///     ("item", Arc::new(StringArray::from(vec!["Tea", "Cake", "Coffee"])) as ArrayRef),
/// ])
/// .unwrap();
///
/// assert_eq!(dataset.row_count(), 3);
/// assert!(dataset.has_column("item"));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Wraps an existing record batch.
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Concatenates batches sharing `schema` into one snapshot.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self { batch })
    }

    /// Builds a snapshot from `(name, array)` pairs. All columns are nullable.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: Into<String>,
    {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns
            .into_iter()
            .map(|(name, array)| {
                let field = Field::new(name.into(), array.data_type().clone(), true);
                (field, array)
            })
            .unzip();

        if arrays.is_empty() {
            return Err(DqError::Configuration(
                "A dataset needs at least one column".to_string(),
            ));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }

    /// Number of rows (N).
    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }

    /// Returns true if a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().column_with_name(name).is_some()
    }

    /// The Arrow schema of the snapshot.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// The underlying record batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Raw Arrow array for a column, if present.
    pub fn array(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// Returns a typed read-only view over the named column.
    ///
    /// Fails with [`DqError::UnknownColumn`] when the column does not exist and
    /// with [`DqError::UnsupportedColumnType`] when its Arrow type has no
    /// semantic equivalent.
    pub fn column(&self, name: &str) -> Result<ColumnAccessor> {
        let array = self
            .array(name)
            .ok_or_else(|| DqError::unknown_column(name, self.column_names()))?;
        ColumnAccessor::try_new(name, array)
    }
}

/// Semantic type of a column as seen by rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
enum ColumnValues {
    Text(StringArray),
    Integer(Int64Array),
    Float(Float64Array),
    Date(Date32Array),
}

/// A typed, read-only view over one column of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct ColumnAccessor {
    name: String,
    values: ColumnValues,
}

impl ColumnAccessor {
    /// Normalizes an Arrow array into one of the supported semantic types.
    ///
    /// Integer widths become `i64`, floats become `f64` with NaN read as null,
    /// all string layouts
    /// become `Utf8` and `Date64` becomes `Date32`. An all-null (`Null`)
    /// array is read as a text column without values.
    pub fn try_new(name: impl Into<String>, array: &ArrayRef) -> Result<Self> {
        let name = name.into();
        let values = match array.data_type() {
            DataType::Utf8 => ColumnValues::Text(array.as_string::<i32>().clone()),
            DataType::LargeUtf8 | DataType::Utf8View => {
                ColumnValues::Text(cast(array, &DataType::Utf8)?.as_string::<i32>().clone())
            }
            DataType::Null => ColumnValues::Text(StringArray::new_null(array.len())),
            DataType::Int64 => ColumnValues::Integer(array.as_primitive::<Int64Type>().clone()),
            dt if dt.is_integer() => ColumnValues::Integer(
                cast(array, &DataType::Int64)?
                    .as_primitive::<Int64Type>()
                    .clone(),
            ),
            DataType::Float64 => {
                ColumnValues::Float(nan_as_null(array.as_primitive::<Float64Type>()))
            }
            DataType::Float16 | DataType::Float32 => ColumnValues::Float(nan_as_null(
                cast(array, &DataType::Float64)?.as_primitive::<Float64Type>(),
            )),
            DataType::Date32 => ColumnValues::Date(array.as_primitive::<Date32Type>().clone()),
            DataType::Date64 => ColumnValues::Date(
                cast(array, &DataType::Date32)?
                    .as_primitive::<Date32Type>()
                    .clone(),
            ),
            other => {
                return Err(DqError::UnsupportedColumnType {
                    column: name,
                    data_type: other.to_string(),
                })
            }
        };
        Ok(Self { name, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        match self.values {
            ColumnValues::Text(_) => ColumnType::Text,
            ColumnValues::Integer(_) => ColumnType::Integer,
            ColumnValues::Float(_) => ColumnType::Float,
            ColumnValues::Date(_) => ColumnType::Date,
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Text(a) => a.len(),
            ColumnValues::Integer(a) => a.len(),
            ColumnValues::Float(a) => a.len(),
            ColumnValues::Date(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null markers in the column.
    pub fn null_count(&self) -> usize {
        match &self.values {
            ColumnValues::Text(a) => a.null_count(),
            ColumnValues::Integer(a) => a.null_count(),
            ColumnValues::Float(a) => a.null_count(),
            ColumnValues::Date(a) => a.null_count(),
        }
    }

    /// Returns the value at `row`, or `None` when the cell is null.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    pub fn value(&self, row: usize) -> Option<CellValue<'_>> {
        match &self.values {
            ColumnValues::Text(a) => a.is_valid(row).then(|| CellValue::Text(a.value(row))),
            ColumnValues::Integer(a) => a.is_valid(row).then(|| CellValue::Integer(a.value(row))),
            ColumnValues::Float(a) => a.is_valid(row).then(|| CellValue::Float(a.value(row))),
            ColumnValues::Date(a) => a
                .is_valid(row)
                .then(|| a.value_as_date(row))
                .flatten()
                .map(CellValue::Date),
        }
    }

    /// Iterates over all cells in row order.
    pub fn iter(&self) -> impl Iterator<Item = Option<CellValue<'_>>> + '_ {
        (0..self.len()).map(move |row| self.value(row))
    }
}

/// NaN marks a missing float; it is stored as null so that every rule and
/// [`ColumnAccessor::null_count`] agree on what is missing.
fn nan_as_null(array: &Float64Array) -> Float64Array {
    if !array.iter().flatten().any(f64::is_nan) {
        return array.clone();
    }
    array.iter().map(|value| value.filter(|v| !v.is_nan())).collect()
}

/// A single non-null cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl<'a> CellValue<'a> {
    /// Numeric interpretation of the cell. Text, dates and NaN are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            CellValue::Integer(v) => Some(v as f64),
            CellValue::Float(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    /// Canonical string rendering used by pattern and set matching.
    pub fn render(&self) -> Cow<'a, str> {
        match *self {
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Integer(v) => Cow::Owned(v.to_string()),
            CellValue::Float(v) => Cow::Owned(v.to_string()),
            CellValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Hashable identity of the cell. `-0.0` and `0.0` share a key, as do all NaNs.
    pub(crate) fn key(&self) -> CellKey<'a> {
        match *self {
            CellValue::Text(s) => CellKey::Text(s),
            CellValue::Integer(v) => CellKey::Integer(v),
            CellValue::Float(v) => {
                let normalized = if v == 0.0 {
                    0.0
                } else if v.is_nan() {
                    f64::NAN
                } else {
                    v
                };
                CellKey::Float(normalized.to_bits())
            }
            CellValue::Date(d) => CellKey::Date(d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Text(&'a str),
    Integer(i64),
    Float(u64),
    Date(NaiveDate),
}
