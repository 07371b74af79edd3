//! Dataset-level quality figures shown next to the rule results.

use crate::core::Summary;
use crate::dataset::Dataset;
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array};
use arrow::datatypes::DataType;
use serde::Serialize;

/// Share of missing values in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_count: usize,
    /// Percentage of rows, not rounded
    pub missing_percentage: f64,
}

/// Key figures about a dataset and the violations found in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityKpis {
    pub row_count: usize,
    /// Total unexpected values relative to the row count, rounded to one decimal
    pub error_percentage: f64,
    /// Rows with at least one missing value
    pub rows_with_missing: usize,
    /// `rows_with_missing` relative to the row count, rounded to one decimal
    pub empty_rows_percentage: f64,
    /// Columns with missing values, in dataset column order
    pub missing_by_column: Vec<ColumnMissing>,
}

impl QualityKpis {
    /// Computes the figures for `dataset` given the summary of its validation run.
    ///
    /// Missing means null, or NaN in a floating point column. An empty dataset
    /// reports zero for every percentage.
    ///
    /// `error_percentage` counts violations, not rows, so a row that breaks
    /// several rules contributes more than once and the figure may exceed 100.
    pub fn compute(dataset: &Dataset, summary: &Summary) -> Self {
        let rows = dataset.row_count();
        let batch = dataset.record_batch();
        let mut row_has_missing = vec![false; rows];
        let mut missing_by_column = Vec::new();

        for (field, array) in batch.schema().fields().iter().zip(batch.columns()) {
            let mut missing_count = 0;
            for (row, flag) in row_has_missing.iter_mut().enumerate() {
                if is_missing(array, row) {
                    missing_count += 1;
                    *flag = true;
                }
            }
            if missing_count > 0 {
                missing_by_column.push(ColumnMissing {
                    column: field.name().clone(),
                    missing_count,
                    missing_percentage: percentage(missing_count as u64, rows),
                });
            }
        }

        let rows_with_missing = row_has_missing.iter().filter(|&&missing| missing).count();

        Self {
            row_count: rows,
            error_percentage: round1(percentage(summary.total_unexpected, rows)),
            rows_with_missing,
            empty_rows_percentage: round1(percentage(rows_with_missing as u64, rows)),
            missing_by_column,
        }
    }
}

fn is_missing(array: &ArrayRef, row: usize) -> bool {
    if array.is_null(row) {
        return true;
    }
    match array.data_type() {
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .is_some_and(|values| values.value(row).is_nan()),
        DataType::Float32 => array
            .as_any()
            .downcast_ref::<Float32Array>()
            .is_some_and(|values| values.value(row).is_nan()),
        _ => false,
    }
}

fn percentage(count: u64, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        count as f64 / rows as f64 * 100.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
