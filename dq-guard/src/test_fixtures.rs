//! Synthetic café transaction data for tests and benchmarks.
//!
//! [`CafeFixture`] produces a seeded, reproducible version of the dirty café
//! sales export: missing values, `ERROR`/`UNKNOWN` markers, out-of-range
//! quantities, duplicate transaction ids and malformed dates, each injected at
//! a configurable rate.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::reference::{
    PAYMENT_METHOD, PAYMENT_METHODS, QUANTITY, TOTAL_SPENT, TRANSACTION_DATE, TRANSACTION_ID,
};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const ITEMS: [&str; 6] = ["Coffee", "Tea", "Sandwich", "Salad", "Cake", "Cookie"];
const PRICES: [f64; 6] = [2.0, 1.5, 4.0, 5.0, 3.0, 1.0];

/// One generated transaction, with every field as it appears in the export.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub transaction_id: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<String>,
    pub total_spent: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CafeFixture {
    rows: usize,
    dirty_ratio: f64,
    seed: u64,
}

impl CafeFixture {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            dirty_ratio: 0.1,
            seed: 42,
        }
    }

    /// Probability that any single field is corrupted, clamped to `[0, 1]`.
    pub fn with_dirty_ratio(mut self, ratio: f64) -> Self {
        self.dirty_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Generates the raw transactions. The same seed yields the same rows.
    pub fn transactions(&self) -> Vec<RawTransaction> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.rows)
            .map(|row| self.transaction(&mut rng, row))
            .collect()
    }

    fn transaction(&self, rng: &mut StdRng, row: usize) -> RawTransaction {
        let item_index = rng.random_range(0..ITEMS.len());
        let quantity: u32 = rng.random_range(1..=5);
        let total = PRICES[item_index] * f64::from(quantity);
        let method = PAYMENT_METHODS[rng.random_range(0..PAYMENT_METHODS.len())];
        let day = rng.random_range(1..=28);
        let month = rng.random_range(1..=12);

        let transaction_id = if row > 0 && self.dirty(rng) {
            // Reuse the previous id
            Some(format!("TXN_{:07}", row - 1))
        } else {
            Some(format!("TXN_{row:07}"))
        };

        let quantity = match self.corruption(rng) {
            Some(0) => None,
            Some(1) => Some("ERROR".to_string()),
            Some(_) => Some(rng.random_range(11..=20u32).to_string()),
            None => Some(quantity.to_string()),
        };

        let total_spent = match self.corruption(rng) {
            Some(0) => None,
            Some(1) => Some("UNKNOWN".to_string()),
            Some(_) => Some("0.0".to_string()),
            None => Some(format!("{total:.1}")),
        };

        let payment_method = match self.corruption(rng) {
            Some(0) => None,
            Some(1) => Some("ERROR".to_string()),
            Some(_) => Some("UNKNOWN".to_string()),
            None => Some(method.to_string()),
        };

        let transaction_date = match self.corruption(rng) {
            Some(0) => None,
            Some(1) => Some("ERROR".to_string()),
            Some(_) => Some(format!("{day:02}/{month:02}/2023")),
            None => Some(format!("2023-{month:02}-{day:02}")),
        };

        RawTransaction {
            transaction_id,
            item: Some(ITEMS[item_index].to_string()),
            quantity,
            total_spent,
            payment_method,
            transaction_date,
        }
    }

    fn dirty(&self, rng: &mut StdRng) -> bool {
        rng.random_bool(self.dirty_ratio)
    }

    /// `None` for a clean field, otherwise one of three corruption variants.
    fn corruption(&self, rng: &mut StdRng) -> Option<u8> {
        if self.dirty(rng) {
            Some(rng.random_range(0..3))
        } else {
            None
        }
    }

    /// All columns as text, the way the export stores them.
    pub fn raw_batch(&self) -> Result<RecordBatch> {
        let transactions = self.transactions();
        let text = |field: fn(&RawTransaction) -> Option<&str>| -> ArrayRef {
            Arc::new(transactions.iter().map(field).collect::<StringArray>())
        };

        let schema = Arc::new(Schema::new(vec![
            Field::new(TRANSACTION_ID, DataType::Utf8, true),
            Field::new("Item", DataType::Utf8, true),
            Field::new(QUANTITY, DataType::Utf8, true),
            Field::new(TOTAL_SPENT, DataType::Utf8, true),
            Field::new(PAYMENT_METHOD, DataType::Utf8, true),
            Field::new(TRANSACTION_DATE, DataType::Utf8, true),
        ]));

        Ok(RecordBatch::try_new(
            schema,
            vec![
                text(|t| t.transaction_id.as_deref()),
                text(|t| t.item.as_deref()),
                text(|t| t.quantity.as_deref()),
                text(|t| t.total_spent.as_deref()),
                text(|t| t.payment_method.as_deref()),
                text(|t| t.transaction_date.as_deref()),
            ],
        )?)
    }

    /// The dataset as a CSV source would load it with `Quantity` and
    /// `Total Spent` coerced to numbers.
    pub fn dataset(&self) -> Result<Dataset> {
        let raw = self.raw_batch()?;
        let coerce = |name: &str| -> Result<ArrayRef> {
            let column = raw
                .column_by_name(name)
                .and_then(|array| array.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| crate::error::DqError::unknown_column(name, [name]))?;
            let values: Float64Array = column
                .iter()
                .map(|value| value.and_then(|v| v.parse::<f64>().ok()))
                .collect();
            Ok(Arc::new(values))
        };

        let mut columns = Vec::with_capacity(raw.num_columns());
        for (field, array) in raw.schema().fields().iter().zip(raw.columns()) {
            let array = if field.name() == QUANTITY || field.name() == TOTAL_SPENT {
                coerce(field.name())?
            } else {
                Arc::clone(array)
            };
            columns.push((field.name().clone(), array));
        }
        Dataset::from_columns(columns)
    }

    /// Writes the raw export as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let batch = self.raw_batch()?;
        let file = File::create(path)?;
        let mut writer = arrow::csv::WriterBuilder::new()
            .with_header(true)
            .build(file);
        writer.write(&batch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rows() {
        let a = CafeFixture::new(50).with_seed(7).transactions();
        let b = CafeFixture::new(50).with_seed(7).transactions();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clean_fixture_has_no_markers() {
        let rows = CafeFixture::new(100).with_dirty_ratio(0.0).transactions();
        assert!(rows.iter().all(|t| t.quantity.is_some()
            && t.payment_method.is_some()
            && t.transaction_date.is_some()));
        assert!(rows
            .iter()
            .all(|t| t.quantity.as_deref() != Some("ERROR")));
    }

    #[test]
    fn test_dataset_coerces_numeric_columns() {
        let dataset = CafeFixture::new(200).with_dirty_ratio(0.3).dataset().unwrap();
        assert_eq!(dataset.row_count(), 200);
        let quantity = dataset.column(QUANTITY).unwrap();
        assert_eq!(
            quantity.column_type(),
            crate::dataset::ColumnType::Float
        );
        assert!(quantity.null_count() > 0);
    }
}
