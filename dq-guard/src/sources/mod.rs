//! Data sources that produce dataset snapshots.
//!
//! Loading is the only asynchronous step in dq-guard. A source reads its
//! input through DataFusion, applies any type coercion and hands back a
//! fully materialized [`Dataset`] that the synchronous engine can evaluate.

use crate::dataset::Dataset;
use crate::prelude::*;
use async_trait::async_trait;
use std::fmt::Debug;

mod csv;

pub use csv::{CsvOptions, CsvSource};

/// A source of dataset snapshots.
///
/// # Examples
///
/// ```rust,no_run
/// use dq_guard::sources::{CsvSource, DataSource};
///
/// # async fn example() -> dq_guard::error::Result<()> {
/// let source = CsvSource::new("data/dirty_cafe_sales.csv")?;
/// let dataset = source.load().await?;
/// println!("{} rows from {}", dataset.row_count(), source.description());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads the source into memory.
    async fn load(&self) -> Result<Dataset>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// Quotes an identifier for use in a DataFusion SQL statement.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
