//! # dq-guard - Rule-based data quality validation
//!
//! dq-guard evaluates a tabular dataset against a suite of declarative,
//! column-level expectations and produces per-rule pass/fail outcomes,
//! violation counts, an aggregate summary and a tiered quality badge.
//!
//! Datasets are Arrow record batches. Loading and type coercion run through
//! DataFusion; evaluation itself is a synchronous pass over the Arrow
//! arrays.
//!
//! ## Quick Start
//!
//! ```rust
//! use arrow::array::{ArrayRef, Float64Array, StringArray};
//! use dq_guard::prelude::*;
//! use dq_guard::dataset::Dataset;
//! use std::sync::Arc;
//!
//! # fn main() -> dq_guard::error::Result<()> {
//! let dataset = Dataset::from_columns(vec![
//!     (
//!         "Transaction ID",
//!         Arc::new(StringArray::from(vec![Some("TXN_1"), Some("TXN_2"), Some("TXN_2")])) as ArrayRef,
//!     ),
//!     (
//!         "Total Spent",
//!         Arc::new(Float64Array::from(vec![Some(4.0), None, Some(0.0)])) as ArrayRef,
//!     ),
//! ])?;
//!
//! let suite = ExpectationSuite::builder("transactions")
//!     .expectation(Expectation::not_null("Transaction ID"))
//!     .expectation(Expectation::unique("Transaction ID"))
//!     .expectation(Expectation::greater_than("Total Spent", 0.0)?)
//!     .build();
//!
//! let report = ValidationEngine::new().run(&dataset, &suite)?;
//! let summary = report.summary();
//!
//! assert_eq!(summary.total_checks, 3);
//! assert_eq!(summary.success_count, 1);
//! assert_eq!(summary.total_unexpected, 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Rule kinds
//!
//! | Kind | A row is unexpected when |
//! |------|--------------------------|
//! | `not_null` | the value is null |
//! | `unique` | its value occurs more than once (nulls excluded) |
//! | `between` | the value is null, not numeric or outside the bounds |
//! | `in_set` | the value is not null and not a member of the set |
//! | `matches_pattern` | the value is null or does not fully match the regex |
//!
//! ## Architecture
//!
//! - **`dataset`**: immutable snapshot and typed column access
//! - **`core`**: expectations, suites, the engine and result aggregation
//! - **`rules`**: one predicate per rule kind
//! - **`scoring`**: success count to badge tiers
//! - **`labels`** / **`interchange`**: display labels and persisted result records
//! - **`profile`**: dataset-level missing value and error figures
//! - **`sources`**: CSV loading with numeric coercion
//! - **`formatters`**: human, JSON and Markdown reports
//! - **`reference`**: the café transactions suite

pub mod core;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod interchange;
pub mod labels;
pub mod logging;
pub mod prelude;
pub mod profile;
pub mod reference;
pub mod rules;
pub mod scoring;
pub mod sources;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
