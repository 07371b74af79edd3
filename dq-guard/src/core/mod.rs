//! Core validation types for dq-guard.
//!
//! This module provides the types for declaring expectations, grouping them
//! into suites and evaluating those suites against a [`Dataset`](crate::dataset::Dataset).
//!
//! ## Overview
//!
//! - **[`Expectation`]**: a single declarative rule bound to one column
//! - **[`ExpectationSuite`]**: a named, ordered, de-duplicated list of expectations
//! - **[`SuiteRegistry`]**: suites addressed by name, created on first use
//! - **[`ValidationEngine`]**: runs a suite against a dataset snapshot
//! - **[`ValidationResult`]** / **[`ValidationReport`]**: per-rule outcomes and the run that produced them
//! - **[`Summary`]**: totals and success ratio over any set of [`Outcome`]s
//!
//! ## Architecture
//!
//! ```text
//! ExpectationSuite ──┐
//!                    ├─> ValidationEngine::evaluate ──> [ValidationResult] ──> summarize ──> Summary
//! Dataset ───────────┘          (EvaluationContext)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use arrow::array::{ArrayRef, StringArray};
//! use dq_guard::core::{Expectation, ExpectationSuite, ValidationEngine};
//! use dq_guard::dataset::Dataset;
//! use std::sync::Arc;
//!
//! # fn main() -> dq_guard::error::Result<()> {
//! let dataset = Dataset::from_columns(vec![(
//!     "Payment Method",
//!     Arc::new(StringArray::from(vec![Some("Cash"), Some("Cheque"), None])) as ArrayRef,
//! )])?;
//!
//! let suite = ExpectationSuite::builder("payments")
//!     .expectation(Expectation::in_set(
//!         "Payment Method",
//!         ["Credit Card", "Cash", "Digital Wallet"],
//!     ))
//!     .expectation(Expectation::not_null("Payment Method"))
//!     .build();
//!
//! let report = ValidationEngine::new().run(&dataset, &suite)?;
//! let summary = report.summary();
//! assert_eq!(summary.total_checks, 2);
//! assert_eq!(summary.success_count, 0);
//! assert_eq!(summary.total_unexpected, 2);
//! # Ok(())
//! # }
//! ```

mod context;
mod engine;
pub(crate) mod expectation;
mod result;
mod suite;
mod summary;

pub use context::EvaluationContext;
pub use engine::{EngineConfig, ValidationEngine};
pub use expectation::{Expectation, ExpectationIdentity, ExpectationKind, LiteralValue, RuleKind};
pub use result::{ValidationReport, ValidationResult};
pub use suite::{ExpectationSuite, ExpectationSuiteBuilder, SuiteRegistry};
pub use summary::{summarize, Outcome, Summary};
