//! Synchronous execution of expectation suites.

use super::context::EvaluationContext;
use super::result::{ValidationReport, ValidationResult};
use super::ExpectationSuite;
use crate::dataset::Dataset;
use crate::logging::LogConfig;
use crate::prelude::*;
use crate::rules;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Configuration for a [`ValidationEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Controls how much the engine logs per expectation
    pub log: LogConfig,
}

impl EngineConfig {
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

/// Executes expectation suites against dataset snapshots.
///
/// Evaluation is a pure, blocking computation: the dataset is only read,
/// expectations are evaluated independently of each other and identical
/// inputs always produce identical results.
///
/// # Examples
///
/// ```rust
/// use arrow::array::{ArrayRef, Int64Array};
/// use dq_guard::core::{Expectation, ExpectationSuite, ValidationEngine};
/// use dq_guard::dataset::Dataset;
/// use std::sync::Arc;
///
/// let dataset = Dataset::from_columns(vec![(
///     "Quantity",
///     Arc::new(Int64Array::from(vec![Some(0), Some(1), Some(5), Some(10), Some(11), None])) as ArrayRef,
/// )])
/// .unwrap();
///
/// let suite = ExpectationSuite::builder("quantities")
///     .expectation(Expectation::between("Quantity", 1.0, Some(10.0)).unwrap())
///     .build();
///
/// let results = ValidationEngine::new().evaluate(&dataset, &suite).unwrap();
/// assert!(!results[0].success());
/// assert_eq!(results[0].unexpected_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates every expectation of `suite`, returning results in suite order.
    ///
    /// All referenced columns are resolved before the first rule runs; a suite
    /// that names a column the dataset lacks fails with
    /// [`DqError::UnknownColumn`] and produces no results.
    #[instrument(skip_all, fields(
        suite.name = %suite.name(),
        suite.expectations = suite.len(),
        dataset.rows = dataset.row_count()
    ))]
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        suite: &ExpectationSuite,
    ) -> Result<Vec<ValidationResult>> {
        let ctx = EvaluationContext::prepare(dataset, suite)?;
        let element_count = ctx.row_count() as u64;
        crate::perf_debug!(
            self.config.log,
            dataset.columns = dataset.column_count(),
            "Evaluation context prepared"
        );

        let mut results = Vec::with_capacity(suite.len());
        for expectation in suite.expectations() {
            let unexpected_count = rules::count_unexpected(expectation, &ctx)?;
            let result = ValidationResult::new(expectation, unexpected_count, element_count);

            if result.success() {
                crate::log_rule!(
                    self.config.log,
                    expectation.kind = %expectation.rule_kind(),
                    expectation.column = %expectation.column(),
                    "Expectation passed"
                );
            } else {
                warn!(
                    expectation.kind = %expectation.rule_kind(),
                    expectation.column = %expectation.column(),
                    result.unexpected_count = unexpected_count,
                    result.element_count = element_count,
                    "Expectation failed"
                );
            }
            results.push(result);
        }

        debug!(results = results.len(), "Suite evaluated");
        Ok(results)
    }

    /// Evaluates `suite` and wraps the results in a [`ValidationReport`].
    pub fn run(&self, dataset: &Dataset, suite: &ExpectationSuite) -> Result<ValidationReport> {
        info!(
            suite.name = %suite.name(),
            suite.expectations = suite.len(),
            suite.description = ?suite.description(),
            dataset.rows = dataset.row_count(),
            "Starting validation suite"
        );
        let start_time = Instant::now();

        let results = self.evaluate(dataset, suite)?;
        let report = ValidationReport::new(suite.name(), dataset.row_count(), results);

        if self.config.log.log_metrics {
            let summary = report.summary();
            let badge = report.badge();
            info!(
                suite.name = %suite.name(),
                metrics.passed = summary.success_count,
                metrics.failed = summary.failed_count(),
                metrics.total = summary.total_checks,
                metrics.unexpected = summary.total_unexpected,
                metrics.success_rate = %format!("{:.2}%", summary.success_percentage()),
                metrics.duration_ms = start_time.elapsed().as_millis() as u64,
                badge.tier = %badge.tier,
                "Validation suite completed"
            );
        }

        Ok(report)
    }
}
