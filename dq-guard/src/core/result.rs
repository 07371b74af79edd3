//! Validation result types.

use super::summary::{summarize, Outcome, Summary};
use super::{Expectation, ExpectationIdentity, RuleKind};
use crate::scoring::{Badge, ScoreClassifier};
use serde::Serialize;

/// The outcome of evaluating one expectation against a dataset snapshot.
///
/// `success` holds exactly when `unexpected_count` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    kind: RuleKind,
    column: String,
    success: bool,
    unexpected_count: u64,
    element_count: u64,
}

impl ValidationResult {
    pub(crate) fn new(expectation: &Expectation, unexpected_count: u64, element_count: u64) -> Self {
        Self {
            kind: expectation.rule_kind(),
            column: expectation.column().to_string(),
            success: unexpected_count == 0,
            unexpected_count,
            element_count,
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn identity(&self) -> ExpectationIdentity {
        ExpectationIdentity {
            kind: self.kind,
            column: self.column.clone(),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Number of rows violating the expectation.
    pub fn unexpected_count(&self) -> u64 {
        self.unexpected_count
    }

    /// Number of rows the expectation was evaluated on.
    pub fn element_count(&self) -> u64 {
        self.element_count
    }

    /// Share of rows violating the expectation, in percent.
    pub fn unexpected_percent(&self) -> f64 {
        if self.element_count == 0 {
            0.0
        } else {
            self.unexpected_count as f64 / self.element_count as f64 * 100.0
        }
    }
}

impl Outcome for ValidationResult {
    fn is_success(&self) -> bool {
        self.success
    }

    fn unexpected_count(&self) -> u64 {
        self.unexpected_count
    }
}

/// A complete validation run: suite, timing and ordered results.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// The name of the suite that was run
    pub suite_name: String,
    /// Timestamp when the run finished (RFC 3339)
    pub timestamp: String,
    /// Rows in the evaluated snapshot
    pub row_count: usize,
    /// One result per expectation, in suite order
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(
        suite_name: impl Into<String>,
        row_count: usize,
        results: Vec<ValidationResult>,
    ) -> Self {
        Self {
            suite_name: suite_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            row_count,
            results,
        }
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.results)
    }

    pub fn badge(&self) -> Badge {
        ScoreClassifier::classify_summary(&self.summary())
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|result| !result.success)
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(ValidationResult::success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::BadgeTier;

    #[test]
    fn test_success_follows_count() {
        let expectation = Expectation::not_null("id");
        let passed = ValidationResult::new(&expectation, 0, 10);
        let failed = ValidationResult::new(&expectation, 4, 10);

        assert!(passed.success());
        assert!(!failed.success());
        assert_eq!(failed.unexpected_percent(), 40.0);
        assert_eq!(failed.identity().kind, RuleKind::NotNull);
    }

    #[test]
    fn test_report_summary_and_badge() {
        let results = vec![
            ValidationResult::new(&Expectation::not_null("a"), 0, 5),
            ValidationResult::new(&Expectation::unique("a"), 2, 5),
            ValidationResult::new(&Expectation::not_null("b"), 0, 5),
        ];
        let report = ValidationReport::new("s", 5, results);

        let summary = report.summary();
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.total_unexpected, 2);
        assert_eq!(report.badge().tier, BadgeTier::Bronze);
        assert_eq!(report.failures().count(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_serialized_fields() {
        let result = ValidationResult::new(&Expectation::unique("id"), 2, 5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "unique",
                "column": "id",
                "success": false,
                "unexpected_count": 2,
                "element_count": 5
            })
        );
    }
}
