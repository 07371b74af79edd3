//! Aggregation of per-rule outcomes into summary metrics.

use serde::{Deserialize, Serialize};

/// Anything that reports a pass/fail outcome with a violation count.
///
/// Implemented by live [`ValidationResult`](super::ValidationResult)s and by
/// persisted [`ResultRecord`](crate::interchange::ResultRecord)s, so the same
/// fold serves both.
pub trait Outcome {
    fn is_success(&self) -> bool;
    fn unexpected_count(&self) -> u64;
}

/// Summary statistics over a set of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of outcomes
    pub total_checks: usize,
    /// Number of successful outcomes
    pub success_count: usize,
    /// Sum of unexpected counts
    pub total_unexpected: u64,
    /// `success_count / total_checks`, 0 when there are no checks
    pub success_ratio: f64,
}

impl Summary {
    /// The summary of zero outcomes.
    pub fn empty() -> Self {
        Self {
            total_checks: 0,
            success_count: 0,
            total_unexpected: 0,
            success_ratio: 0.0,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.total_checks - self.success_count
    }

    /// Success ratio as a percentage (0.0 to 100.0).
    pub fn success_percentage(&self) -> f64 {
        self.success_ratio * 100.0
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Folds outcomes into a [`Summary`]. Input order does not matter.
///
/// `total_unexpected` saturates at `u64::MAX`; persisted records may carry
/// arbitrarily large counts.
///
/// ```rust
/// use dq_guard::core::{summarize, Outcome};
///
/// struct Check(bool, u64);
///
/// impl Outcome for Check {
///     fn is_success(&self) -> bool { self.0 }
///     fn unexpected_count(&self) -> u64 { self.1 }
/// }
///
/// let checks = [Check(true, 0), Check(false, 3)];
/// let summary = summarize(&checks);
/// assert_eq!(summary.success_count, 1);
/// assert_eq!(summary.total_unexpected, 3);
/// assert_eq!(summary.success_ratio, 0.5);
/// ```
pub fn summarize<'a, T, I>(outcomes: I) -> Summary
where
    T: Outcome + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (total_checks, success_count, total_unexpected) = outcomes.into_iter().fold(
        (0usize, 0usize, 0u64),
        |(total, passed, unexpected), outcome| {
            (
                total + 1,
                passed + usize::from(outcome.is_success()),
                unexpected.saturating_add(outcome.unexpected_count()),
            )
        },
    );

    let success_ratio = if total_checks == 0 {
        0.0
    } else {
        success_count as f64 / total_checks as f64
    };

    Summary {
        total_checks,
        success_count,
        total_unexpected,
        success_ratio,
    }
}
