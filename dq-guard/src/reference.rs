//! The reference suite for the café transactions export.
//!
//! Six checks over the `Transaction ID`, `Quantity`, `Total Spent`,
//! `Payment Method` and `Transaction Date` columns, together with the labels
//! the dashboard shows for them. Badge tiers are calibrated against this suite.

use crate::core::{Expectation, ExpectationSuite, RuleKind};
use crate::labels::LabelTable;
use crate::prelude::*;

pub const SUITE_NAME: &str = "cafe_sales_suite";

pub const TRANSACTION_ID: &str = "Transaction ID";
pub const QUANTITY: &str = "Quantity";
pub const TOTAL_SPENT: &str = "Total Spent";
pub const PAYMENT_METHOD: &str = "Payment Method";
pub const TRANSACTION_DATE: &str = "Transaction Date";

pub const PAYMENT_METHODS: [&str; 3] = ["Credit Card", "Cash", "Digital Wallet"];
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

const LABELS: [(RuleKind, &str, &str); 6] = [
    (RuleKind::NotNull, TRANSACTION_ID, "Transaktion ID nicht null"),
    (RuleKind::Unique, TRANSACTION_ID, "Transaktion ID eindeutig"),
    (RuleKind::Between, QUANTITY, "Quantity 1-10"),
    (RuleKind::Between, TOTAL_SPENT, "Total Spent > 0"),
    (RuleKind::InSet, PAYMENT_METHOD, "Zahlungsmethode gültig"),
    (RuleKind::MatchesPattern, TRANSACTION_DATE, "Datum YYYY-MM-DD"),
];

/// The six reference expectations, in reporting order, each carrying its
/// dashboard label.
pub fn transaction_expectations() -> Result<Vec<Expectation>> {
    let expectations = [
        Expectation::not_null(TRANSACTION_ID),
        Expectation::unique(TRANSACTION_ID),
        Expectation::between(QUANTITY, 1.0, Some(10.0))?,
        Expectation::greater_than(TOTAL_SPENT, 0.0)?,
        Expectation::in_set(PAYMENT_METHOD, PAYMENT_METHODS),
        Expectation::matches_pattern(TRANSACTION_DATE, DATE_PATTERN)?,
    ];
    Ok(expectations
        .into_iter()
        .zip(LABELS)
        .map(|(expectation, (_, _, label))| expectation.with_label(label))
        .collect())
}

/// Builds the reference suite.
///
/// ```rust
/// let suite = dq_guard::reference::transaction_suite().unwrap();
/// assert_eq!(suite.len(), dq_guard::scoring::REFERENCE_CHECK_COUNT);
/// ```
pub fn transaction_suite() -> Result<ExpectationSuite> {
    Ok(ExpectationSuite::builder(SUITE_NAME)
        .description("Data quality checks for the café sales transactions export")
        .expectations(transaction_expectations()?)
        .build())
}

/// Dashboard labels for the reference suite.
pub fn transaction_labels() -> LabelTable {
    LABELS
        .into_iter()
        .fold(LabelTable::new(), |table, (kind, column, label)| {
            table.with_label(kind, column, label)
        })
}
