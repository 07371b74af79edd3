//! Display labels for expectation identities.
//!
//! Labels belong to the presentation side. The engine only knows
//! `(kind, column)` identities; a [`LabelTable`] turns those into the text a
//! dashboard shows and never fails on an identity it does not know.

use crate::core::{ExpectationIdentity, ExpectationSuite, RuleKind, ValidationResult};
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: HashMap<ExpectationIdentity, String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_label(
        mut self,
        kind: RuleKind,
        column: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.insert(kind, column, label);
        self
    }

    /// Registers a label, replacing any previous one for the same identity.
    pub fn insert(
        &mut self,
        kind: RuleKind,
        column: impl Into<String>,
        label: impl Into<String>,
    ) -> Option<String> {
        self.labels.insert(
            ExpectationIdentity {
                kind,
                column: column.into(),
            },
            label.into(),
        )
    }

    /// Label for `identity`, or `Unbekannte Prüfung (<kind>)` when none is registered.
    pub fn label_for(&self, identity: &ExpectationIdentity) -> Cow<'_, str> {
        match self.labels.get(identity) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(fallback_label(identity.kind)),
        }
    }

    /// Collects the labels carried by the suite's expectations.
    pub fn from_suite(suite: &ExpectationSuite) -> Self {
        let mut table = Self::new();
        for expectation in suite.expectations() {
            if let Some(label) = expectation.label() {
                table.insert(expectation.rule_kind(), expectation.column(), label);
            }
        }
        table
    }

    /// Labels of the café reference suite.
    pub fn reference() -> Self {
        crate::reference::transaction_labels()
    }

    pub fn label_for_result(&self, result: &ValidationResult) -> Cow<'_, str> {
        self.label_for(&result.identity())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn fallback_label(kind: RuleKind) -> String {
    format!("Unbekannte Prüfung ({kind})")
}
