//! Per-run evaluation context.
//!
//! An [`EvaluationContext`] is the engine's view of one dataset snapshot for
//! the duration of a single `evaluate` call. All fallible preparation (column
//! lookup, type normalization, pattern compilation) happens when the context
//! is built, so a misconfigured suite fails before any rule runs and rule
//! evaluation itself only reads shared, immutable state.

use super::expectation::compile_anchored;
use super::{ExpectationKind, ExpectationSuite};
use crate::dataset::{ColumnAccessor, Dataset};
use crate::prelude::*;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug)]
pub struct EvaluationContext<'a> {
    dataset: &'a Dataset,
    columns: HashMap<&'a str, ColumnAccessor>,
    patterns: HashMap<&'a str, Regex>,
}

impl<'a> EvaluationContext<'a> {
    /// Resolves every column and pattern `suite` needs from `dataset`.
    ///
    /// Missing columns are reported before type problems so that a suite
    /// pointed at the wrong dataset fails with [`DqError::UnknownColumn`].
    pub fn prepare(dataset: &'a Dataset, suite: &'a ExpectationSuite) -> Result<Self> {
        let names = suite.columns();

        if let Some(missing) = names.iter().find(|name| !dataset.has_column(name)) {
            return Err(DqError::unknown_column(*missing, dataset.column_names()));
        }

        let mut columns = HashMap::with_capacity(names.len());
        for name in names {
            columns.insert(name, dataset.column(name)?);
        }

        let mut patterns = HashMap::new();
        for expectation in suite.expectations() {
            if let ExpectationKind::MatchesPattern { regex } = expectation.kind() {
                if !patterns.contains_key(regex.as_str()) {
                    patterns.insert(regex.as_str(), compile_anchored(regex)?);
                }
            }
        }

        Ok(Self {
            dataset,
            columns,
            patterns,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    /// Column prepared for this run.
    pub fn column(&self, name: &str) -> Result<&ColumnAccessor> {
        self.columns
            .get(name)
            .ok_or_else(|| DqError::unknown_column(name, self.dataset.column_names()))
    }

    /// Anchored regex compiled for this run.
    pub fn pattern(&self, pattern: &str) -> Result<&Regex> {
        self.patterns.get(pattern).ok_or_else(|| {
            DqError::Internal(format!("Pattern '{pattern}' was not prepared for this run"))
        })
    }
}
