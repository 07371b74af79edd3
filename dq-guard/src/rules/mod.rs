//! Row predicates for each rule kind.
//!
//! Every rule is a pure function from a column to the number of rows that
//! violate it. Only [`uniqueness`] needs a full-column pass; the others look at
//! one row at a time.

mod membership;
mod not_null;
mod pattern;
mod range;
mod uniqueness;

pub use range::Bounds;

use crate::core::{EvaluationContext, Expectation, ExpectationKind};
use crate::prelude::*;

/// Counts the rows of the expectation's column that violate it.
pub(crate) fn count_unexpected(
    expectation: &Expectation,
    ctx: &EvaluationContext<'_>,
) -> Result<u64> {
    let column = ctx.column(expectation.column())?;
    let count = match expectation.kind() {
        ExpectationKind::NotNull => not_null::count_unexpected(column),
        ExpectationKind::Unique => uniqueness::count_unexpected(column),
        ExpectationKind::Between {
            min,
            max,
            strict_min,
            strict_max,
        } => {
            let bounds = Bounds {
                min: *min,
                max: *max,
                strict_min: *strict_min,
                strict_max: *strict_max,
            };
            range::count_unexpected(column, &bounds)
        }
        ExpectationKind::InSet { allowed_values } => {
            membership::count_unexpected(column, allowed_values)
        }
        ExpectationKind::MatchesPattern { regex } => {
            pattern::count_unexpected(column, ctx.pattern(regex)?)
        }
    };
    Ok(count)
}
