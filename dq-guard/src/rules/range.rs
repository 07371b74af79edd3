use crate::dataset::ColumnAccessor;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Numeric bound of a `Between` expectation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: Option<f64>,
    pub strict_min: bool,
    pub strict_max: bool,
}

impl Bounds {
    /// Returns true if `value` lies inside the bound.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.strict_min {
            value > self.min
        } else {
            value >= self.min
        };
        let below_max = match self.max {
            None => true,
            Some(max) if self.strict_max => value < max,
            Some(max) => value <= max,
        };
        above_min && below_max
    }
}

/// A row is unexpected iff it is null, not numeric, or outside `bounds`.
///
/// Non-numeric values are recovered locally: they count as unexpected and are
/// reported once per column as a warning.
pub(super) fn count_unexpected(column: &ColumnAccessor, bounds: &Bounds) -> u64 {
    let mut unexpected = 0u64;
    let mut non_numeric = 0u64;

    for value in column.iter() {
        match value {
            None => unexpected += 1,
            Some(cell) => match cell.as_f64() {
                Some(number) if bounds.contains(number) => {}
                Some(_) => unexpected += 1,
                None => {
                    non_numeric += 1;
                    unexpected += 1;
                }
            },
        }
    }

    if non_numeric > 0 {
        warn!(
            expectation.column = %column.name(),
            column.type = %column.column_type(),
            rows.non_numeric = non_numeric,
            "Non-numeric values counted as unexpected by range check"
        );
    }

    unexpected
}
