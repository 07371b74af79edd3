use crate::dataset::ColumnAccessor;
use std::collections::HashMap;

/// Counts every row that belongs to a group of two or more equal values.
/// Nulls never form a group.
pub(super) fn count_unexpected(column: &ColumnAccessor) -> u64 {
    let mut occurrences = HashMap::with_capacity(column.len() - column.null_count());
    for value in column.iter().flatten() {
        *occurrences.entry(value.key()).or_insert(0u64) += 1;
    }
    occurrences.values().filter(|&&count| count > 1).sum()
}
