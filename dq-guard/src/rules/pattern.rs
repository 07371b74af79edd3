use crate::dataset::ColumnAccessor;
use regex::Regex;

/// A row is unexpected iff it is null or does not match `pattern`.
/// `pattern` is expected to be anchored already.
pub(super) fn count_unexpected(column: &ColumnAccessor, pattern: &Regex) -> u64 {
    column
        .iter()
        .filter(|value| match value {
            None => true,
            Some(cell) => !pattern.is_match(&cell.render()),
        })
        .count() as u64
}
