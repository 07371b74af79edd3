use crate::core::LiteralValue;
use crate::dataset::{CellValue, ColumnAccessor};
use std::collections::HashSet;

/// A row is unexpected iff it is non-null and not one of `allowed`.
/// Nulls are left to `NotNull`.
pub(super) fn count_unexpected(column: &ColumnAccessor, allowed: &[LiteralValue]) -> u64 {
    let allowed_text: HashSet<&str> = allowed
        .iter()
        .filter_map(|value| match value {
            LiteralValue::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();

    column
        .iter()
        .flatten()
        .filter(|cell| !is_member(cell, &allowed_text, allowed))
        .count() as u64
}

fn is_member(cell: &CellValue<'_>, allowed_text: &HashSet<&str>, allowed: &[LiteralValue]) -> bool {
    match cell {
        CellValue::Text(text) => allowed_text.contains(text),
        _ => allowed.iter().any(|value| value.matches(cell)),
    }
}
