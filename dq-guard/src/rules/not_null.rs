use crate::dataset::ColumnAccessor;

/// A row is unexpected iff it is null.
pub(super) fn count_unexpected(column: &ColumnAccessor) -> u64 {
    column.null_count() as u64
}
