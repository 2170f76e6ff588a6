//! Row lookup in tables keyed by their first column.

/// First row whose column 0 equals `id` exactly, scanning top to bottom.
///
/// No rows are skipped, so pass [`without_header`] for tables that carry one.
pub fn find_by_id<'a, S: AsRef<str>>(id: &str, table: &'a [Vec<S>]) -> Option<&'a [S]> {
    table
        .iter()
        .find(|row| row.first().is_some_and(|key| key.as_ref() == id))
        .map(Vec::as_slice)
}

/// Every row after the first
pub fn without_header<T>(table: &[T]) -> &[T] {
    table.get(1..).unwrap_or_default()
}
