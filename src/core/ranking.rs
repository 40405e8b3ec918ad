use crate::domain::model::Cell;
use std::cmp::Ordering;

fn trailing_value(row: &[Cell]) -> Option<u64> {
    row.last().and_then(Cell::as_integer)
}

/// Orders rows strongest average first.
///
/// A row whose trailing cell is not an integer ranks below every row that
/// has one. Two such rows compare equal, so they keep their relative order.
pub fn compare_by_average(a: &[Cell], b: &[Cell]) -> Ordering {
    match (trailing_value(a), trailing_value(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable descending sort on the trailing average column. Ties keep the
/// incoming (owner-sorted) order.
pub fn rank_rows(category: &str, rows: &mut [Vec<Cell>]) {
    let invalid = rows
        .iter()
        .filter(|row| trailing_value(row).is_none())
        .count();
    if invalid > 0 {
        tracing::warn!(
            "⚠️ {} row(s) in {} have a non-integer average and rank last",
            invalid,
            category
        );
    }

    rows.sort_by(|a, b| compare_by_average(a, b));
}
