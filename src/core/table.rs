use crate::core::aggregation::CategoryTotals;
use crate::domain::model::{Cell, Table};
use crate::utils::error::{ReportError, Result};

/// Lays the totals out as rows sorted by ascending owner id, each ending in
/// the truncated average of its team totals.
///
/// The header must carry at least one team column. `ReportCategory::new`
/// guarantees that for anything coming out of `compute_category`; a header
/// without team columns is reported as `EmptyCategoryError`.
pub fn build_table(category: &str, totals: CategoryTotals) -> Result<Table> {
    let team_count = totals.team_count();
    if team_count == 0 {
        return Err(ReportError::EmptyCategoryError {
            category: category.to_string(),
        });
    }

    let mut owners: Vec<(String, Vec<u64>)> = totals.totals.into_iter().collect();
    owners.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut rows = Vec::with_capacity(owners.len());
    for (owner, team_totals) in owners {
        if team_totals.len() != team_count {
            return Err(ReportError::ProcessingError {
                message: format!(
                    "{} has {} team totals in {}, expected {}",
                    owner,
                    team_totals.len(),
                    category,
                    team_count
                ),
            });
        }

        let sum = team_totals
            .iter()
            .try_fold(0u64, |acc, total| acc.checked_add(*total))
            .ok_or_else(|| ReportError::ProcessingError {
                message: format!("sum of {} team totals in {} overflows", owner, category),
            })?;
        let average = sum / team_count as u64;

        let mut row = Vec::with_capacity(team_count + 2);
        row.push(Cell::Text(owner));
        row.extend(team_totals.into_iter().map(Cell::Int));
        row.push(Cell::Int(average));
        rows.push(row);
    }

    Ok(Table {
        header: totals.header,
        rows,
    })
}
