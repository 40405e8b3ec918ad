use crate::core::catalog::ReportCategory;
use crate::core::roster::RosterIndex;
use crate::utils::error::{ReportError, Result};
use std::collections::HashMap;

pub const OWNER_COLUMN: &str = "Owner";
pub const AVERAGE_COLUMN: &str = "Average";

/// Per-team power sums for one category, before they become a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    pub header: Vec<String>,
    /// Owner id -> one total per team, in category team order.
    pub totals: HashMap<String, Vec<u64>>,
}

impl CategoryTotals {
    pub fn team_count(&self) -> usize {
        self.header.len().saturating_sub(2)
    }
}

/// Sums, for every owner in `index` and every team in `category`, the power
/// of the owner's records whose lower-cased id equals one of the team's
/// members. Owners without a single match still get a zero for each team.
///
/// Each occurrence of a member id counts: a record listed in two teams
/// counts towards both, and a member listed twice in one team counts twice.
///
/// A team total that does not fit in a `u64` is a `ProcessingError`.
pub fn compute_category(
    index: &RosterIndex,
    category: &ReportCategory,
) -> Result<CategoryTotals> {
    let mut header = Vec::with_capacity(category.teams().len() + 2);
    header.push(OWNER_COLUMN.to_string());
    header.extend(category.teams().iter().map(|t| t.label().to_string()));
    header.push(AVERAGE_COLUMN.to_string());

    let mut totals = HashMap::with_capacity(index.owner_count());
    for (owner, records) in index.iter() {
        let lowered: Vec<(String, u64)> = records
            .iter()
            .map(|r| (r.item_id.to_lowercase(), r.power))
            .collect();

        let team_totals = category
            .teams()
            .iter()
            .map(|team| {
                team.members()
                    .iter()
                    .flat_map(|member| {
                        lowered
                            .iter()
                            .filter(move |(item_id, _)| item_id == member)
                            .map(|(_, power)| *power)
                    })
                    .try_fold(0u64, u64::checked_add)
                    .ok_or_else(|| ReportError::ProcessingError {
                        message: format!(
                            "power total of {} on team {} in {} overflows",
                            owner,
                            team.label(),
                            category.name()
                        ),
                    })
            })
            .collect::<Result<Vec<u64>>>()?;

        totals.insert(owner.to_string(), team_totals);
    }

    tracing::debug!(
        "Aggregated {} owners across {} teams for {}",
        totals.len(),
        category.teams().len(),
        category.name()
    );

    Ok(CategoryTotals { header, totals })
}
