use crate::core::aggregation::compute_category;
use crate::core::catalog::{ReportCategory, TeamCatalog};
use crate::core::range::compute_range;
use crate::core::ranking::rank_rows;
use crate::core::roster::RosterIndex;
use crate::core::table::build_table;
use crate::domain::model::CategoryReport;
use crate::utils::error::Result;

/// Aggregate, tabulate, rank and address one category.
pub fn build_category_report(
    index: &RosterIndex,
    category: &ReportCategory,
) -> Result<CategoryReport> {
    let totals = compute_category(index, category)?;
    let mut table = build_table(category.name(), totals)?;
    rank_rows(category.name(), &mut table.rows);
    let range = compute_range(category.name(), table.column_count(), table.row_count());

    Ok(CategoryReport {
        category: category.name().to_string(),
        range,
        table,
    })
}

pub fn build_reports(index: &RosterIndex, catalog: &TeamCatalog) -> Result<Vec<CategoryReport>> {
    catalog
        .categories()
        .iter()
        .map(|category| build_category_report(index, category))
        .collect()
}
