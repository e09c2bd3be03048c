use super::aggregate::{
    group_and_summarize, Aggregation, GroupKey, GroupLabel, GroupQuery, GroupRow, GroupSummary, SortOrder,
};
use super::model::{Dataset, YearMonth};
use crate::error::DashboardError;

/// States shown in the "top states" bar charts.
pub const TOP_STATES: usize = 5;

/// Revenue- and sales-count views shared by the dashboard tabs.
#[derive(Debug, Clone)]
pub struct MetricViews {
    /// All states, largest first, with map coordinates.
    pub by_state: GroupSummary,
    /// Chronological, every month between the first and last sale.
    pub by_month: GroupSummary,
    pub by_category: GroupSummary,
}

impl MetricViews {
    fn compute(dataset: &Dataset, aggregation: Aggregation) -> Result<Self, DashboardError> {
        let records = &dataset.records;
        Ok(MetricViews {
            by_state: group_and_summarize(
                records,
                &GroupQuery::new(GroupKey::State, aggregation).with_coordinates(),
            )?,
            by_month: fill_missing_months(group_and_summarize(
                records,
                &GroupQuery::new(GroupKey::Month, aggregation).order(SortOrder::Key),
            )?),
            by_category: group_and_summarize(records, &GroupQuery::new(GroupKey::Category, aggregation))?,
        })
    }

    /// First `TOP_STATES` rows of `by_state`.
    pub fn top_states(&self) -> GroupSummary {
        GroupSummary {
            aggregation: self.by_state.aggregation,
            rows: self.by_state.rows.iter().take(TOP_STATES).cloned().collect(),
        }
    }
}

/// Everything the dashboard page draws that does not depend on user input.
#[derive(Debug, Clone)]
pub struct DashboardSummaries {
    pub total_revenue: f64,
    pub total_sales: usize,
    pub revenue: MetricViews,
    pub sales: MetricViews,
}

impl DashboardSummaries {
    pub fn compute(dataset: &Dataset) -> Result<Self, DashboardError> {
        Ok(DashboardSummaries {
            total_revenue: dataset.total_revenue(),
            total_sales: dataset.len(),
            revenue: MetricViews::compute(dataset, Aggregation::Sum)?,
            sales: MetricViews::compute(dataset, Aggregation::Count)?,
        })
    }
}

/// Insert zero rows for months without sales. Rows must be in key order.
fn fill_missing_months(summary: GroupSummary) -> GroupSummary {
    let mut rows = Vec::with_capacity(summary.rows.len());
    let mut expected: Option<YearMonth> = None;

    for row in summary.rows {
        if let GroupLabel::Month(month) = row.label {
            if let Some(mut gap) = expected {
                while gap < month {
                    rows.push(GroupRow {
                        label: GroupLabel::Month(gap),
                        sum: 0.0,
                        count: 0,
                        coordinates: None,
                    });
                    gap = gap.next();
                }
            }
            expected = Some(month.next());
        }
        rows.push(row);
    }

    GroupSummary {
        aggregation: summary.aggregation,
        rows,
    }
}

/// Top `n` sellers by revenue (`Sum`) or number of sales (`Count`).
pub fn top_sellers(
    dataset: &Dataset,
    n: usize,
    aggregation: Aggregation,
) -> Result<GroupSummary, DashboardError> {
    group_and_summarize(&dataset.records, &GroupQuery::new(GroupKey::Seller, aggregation).top(n))
}
