use std::collections::HashMap;
use std::fmt;

use super::model::{Record, YearMonth};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Query description
// ---------------------------------------------------------------------------

/// Dimension records are bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Purchase location (state).
    State,
    /// Calendar month of the purchase date.
    Month,
    Category,
    Seller,
    Product,
    PaymentType,
}

impl GroupKey {
    fn label_of(&self, record: &Record) -> GroupLabel {
        match self {
            GroupKey::State => GroupLabel::Text(record.location.clone()),
            GroupKey::Month => GroupLabel::Month(YearMonth::of(record.purchase_date)),
            GroupKey::Category => GroupLabel::Text(record.category.clone()),
            GroupKey::Seller => GroupLabel::Text(record.seller.clone()),
            GroupKey::Product => GroupLabel::Text(record.product.clone()),
            GroupKey::PaymentType => GroupLabel::Text(record.payment_type.clone()),
        }
    }
}

/// Numeric field that gets summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricField {
    #[default]
    Price,
    Freight,
}

impl MetricField {
    fn value_of(&self, record: &Record) -> f64 {
        match self {
            MetricField::Price => record.price,
            MetricField::Freight => record.freight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    MetricDescending,
    MetricAscending,
    /// By group key; chronological for months.
    Key,
}

/// Everything `group_and_summarize` needs besides the records.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupQuery {
    pub key: GroupKey,
    pub metric: MetricField,
    pub aggregation: Aggregation,
    /// Carry latitude/longitude of the first record seen per group.
    pub with_coordinates: bool,
    pub order: SortOrder,
    pub top_n: Option<usize>,
}

impl GroupQuery {
    pub fn new(key: GroupKey, aggregation: Aggregation) -> Self {
        GroupQuery {
            key,
            metric: MetricField::default(),
            aggregation,
            with_coordinates: false,
            order: SortOrder::default(),
            top_n: None,
        }
    }

    pub fn metric(mut self, metric: MetricField) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_coordinates(mut self) -> Self {
        self.with_coordinates = true;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn top(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupLabel {
    Text(String),
    Month(YearMonth),
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Text(s) => write!(f, "{s}"),
            GroupLabel::Month(ym) => write!(f, "{ym}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub label: GroupLabel,
    pub sum: f64,
    pub count: usize,
    pub coordinates: Option<Coordinates>,
}

impl GroupRow {
    pub fn value(&self, aggregation: Aggregation) -> f64 {
        match aggregation {
            Aggregation::Sum => self.sum,
            Aggregation::Count => self.count as f64,
        }
    }
}

/// Grouped, ordered and possibly truncated aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub aggregation: Aggregation,
    pub rows: Vec<GroupRow>,
}

impl GroupSummary {
    /// `(label, value)` pairs for the requested aggregation.
    pub fn series(&self) -> impl Iterator<Item = (&GroupLabel, f64)> + '_ {
        self.rows.iter().map(|r| (&r.label, r.value(self.aggregation)))
    }

    pub fn max_value(&self) -> f64 {
        self.series().map(|(_, v)| v).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group `records` by `query.key`, aggregate, order and truncate.
///
/// Groups are first collected in first-seen order; ordering by metric is a
/// stable sort, so equal values keep that order. When coordinates are
/// requested, the first record of each group supplies them.
pub fn group_and_summarize(
    records: &[Record],
    query: &GroupQuery,
) -> Result<GroupSummary, DashboardError> {
    if query.top_n == Some(0) {
        return Err(DashboardError::invalid("top_n must be at least 1"));
    }

    let mut index: HashMap<GroupLabel, usize> = HashMap::new();
    let mut rows: Vec<GroupRow> = Vec::new();

    for record in records {
        let label = query.key.label_of(record);
        let slot = *index.entry(label).or_insert_with_key(|label| {
            rows.push(GroupRow {
                label: label.clone(),
                sum: 0.0,
                count: 0,
                coordinates: query.with_coordinates.then(|| Coordinates {
                    latitude: record.latitude,
                    longitude: record.longitude,
                }),
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.sum += query.metric.value_of(record);
        row.count += 1;
    }

    let agg = query.aggregation;
    match query.order {
        SortOrder::MetricDescending => rows.sort_by(|a, b| b.value(agg).total_cmp(&a.value(agg))),
        SortOrder::MetricAscending => rows.sort_by(|a, b| a.value(agg).total_cmp(&b.value(agg))),
        SortOrder::Key => rows.sort_by(|a, b| a.label.cmp(&b.label)),
    }

    if let Some(n) = query.top_n {
        rows.truncate(n);
    }

    Ok(GroupSummary {
        aggregation: agg,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use chrono::NaiveDate;

    fn text(s: &str) -> GroupLabel {
        GroupLabel::Text(s.to_string())
    }

    fn states() -> Vec<Record> {
        vec![record("SP", 100.0), record("SP", 50.0), record("RJ", 200.0)]
    }

    #[test]
    fn test_revenue_by_state_sorted_descending() {
        let summary =
            group_and_summarize(&states(), &GroupQuery::new(GroupKey::State, Aggregation::Sum)).unwrap();
        let series: Vec<_> = summary.series().map(|(l, v)| (l.clone(), v)).collect();
        assert_eq!(series, vec![(text("RJ"), 200.0), (text("SP"), 150.0)]);
    }

    #[test]
    fn test_sum_is_conserved() {
        let records: Vec<Record> = (0..40)
            .map(|i| record(["SP", "RJ", "MG", "BA"][i % 4], (i * 7 % 13) as f64))
            .collect();
        let total: f64 = records.iter().map(|r| r.price).sum();
        let summary =
            group_and_summarize(&records, &GroupQuery::new(GroupKey::State, Aggregation::Sum)).unwrap();
        let grouped: f64 = summary.series().map(|(_, v)| v).sum();
        assert!((grouped - total).abs() < 1e-9);
    }

    #[test]
    fn test_counts_add_up_to_dataset_length() {
        let records: Vec<Record> = (0..25).map(|i| record(["SP", "RJ", "MG"][i % 3], 1.0)).collect();
        let summary =
            group_and_summarize(&records, &GroupQuery::new(GroupKey::State, Aggregation::Count)).unwrap();
        let counted: usize = summary.rows.iter().map(|r| r.count).sum();
        assert_eq!(counted, records.len());
        assert_eq!(summary.series().next().map(|(_, v)| v), Some(9.0));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            record("BA", 10.0),
            record("PE", 30.0),
            record("AM", 10.0),
            record("CE", 10.0),
        ];
        let summary =
            group_and_summarize(&records, &GroupQuery::new(GroupKey::State, Aggregation::Sum)).unwrap();
        let labels: Vec<String> = summary.rows.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["PE", "BA", "AM", "CE"]);

        let summary = group_and_summarize(
            &records,
            &GroupQuery::new(GroupKey::State, Aggregation::Sum).order(SortOrder::MetricAscending),
        )
        .unwrap();
        let labels: Vec<String> = summary.rows.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["BA", "AM", "CE", "PE"]);
    }

    #[test]
    fn test_top_n_truncates_to_min_of_n_and_groups() {
        let query = GroupQuery::new(GroupKey::State, Aggregation::Sum);
        assert_eq!(group_and_summarize(&states(), &query.clone().top(1)).unwrap().len(), 1);
        assert_eq!(group_and_summarize(&states(), &query.clone().top(10)).unwrap().len(), 2);
        assert_eq!(group_and_summarize(&states(), &query).unwrap().len(), 2);
    }

    #[test]
    fn test_top_zero_is_invalid_argument() {
        let query = GroupQuery::new(GroupKey::Seller, Aggregation::Count).top(0);
        assert!(matches!(
            group_and_summarize(&states(), &query),
            Err(DashboardError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_coordinates_come_from_first_record_of_group() {
        let mut first = record("SP", 1.0);
        first.latitude = -1.0;
        first.longitude = -2.0;
        let mut second = record("SP", 500.0);
        second.latitude = -9.0;
        second.longitude = -9.0;
        let summary = group_and_summarize(
            &[first, second],
            &GroupQuery::new(GroupKey::State, Aggregation::Sum).with_coordinates(),
        )
        .unwrap();
        assert_eq!(
            summary.rows[0].coordinates,
            Some(Coordinates {
                latitude: -1.0,
                longitude: -2.0
            })
        );

        let without =
            group_and_summarize(&states(), &GroupQuery::new(GroupKey::State, Aggregation::Sum)).unwrap();
        assert!(without.rows.iter().all(|r| r.coordinates.is_none()));
    }

    #[test]
    fn test_month_groups_in_chronological_key_order() {
        let dates = [(2022, 3, 2), (2021, 12, 30), (2022, 3, 20), (2022, 1, 1)];
        let records: Vec<Record> = dates
            .iter()
            .map(|&(y, m, d)| {
                let mut r = record("SP", 10.0);
                r.purchase_date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                r
            })
            .collect();
        let summary = group_and_summarize(
            &records,
            &GroupQuery::new(GroupKey::Month, Aggregation::Sum).order(SortOrder::Key),
        )
        .unwrap();
        let labels: Vec<String> = summary.rows.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["2021-12", "2022-01", "2022-03"]);
        assert_eq!(summary.rows[2].sum, 20.0);
    }

    #[test]
    fn test_freight_metric_and_empty_input() {
        let summary = group_and_summarize(
            &states(),
            &GroupQuery::new(GroupKey::Category, Aggregation::Sum).metric(MetricField::Freight),
        )
        .unwrap();
        assert_eq!(summary.len(), 1);
        assert!((summary.rows[0].sum - 31.5).abs() < 1e-9);

        let empty = group_and_summarize(&[], &GroupQuery::new(GroupKey::Seller, Aggregation::Sum)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.max_value(), 0.0);
    }
}
