use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use chrono::NaiveDate;

use super::model::{CategoricalField, Dataset, Record};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Set-membership predicate for a categorical column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Membership {
    /// No constraint on this column.
    #[default]
    Any,
    /// Value must be one of these. An empty set matches nothing.
    OneOf(BTreeSet<String>),
}

impl Membership {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Membership::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Membership::Any => true,
            Membership::OneOf(selected) => selected.contains(value),
        }
    }
}

/// Closed interval `[lo, hi]`. Construction rejects `lo > hi`, so every
/// existing range is well formed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclusiveRange<T> {
    lo: T,
    hi: T,
}

impl<T: PartialOrd + Copy + Debug> InclusiveRange<T> {
    pub fn new(lo: T, hi: T) -> Result<Self, DashboardError> {
        // `!(lo <= hi)` also catches incomparable bounds such as NaN.
        if !(lo <= hi) {
            return Err(DashboardError::invalid(format!(
                "range lower bound {lo:?} exceeds upper bound {hi:?}"
            )));
        }
        Ok(InclusiveRange { lo, hi })
    }

    pub fn lo(&self) -> T {
        self.lo
    }

    pub fn hi(&self) -> T {
        self.hi
    }

    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }
}

fn in_range<T: PartialOrd + Copy + Debug>(range: &Option<InclusiveRange<T>>, value: T) -> bool {
    range.as_ref().map_or(true, |r| r.contains(value))
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// Conjunction of per-column predicates. The default spec filters nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    /// Membership predicate per categorical column; absent means `Any`.
    pub membership: BTreeMap<CategoricalField, Membership>,
    pub price: Option<InclusiveRange<f64>>,
    pub freight: Option<InclusiveRange<f64>>,
    pub purchase_date: Option<InclusiveRange<NaiveDate>>,
    pub rating: Option<InclusiveRange<u8>>,
    pub installments: Option<InclusiveRange<u32>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_membership(mut self, field: CategoricalField, membership: Membership) -> Self {
        self.membership.insert(field, membership);
        self
    }

    pub fn with_price(mut self, lo: f64, hi: f64) -> Result<Self, DashboardError> {
        self.price = Some(InclusiveRange::new(lo, hi)?);
        Ok(self)
    }

    pub fn with_freight(mut self, lo: f64, hi: f64) -> Result<Self, DashboardError> {
        self.freight = Some(InclusiveRange::new(lo, hi)?);
        Ok(self)
    }

    pub fn with_purchase_date(mut self, lo: NaiveDate, hi: NaiveDate) -> Result<Self, DashboardError> {
        self.purchase_date = Some(InclusiveRange::new(lo, hi)?);
        Ok(self)
    }

    pub fn with_rating(mut self, lo: u8, hi: u8) -> Result<Self, DashboardError> {
        self.rating = Some(InclusiveRange::new(lo, hi)?);
        Ok(self)
    }

    pub fn with_installments(mut self, lo: u32, hi: u32) -> Result<Self, DashboardError> {
        self.installments = Some(InclusiveRange::new(lo, hi)?);
        Ok(self)
    }

    /// Whether `record` passes every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.membership
            .iter()
            .all(|(field, m)| m.matches(field.value_of(record)))
            && in_range(&self.price, record.price)
            && in_range(&self.freight, record.freight)
            && in_range(&self.purchase_date, record.purchase_date)
            && in_range(&self.rating, record.rating)
            && in_range(&self.installments, record.installments)
    }
}

// ---------------------------------------------------------------------------
// Applying filters
// ---------------------------------------------------------------------------

/// Indices of records passing `spec`, in dataset order.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Records passing `spec`, in dataset order.
pub fn filter_records<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Vec<&'a Record> {
    dataset.records.iter().filter(|r| spec.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn dataset() -> Dataset {
        let mut cheap = record("SP", 10.0);
        cheap.rating = 1;
        let mut mid = record("RJ", 100.0);
        mid.seller = "Bruno".to_string();
        mid.purchase_date = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let mut pricey = record("MG", 1000.0);
        pricey.installments = 12;
        Dataset::from_records(vec![cheap, mid, pricey])
    }

    fn prices(records: &[&Record]) -> Vec<f64> {
        records.iter().map(|r| r.price).collect()
    }

    #[test]
    fn test_default_spec_is_identity() {
        let ds = dataset();
        let out = filter_records(&ds, &FilterSpec::default());
        assert_eq!(out.len(), ds.len());
        assert!(out.iter().zip(&ds.records).all(|(a, b)| *a == b));
        assert_eq!(filtered_indices(&ds, &FilterSpec::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_full_selection_is_identity() {
        let ds = dataset();
        let spec = FilterSpec::new().with_membership(
            CategoricalField::Location,
            Membership::OneOf(ds.unique_values[&CategoricalField::Location].clone()),
        );
        assert_eq!(filter_records(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn test_empty_membership_matches_nothing() {
        let ds = dataset();
        for field in CategoricalField::ALL {
            let spec = FilterSpec::new().with_membership(field, Membership::OneOf(BTreeSet::new()));
            assert!(filter_records(&ds, &spec).is_empty(), "{field:?}");
        }
    }

    #[test]
    fn test_membership_keeps_original_order() {
        let ds = dataset();
        let spec = FilterSpec::new()
            .with_membership(CategoricalField::Location, Membership::one_of(["MG", "SP"]));
        assert_eq!(prices(&filter_records(&ds, &spec)), vec![10.0, 1000.0]);
    }

    #[test]
    fn test_ranges_are_inclusive_on_both_bounds() {
        let ds = dataset();
        let spec = FilterSpec::new().with_price(10.0, 100.0).unwrap();
        assert_eq!(prices(&filter_records(&ds, &spec)), vec![10.0, 100.0]);

        let spec = FilterSpec::new().with_rating(1, 1).unwrap();
        assert_eq!(prices(&filter_records(&ds, &spec)), vec![10.0]);
    }

    #[test]
    fn test_date_range() {
        let ds = dataset();
        let day = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let spec = FilterSpec::new().with_purchase_date(day, day).unwrap();
        assert_eq!(prices(&filter_records(&ds, &spec)), vec![100.0]);
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let ds = dataset();
        let spec = FilterSpec::new()
            .with_installments(1, 12)
            .unwrap()
            .with_price(50.0, 5000.0)
            .unwrap()
            .with_membership(CategoricalField::Seller, Membership::one_of(["Ana"]));
        assert_eq!(prices(&filter_records(&ds, &spec)), vec![1000.0]);
    }

    #[test]
    fn test_inverted_range_is_invalid_argument() {
        assert!(matches!(
            FilterSpec::new().with_price(10.0, 5.0),
            Err(DashboardError::InvalidArgument(_))
        ));
        assert!(matches!(
            InclusiveRange::new(f64::NAN, 5.0),
            Err(DashboardError::InvalidArgument(_))
        ));
        assert!(InclusiveRange::new(3u8, 3u8).is_ok());
    }
}
