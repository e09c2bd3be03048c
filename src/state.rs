use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::aggregate::{Aggregation, GroupSummary};
use crate::data::export::write_csv;
use crate::data::filter::{filtered_indices, FilterSpec, Membership};
use crate::data::loader::load_dataset;
use crate::data::model::{CategoricalField, Column, Dataset, Record, MAX_RATING};
use crate::data::summary::{top_sellers, DashboardSummaries};
use crate::error::DashboardError;

/// Upper end of the price slider unless the data goes beyond it.
pub const PRICE_SLIDER_MAX: f64 = 5000.0;
/// Bounds of the "top sellers" input.
pub const TOP_SELLERS_RANGE: std::ops::RangeInclusive<usize> = 2..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    RawData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Revenue,
    Sales,
    Sellers,
}

// ---------------------------------------------------------------------------
// Filter form – editable widget values behind the raw-data side panel
// ---------------------------------------------------------------------------

/// Raw widget values. Turned into a validated [`FilterSpec`] on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterForm {
    pub selected: BTreeMap<CategoricalField, BTreeSet<String>>,
    pub price: (f64, f64),
    /// Upper end of the price slider, fixed per dataset.
    pub price_limit: f64,
    pub freight: (f64, f64),
    pub purchase_date: (NaiveDate, NaiveDate),
    pub rating: (u8, u8),
    pub installments: (u32, u32),
}

impl FilterForm {
    /// Everything selected, every range spanning the data.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let price_hi = dataset
            .bounds(|r| r.price)
            .map_or(PRICE_SLIDER_MAX, |(_, hi)| hi.max(PRICE_SLIDER_MAX));
        let today = chrono::Local::now().date_naive();

        FilterForm {
            selected: dataset.unique_values.clone(),
            price: (0.0, price_hi),
            price_limit: price_hi,
            freight: dataset.bounds(|r| r.freight).unwrap_or((0.0, 0.0)),
            purchase_date: dataset.bounds(|r| r.purchase_date).unwrap_or((today, today)),
            rating: (0, MAX_RATING),
            installments: dataset.bounds(|r| r.installments).unwrap_or((0, 0)),
        }
    }

    pub fn to_spec(&self) -> Result<FilterSpec, DashboardError> {
        let mut spec = FilterSpec::new()
            .with_price(self.price.0, self.price.1)?
            .with_freight(self.freight.0, self.freight.1)?
            .with_purchase_date(self.purchase_date.0, self.purchase_date.1)?
            .with_rating(self.rating.0, self.rating.1)?
            .with_installments(self.installments.0, self.installments.1)?;
        for (field, values) in &self.selected {
            spec = spec.with_membership(*field, Membership::OneOf(values.clone()));
        }
        Ok(spec)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Dataset>,

    /// Dashboard views derived from `dataset`.
    pub summaries: Option<DashboardSummaries>,

    pub page: Page,
    pub tab: DashboardTab,

    /// "Top N sellers" input and the two views it drives.
    pub top_sellers: usize,
    pub seller_revenue: Option<GroupSummary>,
    pub seller_sales: Option<GroupSummary>,

    /// Raw-data filters: widget values and the last valid spec.
    pub filter_form: Option<FilterForm>,
    pub filters: FilterSpec,

    /// Indices of records passing `filters` (cached).
    pub visible_indices: Vec<usize>,

    /// Columns shown in the table and written on export, in source order.
    pub columns: Vec<Column>,

    /// File name typed next to the download button.
    pub export_name: String,

    /// Error of the last user action (filter, top-N, export).
    pub status_message: Option<String>,

    /// Confirmation of the last successful export.
    pub notice: Option<String>,

    /// Why the last reload failed; kept until a load succeeds.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let top_sellers = config
            .default_top_sellers
            .clamp(*TOP_SELLERS_RANGE.start(), *TOP_SELLERS_RANGE.end());
        Self {
            config,
            dataset: None,
            summaries: None,
            page: Page::Dashboard,
            tab: DashboardTab::Revenue,
            top_sellers,
            seller_revenue: None,
            seller_sales: None,
            filter_form: None,
            filters: FilterSpec::default(),
            visible_indices: Vec::new(),
            columns: Column::ALL.to_vec(),
            export_name: "dados".to_string(),
            status_message: None,
            notice: None,
            load_error: None,
        }
    }

    /// Fetch the dataset from the configured source (blocking).
    ///
    /// On failure the previous dataset, if any, stays in place untouched.
    pub fn reload(&mut self) {
        match load_dataset(&self.config.source, self.config.request_timeout) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} sales from {}",
                    dataset.len(),
                    self.config.source.describe()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.load_error = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, derive views and reset filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let summaries = match DashboardSummaries::compute(&dataset) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to summarise dataset: {e}");
                self.load_error = Some(format!("Error: {e}"));
                return;
            }
        };

        self.filter_form = Some(FilterForm::from_dataset(&dataset));
        self.filters = FilterSpec::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.summaries = Some(summaries);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.notice = None;
        self.load_error = None;
        self.refresh_sellers();
    }

    /// Recompute the top-seller views after `top_sellers` changed.
    pub fn refresh_sellers(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let result = top_sellers(ds, self.top_sellers, Aggregation::Sum)
            .and_then(|rev| Ok((rev, top_sellers(ds, self.top_sellers, Aggregation::Count)?)));
        match result {
            Ok((revenue, sales)) => {
                self.seller_revenue = Some(revenue);
                self.seller_sales = Some(sales);
            }
            Err(e) => {
                log::warn!("Rejected top sellers input: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn set_top_sellers(&mut self, n: usize) {
        if n != self.top_sellers {
            self.top_sellers = n;
            self.refresh_sellers();
        }
    }

    /// Rebuild the filter spec from the form and recompute `visible_indices`.
    ///
    /// An invalid form (inverted range) leaves the previous view in place.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(form)) = (&self.dataset, &self.filter_form) else {
            return;
        };
        match form.to_spec() {
            Ok(spec) => {
                self.visible_indices = filtered_indices(ds, &spec);
                self.filters = spec;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Rejected filter: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Records of the current filtered view, in dataset order.
    pub fn visible_records(&self) -> Vec<&Record> {
        match &self.dataset {
            Some(ds) => self.visible_indices.iter().map(|&i| &ds.records[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Select every value of a categorical column.
    pub fn select_all(&mut self, field: CategoricalField) {
        let (Some(ds), Some(form)) = (&self.dataset, &mut self.filter_form) else {
            return;
        };
        if let Some(all) = ds.unique_values.get(&field) {
            form.selected.insert(field, all.clone());
            self.refilter();
        }
    }

    /// Deselect every value of a categorical column (hides all rows).
    pub fn select_none(&mut self, field: CategoricalField) {
        if let Some(form) = &mut self.filter_form {
            form.selected.insert(field, BTreeSet::new());
            self.refilter();
        }
    }

    /// Show or hide a column, keeping source order.
    pub fn set_column_visible(&mut self, column: Column, visible: bool) {
        self.columns.retain(|c| *c != column);
        if visible {
            self.columns.push(column);
            self.columns.sort();
        }
    }

    /// Write the filtered, column-selected view to `path`.
    pub fn export_csv(&self, path: &Path) -> anyhow::Result<usize> {
        let records = self.visible_records();
        write_csv(path, records.iter().copied(), &self.columns)?;
        Ok(records.len())
    }

    /// Export and report the outcome in the status line.
    pub fn export_and_report(&mut self, path: &Path) {
        match self.export_csv(path) {
            Ok(rows) => {
                log::info!("Exported {rows} rows to {}", path.display());
                self.status_message = None;
                self.notice = Some(format!("Exported {rows} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                self.notice = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
