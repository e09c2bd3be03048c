use eframe::egui::{self, Color32, ScrollArea, Ui};

use super::panels::headline;
use super::plot::{bar_chart, geo_scatter, horizontal_bar_chart, monthly_lines};
use crate::data::summary::MetricViews;
use crate::state::{AppState, DashboardTab, TOP_SELLERS_RANGE};

const REVENUE_COLOR: Color32 = Color32::from_rgb(66, 133, 244);
const SALES_COLOR: Color32 = Color32::from_rgb(52, 168, 83);

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

pub fn dashboard_page(ui: &mut Ui, state: &mut AppState) {
    if state.summaries.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No sales data loaded  (⟳ Reload to retry)");
        });
        return;
    }

    ui.heading("Sales dashboard");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, DashboardTab::Revenue, "Revenue");
        ui.selectable_value(&mut state.tab, DashboardTab::Sales, "Number of sales");
        ui.selectable_value(&mut state.tab, DashboardTab::Sellers, "Sellers");
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            headline(ui, state);
            ui.separator();
            match state.tab {
                DashboardTab::Revenue => {
                    if let Some(s) = &state.summaries {
                        metric_tab(ui, "revenue", &s.revenue, "Revenue", REVENUE_COLOR);
                    }
                }
                DashboardTab::Sales => {
                    if let Some(s) = &state.summaries {
                        metric_tab(ui, "sales", &s.sales, "Sales", SALES_COLOR);
                    }
                }
                DashboardTab::Sellers => sellers_tab(ui, state),
            }
        });
}

/// Map + top states on the left, monthly trend + categories on the right.
fn metric_tab(ui: &mut Ui, id: &str, views: &MetricViews, noun: &str, color: Color32) {
    ui.columns(2, |cols| {
        geo_scatter(
            &mut cols[0],
            &format!("{id}_map"),
            &format!("{noun} by state"),
            &views.by_state,
        );
        cols[0].add_space(12.0);
        bar_chart(
            &mut cols[0],
            &format!("{id}_top_states"),
            &format!("Top states ({})", noun.to_lowercase()),
            noun,
            &views.top_states(),
            color,
        );

        monthly_lines(
            &mut cols[1],
            &format!("{id}_monthly"),
            &format!("Monthly {}", noun.to_lowercase()),
            noun,
            &views.by_month,
        );
        cols[1].add_space(12.0);
        bar_chart(
            &mut cols[1],
            &format!("{id}_categories"),
            &format!("{noun} by category"),
            noun,
            &views.by_category,
            color,
        );
    });
}

fn sellers_tab(ui: &mut Ui, state: &mut AppState) {
    let mut n = state.top_sellers;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Number of sellers:");
        ui.add(egui::DragValue::new(&mut n).range(TOP_SELLERS_RANGE));
    });
    state.set_top_sellers(n);

    ui.columns(2, |cols| {
        if let Some(revenue) = &state.seller_revenue {
            horizontal_bar_chart(
                &mut cols[0],
                "sellers_revenue",
                &format!("Top {} sellers (revenue)", state.top_sellers),
                revenue,
                REVENUE_COLOR,
            );
        }
        if let Some(sales) = &state.seller_sales {
            horizontal_bar_chart(
                &mut cols[1],
                "sellers_sales",
                &format!("Top {} sellers (number of sales)", state.top_sellers),
                sales,
                SALES_COLOR,
            );
        }
    });
}
