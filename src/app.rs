use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::{AppState, Page};
use crate::ui::{dashboard, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashboardApp {
    pub state: AppState,
}

impl SalesDashboardApp {
    /// Build the app and load the session dataset before the first frame.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.reload();
        Self { state }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: page selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        match self.state.page {
            Page::Dashboard => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    dashboard::dashboard_page(ui, &mut self.state);
                });
            }
            Page::RawData => {
                // ---- Left side panel: filters ----
                egui::SidePanel::left("filter_panel")
                    .default_width(260.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        panels::side_panel(ui, &mut self.state);
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    table::raw_data_page(ui, &mut self.state);
                });
            }
        }
    }
}
