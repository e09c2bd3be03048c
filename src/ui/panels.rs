use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::CategoricalField;
use crate::format::format_magnitude;
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the page selector, reload button and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.selectable_value(&mut state.page, Page::Dashboard, "Dashboard");
        ui.selectable_value(&mut state.page, Page::RawData, "Raw data");

        ui.separator();

        if ui.button("⟳ Reload").clicked() {
            state.reload();
        }

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} sales from {}", ds.len(), state.config.source.describe()));
        }

        for msg in [&state.load_error, &state.status_message].into_iter().flatten() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        if let Some(msg) = &state.notice {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
        }
    });
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Label over a large value, the egui stand-in for a "metric" card.
pub fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.heading(value);
    });
}

/// Total revenue and number of sales side by side.
pub fn headline(ui: &mut Ui, state: &AppState) {
    let Some(summaries) = &state.summaries else {
        return;
    };
    ui.columns(2, |cols| {
        metric(&mut cols[0], "Revenue", &format_magnitude(summaries.total_revenue, "R$"));
        metric(&mut cols[1], "Number of sales", &format_magnitude(summaries.total_sales as f64, ""));
    });
}

// ---------------------------------------------------------------------------
// Left side panel – raw-data filters
// ---------------------------------------------------------------------------

/// Render the filter widgets of the raw-data page.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(ds) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(form) = state.filter_form.as_mut() else {
        return;
    };
    let (freight_min, freight_max) = ds.bounds(|r| r.freight).unwrap_or((0.0, 0.0));
    let (parcels_min, parcels_max) = ds.bounds(|r| r.installments).unwrap_or((0, 0));

    let mut changed = false;
    // All/None clicks need `&mut AppState`; applied once the borrows end.
    let mut bulk: Option<(CategoricalField, bool)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Membership filters (collapsible) ----
            for field in CategoricalField::ALL {
                let Some(all_values) = ds.unique_values.get(&field) else {
                    continue;
                };
                let selected = form.selected.entry(field).or_default();
                let header_text =
                    format!("{}  ({}/{})", field.label(), selected.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                bulk = Some((field, true));
                            }
                            if ui.small_button("None").clicked() {
                                bulk = Some((field, false));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                                changed = true;
                            }
                        }
                    });
            }

            // ---- Range filters ----
            let price_limit = form.price_limit;
            egui::CollapsingHeader::new(RichText::new("Price").strong())
                .id_salt("price")
                .show(ui, |ui: &mut Ui| {
                    changed |= ui
                        .add(egui::Slider::new(&mut form.price.0, 0.0..=price_limit).text("from"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut form.price.1, 0.0..=price_limit).text("to"))
                        .changed();
                });

            egui::CollapsingHeader::new(RichText::new("Purchase date").strong())
                .id_salt("purchase_date")
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("from");
                        changed |= ui
                            .add(DatePickerButton::new(&mut form.purchase_date.0).id_salt("date_from"))
                            .changed();
                    });
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("to");
                        changed |= ui
                            .add(DatePickerButton::new(&mut form.purchase_date.1).id_salt("date_to"))
                            .changed();
                    });
                });

            egui::CollapsingHeader::new(RichText::new("Freight").strong())
                .id_salt("freight")
                .show(ui, |ui: &mut Ui| {
                    changed |= ui
                        .add(egui::Slider::new(&mut form.freight.0, freight_min..=freight_max).text("from"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut form.freight.1, freight_min..=freight_max).text("to"))
                        .changed();
                });

            egui::CollapsingHeader::new(RichText::new("Rating").strong())
                .id_salt("rating")
                .show(ui, |ui: &mut Ui| {
                    let max = crate::data::model::MAX_RATING;
                    changed |= ui
                        .add(egui::Slider::new(&mut form.rating.0, 0..=max).text("from"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut form.rating.1, 0..=max).text("to"))
                        .changed();
                });

            egui::CollapsingHeader::new(RichText::new("Installments").strong())
                .id_salt("installments")
                .show(ui, |ui: &mut Ui| {
                    changed |= ui
                        .add(egui::Slider::new(&mut form.installments.0, parcels_min..=parcels_max).text("from"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut form.installments.1, parcels_min..=parcels_max).text("to"))
                        .changed();
                });
        });

    match bulk {
        Some((field, true)) => state.select_all(field),
        Some((field, false)) => state.select_none(field),
        None if changed => state.refilter(),
        None => {}
    }
}
