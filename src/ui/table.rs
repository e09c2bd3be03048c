use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::export::csv_file_name;
use crate::data::model::Column;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw-data page (central panel)
// ---------------------------------------------------------------------------

pub fn raw_data_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Raw data");

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    column_chooser(ui, state);

    ui.label(format!(
        "The table has {} rows and {} columns",
        state.visible_indices.len(),
        state.columns.len()
    ));

    export_controls(ui, state);
    ui.separator();

    records_table(ui, state);
}

fn column_chooser(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Columns").strong())
        .id_salt("columns")
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for column in Column::ALL {
                    let mut shown = state.columns.contains(&column);
                    if ui.checkbox(&mut shown, column.header()).changed() {
                        state.set_column_visible(column, shown);
                    }
                }
            });
        });
}

fn export_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("File name:");
        ui.text_edit_singleline(&mut state.export_name);
        if ui.button("Download CSV").clicked() {
            save_csv_dialog(state);
        }
    });
}

/// Ask for a destination and write the filtered view there.
pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save table as CSV")
        .set_file_name(csv_file_name(&state.export_name))
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    state.export_and_report(&path);
}

fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let columns = &state.columns;
    if columns.is_empty() {
        ui.label("No columns selected.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(TableColumn::auto().at_least(60.0), columns.len())
            .header(22.0, |mut header| {
                for column in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.header());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                    let record = &ds.records[state.visible_indices[row.index()]];
                    for column in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(column.cell(record));
                        });
                    }
                });
            });
    });
}
