use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::SeriesColors;
use crate::data::aggregate::{GroupLabel, GroupSummary};

const CHART_HEIGHT: f32 = 280.0;
const MIN_MARKER_RADIUS: f32 = 3.0;
const MAX_MARKER_RADIUS: f32 = 28.0;

// ---------------------------------------------------------------------------
// Geo scatter (state markers sized by value)
// ---------------------------------------------------------------------------

/// One marker per group at its coordinates, radius ∝ √value.
pub fn geo_scatter(ui: &mut Ui, id: &str, title: &str, summary: &GroupSummary) {
    ui.strong(title);

    let max = summary.max_value();
    let labels: Vec<&GroupLabel> = summary.rows.iter().map(|r| &r.label).collect();
    let colors = SeriesColors::new(labels.iter().copied());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for row in &summary.rows {
                let Some(coords) = row.coordinates else {
                    continue;
                };
                let value = row.value(summary.aggregation);
                let share = if max > 0.0 { (value / max).sqrt() as f32 } else { 0.0 };
                let radius = MIN_MARKER_RADIUS + share * (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS);

                plot_ui.points(
                    Points::new(vec![[coords.longitude, coords.latitude]])
                        .name(format!("{}: {value:.2}", row.label))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(colors.color_for(&row.label).gamma_multiply(0.7)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Monthly lines (one line per year, x = month)
// ---------------------------------------------------------------------------

/// Expects a month-keyed summary; other labels are skipped.
pub fn monthly_lines(ui: &mut Ui, id: &str, title: &str, y_label: &str, summary: &GroupSummary) {
    ui.strong(title);

    let mut by_year: BTreeMap<i32, Vec<[f64; 2]>> = BTreeMap::new();
    for (label, value) in summary.series() {
        if let GroupLabel::Month(ym) = label {
            by_year
                .entry(ym.year)
                .or_default()
                .push([ym.month as f64, value]);
        }
    }
    let colors = SeriesColors::new(by_year.keys());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .include_y(0.0)
        .x_axis_formatter(|mark: GridMark, _range| month_tick(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (year, points) in &by_year {
                let color = colors.color_for(year);
                let name = year.to_string();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .name(&name)
                        .color(color)
                        .radius(3.5)
                        .filled(true),
                );
            }
        });
}

fn month_tick(value: f64) -> String {
    if value.fract() != 0.0 || !(1.0..=12.0).contains(&value) {
        return String::new();
    }
    chrono::Month::try_from(value as u8)
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars in summary order, one per group.
pub fn bar_chart(ui: &mut Ui, id: &str, title: &str, y_label: &str, summary: &GroupSummary, color: Color32) {
    ui.strong(title);

    let labels: Vec<String> = summary.rows.iter().map(|r| r.label.to_string()).collect();
    let bars: Vec<Bar> = summary
        .series()
        .enumerate()
        .map(|(i, (label, value))| Bar::new(i as f64, value).name(label.to_string()).width(0.7))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range| tick_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// Horizontal bars, largest on top (used for the seller rankings).
pub fn horizontal_bar_chart(ui: &mut Ui, id: &str, title: &str, summary: &GroupSummary, color: Color32) {
    ui.strong(title);

    let n = summary.len();
    let labels: Vec<String> = summary
        .rows
        .iter()
        .rev()
        .map(|r| r.label.to_string())
        .collect();
    let bars: Vec<Bar> = summary
        .series()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new((n - 1 - i) as f64, value)
                .name(label.to_string())
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .include_x(0.0)
        .y_axis_formatter(move |mark: GridMark, _range| tick_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).horizontal());
        });
}

/// Category name for an integral axis position, blank elsewhere.
fn tick_label(labels: &[String], value: f64) -> String {
    if value.fract() != 0.0 || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_ticks() {
        assert_eq!(month_tick(1.0), "Jan");
        assert_eq!(month_tick(12.0), "Dec");
        assert_eq!(month_tick(0.0), "");
        assert_eq!(month_tick(2.5), "");
    }

    #[test]
    fn test_tick_labels_only_on_integral_positions() {
        let labels = vec!["SP".to_string(), "RJ".to_string()];
        assert_eq!(tick_label(&labels, 1.0), "RJ");
        assert_eq!(tick_label(&labels, 0.5), "");
        assert_eq!(tick_label(&labels, 2.0), "");
        assert_eq!(tick_label(&labels, -1.0), "");
    }
}
