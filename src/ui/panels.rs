use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::SummaryMetrics;
use crate::data::model::Dimension;
use crate::format;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one multi-select per dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    // Shared handle so the domain can be read while the state is mutated.
    let dataset = Arc::clone(&state.dataset);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let Some(all_values) = dataset.values(dim) else {
                    continue;
                };

                // Show count of selected / total in the header
                let n_selected = all_values
                    .iter()
                    .filter(|v| state.selection.is_selected(dim, v))
                    .count();
                let n_total = all_values.len();
                let header_text = format!("{dim}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(dim, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(dim, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar: dataset info and a filter reset.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("📊 Data Salary Dashboard");
        ui.separator();

        ui.label(format!(
            "{}: {} records loaded, {} visible",
            state.source_path.display(),
            format::count(state.dataset.len()),
            format::count(state.visible_indices.len())
        ));

        ui.separator();

        let unfiltered = state.selection.is_unfiltered(&state.dataset.domain);
        if ui
            .add_enabled(!unfiltered, egui::Button::new("Reset filters"))
            .clicked()
        {
            state.reset_filters();
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// The five headline numbers, side by side.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.columns(5, |cols| {
        metric_card(&mut cols[0], "Highest salary", &format::usd(metrics.max_salary));
        metric_card(&mut cols[1], "Mean salary", &format::usd(metrics.mean_salary));
        metric_card(&mut cols[2], "Lowest salary", &format::usd(metrics.min_salary));
        metric_card(&mut cols[3], "Records", &format::count(metrics.count));
        metric_card(&mut cols[4], "Most frequent title", &metrics.top_job_title);
    });
}

fn metric_card(ui: &mut Ui, title: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

// ---------------------------------------------------------------------------
// Chart captions
// ---------------------------------------------------------------------------

/// A short takeaway printed under a chart.
pub fn insight(ui: &mut Ui, text: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong("Insight:");
        ui.label(RichText::new(text).weak());
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Empty-result notice
// ---------------------------------------------------------------------------

/// Explicit "no results" message shown in place of a metric row or chart.
pub fn no_data(ui: &mut Ui, message: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(format!("ℹ {message}")).color(Color32::from_rgb(0x3b, 0x82, 0xc4)));
    });
}
