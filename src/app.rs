use eframe::egui::{self, ScrollArea, Ui};

use crate::data::aggregate::Overview;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

const TOP_JOBS_INSIGHT: &str = "The best-paid positions in the data market, a guide to high-value roles when planning a career.";
const HISTOGRAM_INSIGHT: &str = "Where most salaries concentrate, and how far the outliers reach above them.";
const REMOTE_INSIGHT: &str = "How the sector splits between remote and on-site work.";
const TOP_COUNTRIES_INSIGHT: &str = "Countries of residence with the highest pay on average.";
const MAP_INSIGHT: &str = "Global pay gaps for this role, and where it is valued most.";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Industry Salary Analysis");
    ui.label("Use the filters on the left to explore salaries by year, seniority, contract type and company size.");
    ui.separator();

    ui.heading("Market overview");
    // Cloned so the table below can borrow the state mutably.
    let Some(overview) = state.view.as_ready().cloned() else {
        panels::no_data(
            ui,
            "No records match the selected filters. Adjust your choices in the side panel.",
        );
        return;
    };

    panels::metric_cards(ui, &overview.metrics);
    ui.separator();

    ui.heading("Salary details");
    detail_charts(ui, state, &overview);
    ui.separator();

    ui.heading("Geographic analysis");
    let focus = &state.params.focus_job_title;
    ui.label(format!("Mean salary by country for the {focus} role."));
    match overview.focus_by_country.as_ready() {
        Some(groups) => {
            charts::country_tiles(ui, &format!("Mean {focus} salary by country"), groups);
            panels::insight(ui, MAP_INSIGHT);
        }
        None => panels::no_data(
            ui,
            &format!("No {focus} records to map with the current filters."),
        ),
    }
    ui.separator();

    ui.heading("Detailed data");
    ui.label("The filtered raw records. Search and sort to find specific entries.");
    table::data_table(ui, state);
}

fn detail_charts(ui: &mut Ui, state: &AppState, overview: &Overview) {
    let top_n = state.params.top_n;
    ui.columns(2, |cols| {
        charts::group_means_chart(
            &mut cols[0],
            "top_jobs",
            &format!("Top {top_n} job titles by mean salary"),
            &overview.top_jobs,
        );
        panels::insight(&mut cols[0], TOP_JOBS_INSIGHT);
        charts::salary_histogram(&mut cols[1], &overview.histogram);
        panels::insight(&mut cols[1], HISTOGRAM_INSIGHT);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        charts::remote_donut(
            &mut cols[0],
            &overview.remote_mix,
            overview.metrics.count,
            &state.remote_colors,
        );
        panels::insight(&mut cols[0], REMOTE_INSIGHT);
        charts::group_means_chart(
            &mut cols[1],
            "top_countries",
            &format!("Top {top_n} countries by mean salary"),
            &overview.top_countries,
        );
        panels::insight(&mut cols[1], TOP_COUNTRIES_INSIGHT);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use eframe::egui::{Pos2, RawInput, Rect, Shape, Vec2};

    use crate::data::aggregate::AggregateParams;
    use crate::data::model::Dimension;
    use crate::data::test_support::sample_dataset;

    fn state() -> AppState {
        AppState::new(
            Arc::new(sample_dataset()),
            PathBuf::from("sample.csv"),
            AggregateParams::default(),
        )
    }

    fn collect_text(shapes: &[Shape], out: &mut Vec<String>) {
        for shape in shapes {
            match shape {
                Shape::Text(text) => out.push(text.galley.text().to_string()),
                Shape::Vec(inner) => collect_text(inner, out),
                _ => {}
            }
        }
    }

    /// Every string painted by one headless frame of the dashboard.
    fn painted_text(state: &mut AppState) -> Vec<String> {
        let ctx = egui::Context::default();
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(1400.0, 4000.0))),
            ..Default::default()
        };
        let output = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| dashboard(ui, state));
        });
        let shapes: Vec<Shape> = output.shapes.into_iter().map(|c| c.shape).collect();
        let mut out = Vec::new();
        collect_text(&shapes, &mut out);
        out
    }

    #[test]
    fn every_chart_and_the_map_carry_an_insight() {
        let text = painted_text(&mut state());
        for insight in [
            TOP_JOBS_INSIGHT,
            HISTOGRAM_INSIGHT,
            REMOTE_INSIGHT,
            TOP_COUNTRIES_INSIGHT,
            MAP_INSIGHT,
        ] {
            assert!(text.iter().any(|t| t == insight), "missing caption: {insight}");
        }
    }

    #[test]
    fn empty_selection_shows_no_insights() {
        let mut st = state();
        st.select_none(Dimension::Year);
        let text = painted_text(&mut st);
        assert!(!text.iter().any(|t| t == TOP_JOBS_INSIGHT || t == MAP_INSIGHT));
        assert!(text.iter().any(|t| t.contains("No records match")));
    }
}
