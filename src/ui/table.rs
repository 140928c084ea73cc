use std::sync::Arc;

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::SalaryRecord;
use crate::data::table::{SortDirection, SortKey};
use crate::format;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// The filtered records with a search box and click-to-sort headers.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search:");
        let mut search = state.table.search.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut search).hint_text("job title, country, …"))
            .changed()
        {
            state.set_search(search);
        }
        ui.label(format!("{} rows", format::count(state.table_rows.len())));
    });

    let dataset = Arc::clone(&state.dataset);
    let mut clicked: Option<SortKey> = None;
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(420.0)
        .columns(Column::auto().at_least(70.0), SortKey::COLUMNS.len())
        .header(24.0, |mut header| {
            for key in SortKey::COLUMNS {
                header.col(|ui: &mut Ui| {
                    let marker = match state.table.sort {
                        Some((k, SortDirection::Asc)) if k == key => " ⏶",
                        Some((k, SortDirection::Desc)) if k == key => " ⏷",
                        _ => "",
                    };
                    if ui.button(format!("{}{marker}", key.header())).clicked() {
                        clicked = Some(key);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(row_height, state.table_rows.len(), |mut row| {
                let rec = &dataset.records[state.table_rows[row.index()]];
                for key in SortKey::COLUMNS {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell_text(rec, key));
                    });
                }
            });
        });

    if let Some(key) = clicked {
        state.cycle_sort(key);
    }
}

fn cell_text(rec: &SalaryRecord, key: SortKey) -> String {
    match key {
        SortKey::Year => rec.year.to_string(),
        SortKey::Seniority => rec.seniority_level.to_string(),
        SortKey::ContractType => rec.contract_type.to_string(),
        SortKey::CompanySize => rec.company_size.to_string(),
        SortKey::JobTitle => rec.job_title.to_string(),
        SortKey::SalaryUsd => format::usd(rec.salary_usd),
        SortKey::RemoteType => rec.remote_type.to_string(),
        SortKey::Country => rec.residence_country_code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::sample_records;

    #[test]
    fn cells_render_each_column() {
        let rec = &sample_records()[0];
        let cells: Vec<String> = SortKey::COLUMNS.iter().map(|k| cell_text(rec, *k)).collect();
        assert_eq!(
            cells,
            vec!["2023", "senior", "full-time", "large", "Data Scientist", "$150,000", "remote", "USA"]
        );
    }
}
