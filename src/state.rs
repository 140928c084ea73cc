use std::path::PathBuf;
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::aggregate::{summarize, AggregateParams, DashboardView};
use crate::data::filter::{filter, FilterSelection};
use crate::data::model::{CategoryValue, Dimension, SalaryDataset};
use crate::data::table::{SortKey, TableQuery};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is shared read-only; everything else is per-session and is
/// recomputed from scratch whenever the selection changes.
pub struct AppState {
    /// Loaded dataset, never mutated after load.
    pub dataset: Arc<SalaryDataset>,

    /// File the dataset came from, shown in the top bar.
    pub source_path: PathBuf,

    /// Per-dimension filter selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics and chart series for `visible_indices`.
    pub view: DashboardView,

    pub params: AggregateParams,

    /// Colours for remote-work categories, fixed for the session.
    pub remote_colors: CategoryColors,

    /// Raw-table search and sort.
    pub table: TableQuery,

    /// `visible_indices` after table search and sort.
    pub table_rows: Vec<usize>,
}

impl AppState {
    /// Start with every filter value selected.
    pub fn new(dataset: Arc<SalaryDataset>, source_path: PathBuf, params: AggregateParams) -> Self {
        let selection = FilterSelection::all(&dataset.domain);
        let remote_colors = CategoryColors::new(&dataset.remote_types);
        let mut state = Self {
            dataset,
            source_path,
            selection,
            visible_indices: Vec::new(),
            view: DashboardView::Empty,
            params,
            remote_colors,
            table: TableQuery::default(),
            table_rows: Vec::new(),
        };
        state.refilter();
        state
    }

    /// Recompute the visible rows and every aggregate after a filter change.
    pub fn refilter(&mut self) {
        let view = filter(&self.dataset, &self.selection);
        log::debug!("{} of {} records visible", view.len(), self.dataset.len());
        self.view = summarize(&view, &self.params);
        self.visible_indices = view.into_indices();
        self.refresh_table();
    }

    /// Re-apply table search and sort to the visible rows.
    pub fn refresh_table(&mut self) {
        self.table_rows = self.table.apply(&self.dataset, &self.visible_indices);
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &CategoryValue) {
        self.selection.toggle(dimension, value);
        log::debug!("toggled {dimension} = {value}");
        self.refilter();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        self.selection.select_all(dimension, &self.dataset.domain);
        self.refilter();
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.selection.select_none(dimension);
        self.refilter();
    }

    /// Back to the default "everything selected" state.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::all(&self.dataset.domain);
        self.refilter();
    }

    pub fn set_search(&mut self, search: String) {
        if self.table.search != search {
            self.table.search = search;
            self.refresh_table();
        }
    }

    pub fn cycle_sort(&mut self, key: SortKey) {
        self.table.cycle_sort(key);
        self.refresh_table();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::Outcome;
    use crate::data::test_support::sample_dataset;

    fn state() -> AppState {
        AppState::new(
            Arc::new(sample_dataset()),
            PathBuf::from("sample.csv"),
            AggregateParams::default(),
        )
    }

    #[test]
    fn starts_unfiltered() {
        let st = state();
        assert_eq!(st.visible_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(st.table_rows, st.visible_indices);
        assert_eq!(st.view.as_ready().unwrap().metrics.count, 5);
    }

    #[test]
    fn deselecting_years_empties_the_view() {
        let mut st = state();
        for year in [2021, 2022] {
            st.toggle_filter_value(Dimension::Year, &CategoryValue::Integer(year));
        }
        assert_eq!(st.visible_indices, vec![0, 1, 3]);
        assert_eq!(st.view.as_ready().unwrap().metrics.mean_salary, 100_000.0);

        st.select_none(Dimension::Year);
        assert!(st.visible_indices.is_empty());
        assert_eq!(st.view, Outcome::Empty);
        assert!(st.table_rows.is_empty());

        st.select_all(Dimension::Year);
        assert_eq!(st.visible_indices.len(), 5);

        st.select_none(Dimension::Seniority);
        st.reset_filters();
        assert!(st.selection.is_unfiltered(&st.dataset.domain));
        assert_eq!(st.visible_indices.len(), 5);
    }

    #[test]
    fn table_follows_filters_and_search() {
        let mut st = state();
        st.set_search("usa".to_string());
        assert_eq!(st.table_rows, vec![0, 3]);

        st.toggle_filter_value(Dimension::Year, &CategoryValue::Integer(2023));
        assert!(st.table_rows.is_empty());

        st.set_search(String::new());
        st.cycle_sort(SortKey::SalaryUsd);
        assert_eq!(st.table_rows, vec![2, 4]);
    }
}
