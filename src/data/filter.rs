use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryValue, Dimension, FilterDomain, SalaryDataset, SalaryRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state.
///
/// A dimension absent from the map is unconstrained. A dimension present
/// with an empty set rejects every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<Dimension, BTreeSet<CategoryValue>>,
}

impl FilterSelection {
    /// Every value of every dimension selected, i.e. show everything.
    pub fn all(domain: &FilterDomain) -> Self {
        Self {
            selected: domain
                .iter()
                .map(|(dim, vals)| (*dim, vals.clone()))
                .collect(),
        }
    }

    /// Replace the selected set of one dimension.
    pub fn set(&mut self, dimension: Dimension, values: impl IntoIterator<Item = CategoryValue>) {
        self.selected.insert(dimension, values.into_iter().collect());
    }

    pub fn selected(&self, dimension: Dimension) -> Option<&BTreeSet<CategoryValue>> {
        self.selected.get(&dimension)
    }

    pub fn is_selected(&self, dimension: Dimension, value: &CategoryValue) -> bool {
        self.selected
            .get(&dimension)
            .map_or(true, |set| set.contains(value))
    }

    /// Flip one value in a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &CategoryValue) {
        let set = self.selected.entry(dimension).or_default();
        if !set.remove(value) {
            set.insert(value.clone());
        }
    }

    /// Select every value of `dimension` present in `domain`.
    pub fn select_all(&mut self, dimension: Dimension, domain: &FilterDomain) {
        self.set(dimension, domain.get(&dimension).into_iter().flatten().cloned());
    }

    /// Deselect every value of `dimension`.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.set(dimension, std::iter::empty());
    }

    /// Whether no dimension restricts the dataset.
    pub fn is_unfiltered(&self, domain: &FilterDomain) -> bool {
        Dimension::ALL
            .iter()
            .all(|dim| !self.constrains(*dim, domain))
    }

    /// Whether `dimension` can reject any row of a dataset with `domain`.
    fn constrains(&self, dimension: Dimension, domain: &FilterDomain) -> bool {
        match (self.selected.get(&dimension), domain.get(&dimension)) {
            (None, _) => false,
            (Some(selected), Some(all)) => !all.is_subset(selected),
            (Some(_), None) => true,
        }
    }

}

// ---------------------------------------------------------------------------
// FilteredView – the rows passing the current selection
// ---------------------------------------------------------------------------

/// Rows of a dataset that pass a [`FilterSelection`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalaryDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the visible records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a SalaryRecord> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Return the rows of `dataset` that pass all active filters.
///
/// A row passes a dimension when:
/// * The dimension is not present in `selection` → passes (no constraint)
/// * The selection covers the whole domain → passes without checking
/// * The row's value is in the selected set → passes
///
/// An empty set for a dimension therefore hides everything.
pub fn filter<'a>(dataset: &'a SalaryDataset, selection: &FilterSelection) -> FilteredView<'a> {
    let active: Vec<(Dimension, &BTreeSet<CategoryValue>)> = Dimension::ALL
        .iter()
        .filter(|dim| selection.constrains(**dim, &dataset.domain))
        .filter_map(|dim| selection.selected(*dim).map(|set| (*dim, set)))
        .collect();

    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            active
                .iter()
                .all(|(dim, selected)| selected.contains(&rec.category(*dim)))
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{arb_dataset, arb_dataset_and_selection, sample_dataset, text};
    use proptest::prelude::*;

    #[test]
    fn full_selection_is_identity() {
        let ds = sample_dataset();
        let sel = FilterSelection::all(&ds.domain);
        assert!(sel.is_unfiltered(&ds.domain));
        let view = filter(&ds, &sel);
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn single_year_keeps_matching_rows_in_order() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        sel.set(Dimension::Year, [CategoryValue::Integer(2023)]);
        let view = filter(&ds, &sel);
        assert_eq!(view.indices(), &[0, 1, 3]);
        assert!(!sel.is_unfiltered(&ds.domain));
    }

    #[test]
    fn empty_set_hides_everything() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        sel.select_none(Dimension::CompanySize);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn year_outside_the_data_matches_nothing() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        sel.set(Dimension::Year, [CategoryValue::Integer(1999)]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn absent_dimension_is_unconstrained() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::default();
        sel.set(Dimension::Seniority, [text("senior")]);
        assert_eq!(filter(&ds, &sel).indices(), &[0, 2, 4]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        sel.set(Dimension::Seniority, [text("senior")]);
        sel.set(Dimension::CompanySize, [text("medium"), text("small")]);
        assert_eq!(filter(&ds, &sel).indices(), &[2, 4]);
    }

    #[test]
    fn toggle_and_select_all_round_trip() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        let junior = text("junior");

        sel.toggle(Dimension::Seniority, &junior);
        assert!(!sel.is_selected(Dimension::Seniority, &junior));
        assert_eq!(filter(&ds, &sel).len(), 4);

        sel.toggle(Dimension::Seniority, &junior);
        assert!(sel.is_selected(Dimension::Seniority, &junior));

        sel.select_none(Dimension::Seniority);
        sel.select_all(Dimension::Seniority, &ds.domain);
        assert_eq!(sel, FilterSelection::all(&ds.domain));
    }

    #[test]
    fn view_iterates_records() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::all(&ds.domain);
        sel.set(Dimension::Year, [CategoryValue::Integer(2021)]);
        let view = filter(&ds, &sel);
        let titles: Vec<&str> = view.records().map(|r| &*r.job_title).collect();
        assert_eq!(titles, vec!["Data Scientist"]);
    }

    // -- properties ----------------------------------------------------------

    proptest! {
        #[test]
        fn prop_filter_is_exact_membership((ds, sel) in arb_dataset_and_selection()) {
            let view = filter(&ds, &sel);
            let expected: Vec<usize> = ds
                .records
                .iter()
                .enumerate()
                .filter(|(_, rec)| {
                    Dimension::ALL.iter().all(|dim| {
                        sel.selected(*dim).unwrap().contains(&rec.category(*dim))
                    })
                })
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(view.indices(), expected.as_slice());
        }

        #[test]
        fn prop_full_domain_is_identity(ds in arb_dataset()) {
            let view = filter(&ds, &FilterSelection::all(&ds.domain));
            prop_assert_eq!(view.len(), ds.len());
        }

        #[test]
        fn prop_filter_is_idempotent((ds, sel) in arb_dataset_and_selection()) {
            let first = filter(&ds, &sel).into_indices();
            let second = filter(&ds, &sel).into_indices();
            prop_assert_eq!(first, second);
        }
    }
}
