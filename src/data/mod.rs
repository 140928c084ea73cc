/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalaryDataset (once per process)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SalaryDataset  │  Vec<SalaryRecord>, filter domains
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics + chart series, or an explicit empty signal
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::filter::FilterSelection;
    use super::model::{CategoryValue, Dimension, SalaryDataset, SalaryRecord};

    pub fn text(s: &str) -> CategoryValue {
        CategoryValue::Text(Arc::from(s))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        year: i64,
        seniority: &str,
        contract: &str,
        size: &str,
        job: &str,
        salary: f64,
        remote: &str,
        country: &str,
    ) -> SalaryRecord {
        SalaryRecord {
            year,
            seniority_level: Arc::from(seniority),
            contract_type: Arc::from(contract),
            company_size: Arc::from(size),
            job_title: Arc::from(job),
            salary_usd: salary,
            remote_type: Arc::from(remote),
            residence_country_code: Arc::from(country),
        }
    }

    /// The five-row scenario used throughout the tests.
    pub fn sample_records() -> Vec<SalaryRecord> {
        vec![
            record(2023, "senior", "full-time", "large", "Data Scientist", 150_000.0, "remote", "USA"),
            record(2023, "junior", "full-time", "small", "Data Analyst", 60_000.0, "onsite", "BRA"),
            record(2022, "senior", "contract", "medium", "Data Scientist", 120_000.0, "hybrid", "BRA"),
            record(2023, "mid", "full-time", "large", "Data Engineer", 90_000.0, "remote", "USA"),
            record(2021, "senior", "full-time", "medium", "Data Scientist", 200_000.0, "remote", "CAN"),
        ]
    }

    pub fn sample_dataset() -> SalaryDataset {
        SalaryDataset::from_records(sample_records())
    }

    pub fn arb_dataset() -> impl Strategy<Value = SalaryDataset> {
        let row = (
            2020i64..2025,
            prop::sample::select(vec!["junior", "mid", "senior", "executive"]),
            prop::sample::select(vec!["full-time", "contract", "part-time"]),
            prop::sample::select(vec!["small", "medium", "large"]),
            prop::sample::select(vec!["Data Scientist", "Data Analyst", "ML Engineer", "Data Engineer"]),
            0u32..400_000,
            prop::sample::select(vec!["remote", "hybrid", "onsite"]),
            prop::sample::select(vec!["USA", "BRA", "CAN", "DEU", "IND"]),
        )
            .prop_map(|(y, s, c, z, j, usd, r, k)| record(y, s, c, z, j, usd as f64, r, k));
        prop::collection::vec(row, 0..60).prop_map(SalaryDataset::from_records)
    }

    pub fn arb_selection(ds: &SalaryDataset) -> impl Strategy<Value = FilterSelection> {
        let per_dim: Vec<_> = Dimension::ALL
            .iter()
            .map(|dim| {
                let values: Vec<CategoryValue> =
                    ds.domain.get(dim).map(|s| s.iter().cloned().collect()).unwrap_or_default();
                let n = values.len();
                prop::sample::subsequence(values, 0..=n)
            })
            .collect();
        per_dim.prop_map(|subsets| {
            let mut sel = FilterSelection::default();
            for (dim, subset) in Dimension::ALL.iter().zip(subsets) {
                sel.set(*dim, subset);
            }
            sel
        })
    }

    pub fn arb_dataset_and_selection(
    ) -> impl Strategy<Value = (SalaryDataset, FilterSelection)> {
        arb_dataset().prop_flat_map(|ds| {
            let sel = arb_selection(&ds);
            (Just(ds), sel)
        })
    }
}
