use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CategoryValue – a single value of a filterable dimension
// ---------------------------------------------------------------------------

/// A value offered in one of the filter widgets.
///
/// Years compare numerically, text compares lexicographically. A dimension
/// only ever holds one variant, so the cross-variant order never matters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Integer(i64),
    Text(Arc<str>),
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Integer(i) => write!(f, "{i}"),
            CategoryValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension – the four filterable columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl Dimension {
    /// All dimensions in side-panel order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::ContractType,
        Dimension::CompanySize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Seniority => "Seniority",
            Dimension::ContractType => "Contract type",
            Dimension::CompanySize => "Company size",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One salary observation. Text fields are interned by the loader, so rows
/// sharing a category share the allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub year: i64,
    pub seniority_level: Arc<str>,
    pub contract_type: Arc<str>,
    pub company_size: Arc<str>,
    pub job_title: Arc<str>,
    /// Annual salary in USD, finite and non-negative.
    pub salary_usd: f64,
    pub remote_type: Arc<str>,
    /// ISO 3166-1 alpha-3 code.
    pub residence_country_code: Arc<str>,
}

impl SalaryRecord {
    /// The record's value for a filterable dimension.
    pub fn category(&self, dimension: Dimension) -> CategoryValue {
        match dimension {
            Dimension::Year => CategoryValue::Integer(self.year),
            Dimension::Seniority => CategoryValue::Text(Arc::clone(&self.seniority_level)),
            Dimension::ContractType => CategoryValue::Text(Arc::clone(&self.contract_type)),
            Dimension::CompanySize => CategoryValue::Text(Arc::clone(&self.company_size)),
        }
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// For each dimension, the sorted set of values present in the dataset.
pub type FilterDomain = BTreeMap<Dimension, BTreeSet<CategoryValue>>;

/// The full parsed dataset with pre-computed filter domains.
/// Immutable once built; shared behind an `Arc` for the process lifetime.
#[derive(Debug, Clone)]
pub struct SalaryDataset {
    /// All records, in file order.
    pub records: Vec<SalaryRecord>,
    /// Distinct values per filterable dimension.
    pub domain: FilterDomain,
    /// Distinct remote-work categories, used for stable chart colours.
    pub remote_types: BTreeSet<Arc<str>>,
}

impl SalaryDataset {
    /// Build the filter domains from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let mut domain: FilterDomain = Dimension::ALL
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();
        let mut remote_types = BTreeSet::new();

        for rec in &records {
            for dim in Dimension::ALL {
                domain.entry(dim).or_default().insert(rec.category(dim));
            }
            remote_types.insert(Arc::clone(&rec.remote_type));
        }

        SalaryDataset {
            records,
            domain,
            remote_types,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of one dimension.
    pub fn values(&self, dimension: Dimension) -> Option<&BTreeSet<CategoryValue>> {
        self.domain.get(&dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{sample_dataset, text};

    #[test]
    fn years_sort_numerically() {
        let mut values = vec![
            CategoryValue::Integer(10),
            CategoryValue::Integer(9),
            CategoryValue::Integer(2023),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CategoryValue::Integer(9),
                CategoryValue::Integer(10),
                CategoryValue::Integer(2023),
            ]
        );
    }

    #[test]
    fn domain_holds_sorted_distinct_values() {
        let ds = sample_dataset();
        let years: Vec<_> = ds.values(Dimension::Year).unwrap().iter().cloned().collect();
        assert_eq!(
            years,
            vec![
                CategoryValue::Integer(2021),
                CategoryValue::Integer(2022),
                CategoryValue::Integer(2023),
            ]
        );

        let seniority: Vec<_> = ds
            .values(Dimension::Seniority)
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(seniority, vec!["junior", "mid", "senior"]);
        assert_eq!(ds.remote_types.len(), 3);
    }

    #[test]
    fn empty_dataset_still_has_every_dimension() {
        let ds = SalaryDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        for dim in Dimension::ALL {
            assert!(ds.values(dim).unwrap().is_empty());
        }
    }

    #[test]
    fn category_reads_the_matching_field() {
        let ds = sample_dataset();
        let rec = &ds.records[1];
        assert_eq!(rec.category(Dimension::Year), CategoryValue::Integer(2023));
        assert_eq!(rec.category(Dimension::Seniority), text("junior"));
    }
}
