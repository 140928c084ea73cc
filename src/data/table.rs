use std::cmp::Ordering;

use super::model::{SalaryDataset, SalaryRecord};

// ---------------------------------------------------------------------------
// Raw-data table: search and ordering over the filtered rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    JobTitle,
    SalaryUsd,
    RemoteType,
    Country,
}

impl SortKey {
    /// Table columns, left to right.
    pub const COLUMNS: [SortKey; 8] = [
        SortKey::Year,
        SortKey::Seniority,
        SortKey::ContractType,
        SortKey::CompanySize,
        SortKey::JobTitle,
        SortKey::SalaryUsd,
        SortKey::RemoteType,
        SortKey::Country,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SortKey::Year => "Year",
            SortKey::Seniority => "Seniority",
            SortKey::ContractType => "Contract",
            SortKey::CompanySize => "Company size",
            SortKey::JobTitle => "Job title",
            SortKey::SalaryUsd => "Salary (USD)",
            SortKey::RemoteType => "Remote",
            SortKey::Country => "Country",
        }
    }

    fn compare(self, a: &SalaryRecord, b: &SalaryRecord) -> Ordering {
        match self {
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Seniority => a.seniority_level.cmp(&b.seniority_level),
            SortKey::ContractType => a.contract_type.cmp(&b.contract_type),
            SortKey::CompanySize => a.company_size.cmp(&b.company_size),
            SortKey::JobTitle => a.job_title.cmp(&b.job_title),
            SortKey::SalaryUsd => a.salary_usd.total_cmp(&b.salary_usd),
            SortKey::RemoteType => a.remote_type.cmp(&b.remote_type),
            SortKey::Country => a.residence_country_code.cmp(&b.residence_country_code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Search box contents and the active column sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    pub sort: Option<(SortKey, SortDirection)>,
}

impl TableQuery {
    /// Header click: ascending → descending → unsorted.
    pub fn cycle_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((k, SortDirection::Asc)) if k == key => Some((key, SortDirection::Desc)),
            Some((k, SortDirection::Desc)) if k == key => None,
            _ => Some((key, SortDirection::Asc)),
        };
    }

    /// Narrow `indices` by the search text and order them by the active sort.
    pub fn apply(&self, dataset: &SalaryDataset, indices: &[usize]) -> Vec<usize> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| needle.is_empty() || matches_search(&dataset.records[i], &needle))
            .collect();

        if let Some((key, direction)) = self.sort {
            rows.sort_by(|&a, &b| {
                let ord = key.compare(&dataset.records[a], &dataset.records[b]);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

fn matches_search(rec: &SalaryRecord, needle: &str) -> bool {
    [
        &rec.job_title,
        &rec.residence_country_code,
        &rec.seniority_level,
        &rec.contract_type,
        &rec.company_size,
        &rec.remote_type,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
