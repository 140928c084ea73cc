use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use super::filter::FilteredView;
use super::model::SalaryRecord;

// ---------------------------------------------------------------------------
// Outcome – explicit "no data" signal
// ---------------------------------------------------------------------------

/// Result of a computation that is undefined on empty input.
///
/// `Empty` is an expected state, not an error: the UI renders it as a
/// "no results" message instead of a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Empty,
}

impl<T> Outcome<T> {
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Outcome::Ready(v) => Some(v),
            Outcome::Empty => None,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }
}

// ---------------------------------------------------------------------------
// Parameters and output shapes
// ---------------------------------------------------------------------------

/// Tunables for the aggregate views.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateParams {
    /// How many groups the top-N bar charts keep.
    pub top_n: usize,
    /// Number of equal-width histogram bins.
    pub histogram_bins: usize,
    /// Job title whose per-country means feed the map.
    pub focus_job_title: String,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 30,
            focus_job_title: "Data Scientist".to_string(),
        }
    }
}

/// Headline numbers shown in the metric cards.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub max_salary: f64,
    pub mean_salary: f64,
    pub min_salary: f64,
    pub count: usize,
    /// Most frequent job title; ties go to the title seen first.
    pub top_job_title: Arc<str>,
}

/// Mean salary of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: Arc<str>,
    pub mean: f64,
    pub count: usize,
}

/// Number of rows in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: Arc<str>,
    pub count: usize,
}

impl CategoryCount {
    /// Fraction of `total` this category represents.
    pub fn share(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }
}

/// One histogram bin covering `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Everything the dashboard shows for a non-empty selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub metrics: SummaryMetrics,
    /// Highest-paying job titles, ascending by mean.
    pub top_jobs: Vec<GroupMean>,
    pub histogram: Vec<HistogramBin>,
    /// Row count per remote-work category, most common first.
    pub remote_mix: Vec<CategoryCount>,
    /// Highest-paying residence countries, ascending by mean.
    pub top_countries: Vec<GroupMean>,
    /// Per-country mean for the focus job title, by country code.
    pub focus_by_country: Outcome<Vec<GroupMean>>,
}

/// The computed dashboard for one selection.
pub type DashboardView = Outcome<Overview>;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compute every metric and chart series from one filtered snapshot.
///
/// Short-circuits to [`Outcome::Empty`] before any statistic that is
/// undefined on empty input.
pub fn summarize(view: &FilteredView<'_>, params: &AggregateParams) -> DashboardView {
    let started = Instant::now();
    if view.is_empty() {
        log::debug!("selection matched no rows; skipping aggregates");
        return Outcome::Empty;
    }

    let rows: Vec<&SalaryRecord> = view.records().collect();
    let Some(metrics) = summary_metrics(&rows) else {
        return Outcome::Empty;
    };

    let overview = Overview {
        metrics,
        top_jobs: top_groups_by_mean(&rows, |r| &r.job_title, params.top_n),
        histogram: salary_histogram(&rows, params.histogram_bins),
        remote_mix: value_counts(&rows, |r| &r.remote_type),
        top_countries: top_groups_by_mean(&rows, |r| &r.residence_country_code, params.top_n),
        focus_by_country: focus_title_by_country(&rows, &params.focus_job_title),
    };

    log::debug!(
        "aggregated {} rows in {:.2?}",
        rows.len(),
        started.elapsed()
    );
    Outcome::Ready(overview)
}

// ---------------------------------------------------------------------------
// Individual aggregates
// ---------------------------------------------------------------------------

/// Max, mean, min, count and modal job title, or `None` for no rows.
pub fn summary_metrics(rows: &[&SalaryRecord]) -> Option<SummaryMetrics> {
    let first = rows.first()?;

    let mut max_salary = first.salary_usd;
    let mut min_salary = first.salary_usd;
    let mut total = 0.0;
    for rec in rows {
        max_salary = max_salary.max(rec.salary_usd);
        min_salary = min_salary.min(rec.salary_usd);
        total += rec.salary_usd;
    }

    Some(SummaryMetrics {
        max_salary,
        mean_salary: total / rows.len() as f64,
        min_salary,
        count: rows.len(),
        top_job_title: mode(rows.iter().map(|r| &r.job_title))?,
    })
}

/// Most frequent value; among equally frequent values the first one seen wins.
pub fn mode<'a>(values: impl Iterator<Item = &'a Arc<str>>) -> Option<Arc<str>> {
    let counts = value_counts_in_order(values);
    let mut best: Option<&CategoryCount> = None;
    for entry in &counts {
        if best.map_or(true, |b| entry.count > b.count) {
            best = Some(entry);
        }
    }
    best.map(|b| Arc::clone(&b.label))
}

/// Group rows by `key`, average salaries, keep the `n` highest means.
///
/// Ties on the mean are broken by label so repeated runs agree. The result
/// is ascending by mean, ready for a horizontal bar chart.
pub fn top_groups_by_mean<F>(rows: &[&SalaryRecord], key: F, n: usize) -> Vec<GroupMean>
where
    F: Fn(&SalaryRecord) -> &Arc<str>,
{
    let mut groups = group_means(rows, key);
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.label.cmp(&b.label)));
    groups.truncate(n);
    groups.reverse();
    groups
}

/// Mean salary per distinct `key`, ordered by key.
pub fn group_means<F>(rows: &[&SalaryRecord], key: F) -> Vec<GroupMean>
where
    F: Fn(&SalaryRecord) -> &Arc<str>,
{
    let mut acc: BTreeMap<Arc<str>, (f64, usize)> = BTreeMap::new();
    for rec in rows {
        let slot = acc.entry(Arc::clone(key(rec))).or_insert((0.0, 0));
        slot.0 += rec.salary_usd;
        slot.1 += 1;
    }
    acc.into_iter()
        .map(|(label, (sum, count))| GroupMean {
            label,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Bucket salaries into `bins` equal-width bins spanning the observed range.
///
/// Bin `i` covers `[edges[i], edges[i + 1])` and the last bin also holds
/// the maximum. A zero-width range uses a bin width of 1.0 with every value
/// in the first bin.
pub fn salary_histogram(rows: &[&SalaryRecord], bins: usize) -> Vec<HistogramBin> {
    if rows.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min_val = rows.iter().map(|r| r.salary_usd).fold(f64::INFINITY, f64::min);
    let max_val = rows.iter().map(|r| r.salary_usd).fold(f64::NEG_INFINITY, f64::max);
    let range = max_val - min_val;
    let bin_width = if range == 0.0 { 1.0 } else { range / bins as f64 };

    let mut edges: Vec<f64> = (0..=bins).map(|i| min_val + i as f64 * bin_width).collect();
    if range > 0.0 {
        edges[bins] = max_val;
    }

    let mut counts = vec![0usize; bins];
    for rec in rows {
        let v = rec.salary_usd;
        let mut idx = if range == 0.0 {
            0
        } else {
            (((v - min_val) / bin_width) as usize).min(bins - 1)
        };
        // The division can land one bin off an edge; settle against the edges themselves.
        while idx < bins - 1 && v >= edges[idx + 1] {
            idx += 1;
        }
        while idx > 0 && v < edges[idx] {
            idx -= 1;
        }
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: edges[i],
            upper: edges[i + 1],
            count,
        })
        .collect()
}

/// Count rows per distinct `key`, most frequent first, ties in first-seen order.
pub fn value_counts<F>(rows: &[&SalaryRecord], key: F) -> Vec<CategoryCount>
where
    F: Fn(&SalaryRecord) -> &Arc<str>,
{
    let mut counts = value_counts_in_order(rows.iter().map(|r| key(r)));
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Mean salary per country for rows whose job title equals `job_title`.
pub fn focus_title_by_country(rows: &[&SalaryRecord], job_title: &str) -> Outcome<Vec<GroupMean>> {
    let focus: Vec<&SalaryRecord> = rows
        .iter()
        .copied()
        .filter(|r| &*r.job_title == job_title)
        .collect();
    if focus.is_empty() {
        return Outcome::Empty;
    }
    Outcome::Ready(group_means(&focus, |r| &r.residence_country_code))
}

fn value_counts_in_order<'a>(values: impl Iterator<Item = &'a Arc<str>>) -> Vec<CategoryCount> {
    let mut position: HashMap<Arc<str>, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for value in values {
        match position.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(Arc::clone(value), counts.len());
                counts.push(CategoryCount {
                    label: Arc::clone(value),
                    count: 1,
                });
            }
        }
    }
    counts
}
