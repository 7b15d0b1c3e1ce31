use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::model::{Dataset, IncidentRecord};

// ---------------------------------------------------------------------------
// Daily counts + trend (time-series input)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Incidents per distinct date, oldest first.
pub fn daily_counts(dataset: &Dataset) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in dataset {
        *by_date.entry(record.incident_date).or_default() += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Least-squares line over the series index: `y ≈ slope * i + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

impl Trend {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a degree-1 polynomial to `counts` with x = 0, 1, 2, ...
///
/// Returns `None` for an empty series. A single point gives a flat line.
pub fn linear_trend(counts: &[DailyCount]) -> Option<Trend> {
    let n = counts.len();
    if n == 0 {
        return None;
    }
    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = counts.iter().map(|c| c.count as f64).sum::<f64>() / nf;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, c) in counts.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (c.count as f64 - mean_y);
        sxx += dx * dx;
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    Some(Trend {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

// ---------------------------------------------------------------------------
// Category ranking (bar-chart input)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// The `n` most frequent non-empty categories, most frequent first.
///
/// Equal counts keep the order in which the categories first appear.
pub fn top_categories(dataset: &Dataset, n: usize) -> Vec<CategoryCount> {
    let mut order: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in dataset {
        let label = record.incident_category.as_str();
        if label.trim().is_empty() {
            continue;
        }
        match index.get(label).copied() {
            Some(i) => order[i].count += 1,
            None => {
                index.insert(label, order.len());
                order.push(CategoryCount {
                    category: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable: ties stay in first-seen order
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(n);
    order
}

// ---------------------------------------------------------------------------
// Seeded sampling (map input)
// ---------------------------------------------------------------------------

/// Pick `min(size, len)` distinct records with a seeded generator.
///
/// The same dataset, size and seed always yield the same records in the
/// same order.
pub fn sample_records(dataset: &Dataset, size: usize, seed: u64) -> Vec<&IncidentRecord> {
    let amount = size.min(dataset.len());
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, dataset.len(), amount)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}
