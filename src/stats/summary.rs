use crate::data::model::FilteredView;

use super::{mean, sample_std};

/// Descriptive statistics of one numeric column. Missing values are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn of(column: &str, values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        ColumnSummary {
            column: column.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Values in display order, matching [`SUMMARY_HEADERS`] after the name.
    pub fn cells(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

pub const SUMMARY_HEADERS: [&str; 9] = [
    "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Summaries of every numeric column of the view, in table order.
pub fn describe(view: &FilteredView<'_>) -> Vec<ColumnSummary> {
    view.table()
        .numeric_column_names()
        .iter()
        .filter_map(|name| {
            let values = view.numeric(name)?;
            Some(ColumnSummary::of(name, &values))
        })
        .collect()
}

/// Quantile of ascending data with linear interpolation between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
