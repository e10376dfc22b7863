use crate::data::model::FilteredView;

use super::correlation::pearson_coefficient;
use super::paired_finite;

/// Pairwise Pearson coefficients of the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()²` entries; NaN where undefined.
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }
}

/// Correlation matrix over the numeric columns of the view, each entry on
/// the rows where both columns are present.
pub fn correlation_matrix(view: &FilteredView<'_>) -> CorrelationMatrix {
    let columns = view.table().numeric_column_names();
    let data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| view.numeric(name).unwrap_or_default())
        .collect();

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = paired_finite(&data[i], &data[j])
                .and_then(|(x, y)| pearson_coefficient(&x, &y))
                .unwrap_or(f64::NAN);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}
