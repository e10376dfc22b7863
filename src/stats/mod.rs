/// Statistics over a filtered view: descriptive summaries, distributions,
/// correlation with significance, least-squares fits.
///
/// Every fallible computation returns [`StatsError`]; callers turn it into
/// an inline warning instead of aborting the page.
pub mod correlation;
pub mod distribution;
pub mod matrix;
pub mod regression;
pub mod special;
pub mod summary;

use thiserror::Error;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StatsError {
    #[error("not enough data: need at least {needed} valid pairs, got {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("input has zero variance")]
    Degenerate,
    #[error("inputs differ in length ({0} vs {1})")]
    LengthMismatch(usize, usize),
}

/// Keep the positions where both values are finite.
pub fn paired_finite(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch(x.len(), y.len()));
    }
    Ok(x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip())
}

/// Arithmetic mean; NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Whether every value equals the first one. Rounding in the mean makes a
/// zero sum of squares unreliable for this.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Sample standard deviation (ddof = 1); NaN below two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}
