use super::special::student_t_two_sided;
use super::{is_constant, mean, StatsError};

/// Minimum number of pairs for a correlation coefficient.
pub const MIN_PAIRS: usize = 2;

/// A correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

/// Pearson and Spearman results for the same pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPair {
    pub pearson: Correlation,
    pub spearman: Correlation,
    pub n: usize,
}

/// Pearson product-moment correlation of finite, equally long samples.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation, StatsError> {
    let r = pearson_coefficient(x, y)?;
    Ok(Correlation {
        coefficient: r,
        p_value: p_value(r, x.len()),
    })
}

/// Spearman rank correlation (average ranks for ties).
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation, StatsError> {
    check_lengths(x, y)?;
    let rho = pearson_coefficient(&rank(x), &rank(y))?;
    Ok(Correlation {
        coefficient: rho,
        p_value: p_value(rho, x.len()),
    })
}

/// Both coefficients at once.
pub fn correlate(x: &[f64], y: &[f64]) -> Result<CorrelationPair, StatsError> {
    Ok(CorrelationPair {
        pearson: pearson(x, y)?,
        spearman: spearman(x, y)?,
        n: x.len(),
    })
}

/// Pearson r alone, clamped to `[-1, 1]`.
pub fn pearson_coefficient(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_lengths(x, y)?;
    if is_constant(x) || is_constant(y) {
        return Err(StatsError::Degenerate);
    }
    let (mx, my) = (mean(x), mean(y));

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Err(StatsError::Degenerate);
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<(), StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch(x.len(), y.len()));
    }
    if x.len() < MIN_PAIRS {
        return Err(StatsError::InsufficientData {
            needed: MIN_PAIRS,
            got: x.len(),
        });
    }
    Ok(())
}

/// Two-sided p-value of a correlation coefficient from `n` pairs under the
/// null hypothesis of no correlation.
fn p_value(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    student_t_two_sided(t, df)
}

/// 1-based ranks; tied values share the mean of their positions.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let shared = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = shared;
        }
        start = end + 1;
    }
    ranks
}
