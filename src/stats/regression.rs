use super::correlation::MIN_PAIRS;
use super::{is_constant, mean, StatsError};

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// End points of the line over `[x_min, x_max]`.
    pub fn segment(&self, x_min: f64, x_max: f64) -> [[f64; 2]; 2] {
        [[x_min, self.predict(x_min)], [x_max, self.predict(x_max)]]
    }
}

/// Fit a least-squares line through finite, equally long samples.
pub fn ols(x: &[f64], y: &[f64]) -> Result<LinearFit, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch(x.len(), y.len()));
    }
    if x.len() < MIN_PAIRS {
        return Err(StatsError::InsufficientData {
            needed: MIN_PAIRS,
            got: x.len(),
        });
    }

    if is_constant(x) {
        return Err(StatsError::Degenerate);
    }

    let (mx, my) = (mean(x), mean(y));
    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (a, b)| {
        (sxy + (a - mx) * (b - my), sxx + (a - mx) * (a - mx))
    });
    if sxx == 0.0 {
        return Err(StatsError::Degenerate);
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}
