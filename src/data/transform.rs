use serde::{Deserialize, Serialize};

/// Per-value transform applied before filtering or plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTransform {
    #[default]
    Linear,
    /// `log10(v)` for `v > 0`; non-positive values become missing (NaN).
    Log10,
}

impl AxisTransform {
    pub fn from_log_flag(log: bool) -> Self {
        if log {
            AxisTransform::Log10
        } else {
            AxisTransform::Linear
        }
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            AxisTransform::Linear => v,
            AxisTransform::Log10 if v > 0.0 => v.log10(),
            AxisTransform::Log10 => f64::NAN,
        }
    }

    pub fn apply_all(self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.apply(v)).collect()
    }

    /// Axis label for a column under this transform.
    pub fn label(self, column: &str) -> String {
        match self {
            AxisTransform::Linear => column.to_string(),
            AxisTransform::Log10 => format!("log({column})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        let values = [-1.0, 0.0, 2.5, f64::NAN];
        let out = AxisTransform::Linear.apply_all(&values);
        assert_eq!(out[..3], values[..3]);
        assert!(out[3].is_nan());
    }

    #[test]
    fn log_drops_non_positive_values() {
        let out = AxisTransform::Log10.apply_all(&[-3.0, 0.0, 1000.0, 0.01]);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 1000f64.log10());
        assert_eq!(out[3], 0.01f64.log10());
    }

    #[test]
    fn labels_mark_log_axes() {
        assert_eq!(AxisTransform::Log10.label("Mstar"), "log(Mstar)");
        assert_eq!(AxisTransform::Linear.label("Mstar"), "Mstar");
    }
}
