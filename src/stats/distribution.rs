use std::f64::consts::PI;

use super::sample_std;

/// Bin count of the distribution plot.
pub const DEFAULT_BINS: usize = 30;
/// Sample points of the density curve.
pub const DENSITY_POINTS: usize = 200;

/// Equal-width histogram over the finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1]))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin the finite values into `bins` equal-width bins spanning their range;
/// the last bin is closed on the right. A constant sample is centred in a
/// unit-wide range. `None` when nothing is finite.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate scaled to histogram counts, sampled at
/// `points` positions across the histogram range.
///
/// Bandwidth follows Scott's rule, `std * n^(-1/5)`. `None` for fewer than
/// two finite values or a constant sample.
pub fn density_curve(values: &[f64], hist: &Histogram, points: usize) -> Option<Vec<[f64; 2]>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < 2 || points < 2 {
        return None;
    }
    let std = sample_std(&finite);
    if std == 0.0 || !std.is_finite() {
        return None;
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());
    let scale = n as f64 * hist.bin_width();

    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let step = (hi - lo) / (points - 1) as f64;

    Some(
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                let density: f64 = finite
                    .iter()
                    .map(|xi| {
                        let z = (x - xi) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    * norm;
                [x, density * scale]
            })
            .collect(),
    )
}
