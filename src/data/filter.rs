use serde::{Deserialize, Serialize};

use super::model::{GalaxyTable, REDSHIFT, SFR, STELLAR_MASS};
use super::transform::AxisTransform;

// ---------------------------------------------------------------------------
// Range predicates
// ---------------------------------------------------------------------------

/// One range predicate: `min <= transform(column) <= max`.
///
/// `max == None` leaves the range open above. Missing values never pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub column: String,
    pub transform: AxisTransform,
    pub min: f64,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(column: &str, transform: AxisTransform, min: f64, max: f64) -> Self {
        RangeFilter {
            column: column.to_string(),
            transform,
            min,
            max: Some(max),
        }
    }

    pub fn at_least(column: &str, transform: AxisTransform, min: f64) -> Self {
        RangeFilter {
            column: column.to_string(),
            transform,
            min,
            max: None,
        }
    }

    pub fn accepts(&self, raw: f64) -> bool {
        let v = self.transform.apply(raw);
        // NaN fails both comparisons.
        v >= self.min && self.max.map_or(true, |max| v <= max)
    }
}

/// The conjunction of all active predicates.
pub type FilterState = Vec<RangeFilter>;

/// Which dashboard is running. Decides the active predicates and panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Redshift lower bound, mass range, correlation heatmap.
    Explorer,
    /// Redshift/mass/SFR ranges, redshift groups, per-group stats, export.
    #[default]
    GroupAnalysis,
}

impl Variant {
    pub fn title(self) -> &'static str {
        match self {
            Variant::Explorer => "Explorer",
            Variant::GroupAnalysis => "Group analysis",
        }
    }

    pub fn uses_groups(self) -> bool {
        self == Variant::GroupAnalysis
    }
}

/// Slider selections, in slider units (log mass in dex).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelection {
    pub redshift: (f64, f64),
    pub log_mass: (f64, f64),
    pub sfr: (f64, f64),
}

/// Build the predicates a variant applies for the given slider selections.
pub fn build_filters(variant: Variant, sel: &RangeSelection) -> FilterState {
    match variant {
        Variant::Explorer => vec![
            RangeFilter::at_least(REDSHIFT, AxisTransform::Linear, sel.redshift.0),
            RangeFilter::new(STELLAR_MASS, AxisTransform::Log10, sel.log_mass.0, sel.log_mass.1),
        ],
        Variant::GroupAnalysis => vec![
            RangeFilter::new(REDSHIFT, AxisTransform::Linear, sel.redshift.0, sel.redshift.1),
            RangeFilter::new(STELLAR_MASS, AxisTransform::Log10, sel.log_mass.0, sel.log_mass.1),
            RangeFilter::new(SFR, AxisTransform::Linear, sel.sfr.0, sel.sfr.1),
        ],
    }
}

/// Return indices of rows that pass all predicates.
///
/// A predicate on a column the table lacks (or holds as text) rejects every row.
pub fn filtered_indices(table: &GalaxyTable, filters: &FilterState) -> Vec<usize> {
    let resolved: Vec<(&RangeFilter, Option<&[f64]>)> = filters
        .iter()
        .map(|f| (f, table.numeric(&f.column)))
        .collect();

    (0..table.len())
        .filter(|&row| {
            resolved.iter().all(|(filter, values)| match values {
                Some(values) => filter.accepts(values[row]),
                None => false,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Slider extents
// ---------------------------------------------------------------------------

/// Extents of the filter sliders, derived from the full table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub redshift: (f64, f64),
    pub log_mass: (f64, f64),
    pub sfr: (f64, f64),
}

impl SliderBounds {
    pub fn from_table(table: &GalaxyTable) -> Self {
        let log_mass = table
            .numeric(STELLAR_MASS)
            .map(|m| AxisTransform::Log10.apply_all(m))
            .unwrap_or_default();
        SliderBounds {
            redshift: finite_extent(table.numeric(REDSHIFT).unwrap_or(&[])),
            log_mass: finite_extent(&log_mass),
            sfr: finite_extent(table.numeric(SFR).unwrap_or(&[])),
        }
    }

    /// Initial selection: full extents, except log mass which starts at
    /// `default_log_mass` clamped into its extent.
    pub fn default_selection(&self, default_log_mass: (f64, f64)) -> RangeSelection {
        let (lo, hi) = self.log_mass;
        let mut log_mass = (
            default_log_mass.0.clamp(lo, hi),
            default_log_mass.1.clamp(lo, hi),
        );
        if log_mass.0 > log_mass.1 {
            log_mass = (lo, hi);
        }
        RangeSelection {
            redshift: self.redshift,
            log_mass,
            sfr: self.sfr,
        }
    }
}

/// `(min, max)` of the finite values, `(0, 0)` when there are none.
pub fn finite_extent(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, SSFR};

    fn table() -> GalaxyTable {
        GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.2, 0.05, 0.4, f64::NAN]),
            Column::numeric(STELLAR_MASS, vec![1e9, 1e10, 0.0, 1e11, 1e9]),
            Column::numeric(SFR, vec![0.5, 5.0, 1.0, 20.0, 0.1]),
            Column::numeric(SSFR, vec![5e-10, 5e-10, 1.0, 2e-10, 1e-10]),
        ])
    }

    fn selection(z: (f64, f64), m: (f64, f64), s: (f64, f64)) -> RangeSelection {
        RangeSelection {
            redshift: z,
            log_mass: m,
            sfr: s,
        }
    }

    #[test]
    fn two_row_example_keeps_both_rows() {
        let table = GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.2]),
            Column::numeric(STELLAR_MASS, vec![1e9, 1e10]),
            Column::numeric(SFR, vec![0.5, 5.0]),
        ]);
        let filters = build_filters(
            Variant::GroupAnalysis,
            &selection((0.0, 0.3), (8.0, 11.0), (0.5, 5.0)),
        );
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let filters = vec![RangeFilter::new(SFR, AxisTransform::Linear, 0.5, 5.0)];
        assert_eq!(filtered_indices(&table(), &filters), vec![0, 1, 2]);
    }

    #[test]
    fn explorer_has_no_redshift_upper_bound() {
        let sel = selection((0.02, 0.1), (8.0, 12.0), (0.0, 0.0));
        let rows = filtered_indices(&table(), &build_filters(Variant::Explorer, &sel));
        // z = 0.2 and z = 0.4 pass despite z_max = 0.1; zero mass never passes.
        assert_eq!(rows, vec![1, 3]);
    }

    #[test]
    fn every_kept_row_satisfies_every_predicate() {
        let table = table();
        let filters = build_filters(
            Variant::GroupAnalysis,
            &selection((0.0, 0.3), (8.5, 10.5), (0.0, 10.0)),
        );
        let rows = filtered_indices(&table, &filters);
        assert!(rows.len() <= table.len());
        for row in &rows {
            for f in &filters {
                assert!(f.accepts(table.numeric(&f.column).unwrap()[*row]));
            }
        }
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn empty_result_is_allowed() {
        let filters = vec![RangeFilter::new(REDSHIFT, AxisTransform::Linear, 5.0, 6.0)];
        assert!(filtered_indices(&table(), &filters).is_empty());
    }

    #[test]
    fn unknown_column_rejects_everything() {
        let filters = vec![RangeFilter::new("nope", AxisTransform::Linear, 0.0, 1.0)];
        assert!(filtered_indices(&table(), &filters).is_empty());
    }

    #[test]
    fn slider_bounds_ignore_missing_and_non_positive_mass() {
        let bounds = SliderBounds::from_table(&table());
        assert_eq!(bounds.redshift, (0.01, 0.4));
        assert_eq!(bounds.log_mass, (9.0, 11.0));
        assert_eq!(bounds.sfr, (0.1, 20.0));

        let sel = bounds.default_selection((8.0, 11.5));
        assert_eq!(sel.log_mass, (9.0, 11.0));
        assert_eq!(sel.redshift, bounds.redshift);
    }
}
