use std::collections::BTreeMap;

use crate::data::filter::{build_filters, filtered_indices, RangeSelection, SliderBounds, Variant};
use crate::data::groups::RedshiftGroup;
use crate::data::model::{FilteredView, GalaxyTable, SSFR, STELLAR_MASS};
use crate::data::transform::AxisTransform;
use crate::stats::correlation::{correlate, CorrelationPair};
use crate::stats::distribution::{density_curve, histogram, Histogram, DEFAULT_BINS, DENSITY_POINTS};
use crate::stats::matrix::{correlation_matrix, CorrelationMatrix};
use crate::stats::regression::ols;
use crate::stats::summary::{describe, ColumnSummary};
use crate::stats::{paired_finite, StatsError};

/// Groups smaller than this are reported without statistics.
pub const MIN_GROUP_ROWS: usize = 3;

// ---------------------------------------------------------------------------
// Controls – every widget value
// ---------------------------------------------------------------------------

/// The widget values that determine the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub ranges: RangeSelection,
    pub histogram_column: String,
    pub x_column: String,
    pub y_column: String,
    pub log_x: bool,
    pub log_y: bool,
    pub show_heatmap: bool,
    pub histogram_bins: usize,
}

impl Controls {
    /// Initial widget values for a freshly loaded table.
    pub fn defaults(
        table: &GalaxyTable,
        bounds: &SliderBounds,
        default_log_mass: (f64, f64),
    ) -> Self {
        let numeric = table.numeric_column_names();
        let pick = |preferred: &str, fallback: usize| -> String {
            if numeric.iter().any(|c| c == preferred) {
                preferred.to_string()
            } else {
                numeric
                    .get(fallback)
                    .or_else(|| numeric.first())
                    .cloned()
                    .unwrap_or_default()
            }
        };

        Controls {
            ranges: bounds.default_selection(default_log_mass),
            histogram_column: numeric.first().cloned().unwrap_or_default(),
            x_column: pick(STELLAR_MASS, 0),
            y_column: pick(SSFR, 1),
            log_x: false,
            log_y: false,
            show_heatmap: false,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything the page shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionView {
    pub column: String,
    pub histogram: Option<Histogram>,
    pub density: Option<Vec<[f64; 2]>>,
}

/// Scatter points of one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    /// `None` when the table carries no groups.
    pub group: Option<RedshiftGroup>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterView {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
    /// End points of the least-squares line, when it could be fitted.
    pub fit: Option<[[f64; 2]; 2]>,
    pub correlation: Result<CorrelationPair, StatsError>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupOutcome {
    /// Fewer than [`MIN_GROUP_ROWS`] rows.
    Insufficient,
    Computed(CorrelationPair),
    Failed(StatsError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupReport {
    pub group: RedshiftGroup,
    pub rows: usize,
    pub outcome: GroupOutcome,
}

/// The computed page for one set of controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub variant: Variant,
    pub total: usize,
    /// Table rows in the filtered view.
    pub rows: Vec<usize>,
    pub summary: Vec<ColumnSummary>,
    pub distribution: DistributionView,
    pub scatter: ScatterView,
    /// Per-group breakdown; empty outside the group analysis variant.
    pub groups: Vec<GroupReport>,
    /// Present in the explorer variant when the heatmap is toggled on.
    pub heatmap: Option<CorrelationMatrix>,
}

impl DashboardView {
    pub fn selected(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Compute the whole page from the table and the current controls.
pub fn render(table: &GalaxyTable, variant: Variant, controls: &Controls) -> DashboardView {
    let filters = build_filters(variant, &controls.ranges);
    let view = table.view(filtered_indices(table, &filters));
    log::debug!("Rendering {} of {} galaxies", view.len(), table.len());
    if view.is_empty() {
        log::warn!("Current filters exclude every galaxy");
    }

    let x_transform = AxisTransform::from_log_flag(controls.log_x);
    let y_transform = AxisTransform::from_log_flag(controls.log_y);
    let x = axis_values(&view, &controls.x_column, x_transform);
    let y = axis_values(&view, &controls.y_column, y_transform);

    let groups = if variant.uses_groups() {
        group_breakdown(&view, &x, &y)
    } else {
        Vec::new()
    };
    let heatmap = (variant == Variant::Explorer && controls.show_heatmap)
        .then(|| correlation_matrix(&view));

    DashboardView {
        variant,
        total: table.len(),
        summary: describe(&view),
        distribution: distribution(&view, &controls.histogram_column, controls.histogram_bins),
        scatter: scatter(&view, controls, &x, &y),
        groups,
        heatmap,
        rows: view.rows().to_vec(),
    }
}

/// Column values of the view under a transform; an unknown column is all missing.
fn axis_values(view: &FilteredView<'_>, column: &str, transform: AxisTransform) -> Vec<f64> {
    match view.numeric(column) {
        Some(values) => transform.apply_all(&values),
        None => vec![f64::NAN; view.len()],
    }
}

fn distribution(view: &FilteredView<'_>, column: &str, bins: usize) -> DistributionView {
    let values = view.numeric(column).unwrap_or_default();
    let histogram = histogram(&values, bins.max(1));
    let density = histogram
        .as_ref()
        .and_then(|h| density_curve(&values, h, DENSITY_POINTS));
    DistributionView {
        column: column.to_string(),
        histogram,
        density,
    }
}

fn scatter(view: &FilteredView<'_>, controls: &Controls, x: &[f64], y: &[f64]) -> ScatterView {
    let x_label = AxisTransform::from_log_flag(controls.log_x).label(&controls.x_column);
    let y_label = AxisTransform::from_log_flag(controls.log_y).label(&controls.y_column);

    let groups = view.groups();
    let mut by_group: BTreeMap<Option<RedshiftGroup>, Vec<[f64; 2]>> = BTreeMap::new();
    for (pos, (&xv, &yv)) in x.iter().zip(y).enumerate() {
        if xv.is_finite() && yv.is_finite() {
            let group = groups.as_ref().map(|g| g[pos]);
            by_group.entry(group).or_default().push([xv, yv]);
        }
    }
    let series = by_group
        .into_iter()
        .map(|(group, points)| ScatterSeries { group, points })
        .collect();

    let pairs = paired_finite(x, y);
    let fit = pairs.as_ref().ok().and_then(|(px, py)| {
        let line = ols(px, py).ok()?;
        let lo = px.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = px.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(line.segment(lo, hi))
    });
    let correlation = pairs.and_then(|(px, py)| correlate(&px, &py));
    if let Err(e) = &correlation {
        log::debug!("Correlation of {x_label} vs {y_label} unavailable: {e}");
    }

    ScatterView {
        x_label,
        y_label,
        series,
        fit,
        correlation,
    }
}

/// Correlations within each redshift group of the view, in group order.
fn group_breakdown(view: &FilteredView<'_>, x: &[f64], y: &[f64]) -> Vec<GroupReport> {
    let Some(groups) = view.groups() else {
        return Vec::new();
    };

    let mut members: BTreeMap<RedshiftGroup, Vec<usize>> = BTreeMap::new();
    for (pos, group) in groups.iter().enumerate() {
        members.entry(*group).or_default().push(pos);
    }

    members
        .into_iter()
        .map(|(group, positions)| {
            let outcome = if positions.len() < MIN_GROUP_ROWS {
                GroupOutcome::Insufficient
            } else {
                let gx: Vec<f64> = positions.iter().map(|&p| x[p]).collect();
                let gy: Vec<f64> = positions.iter().map(|&p| y[p]).collect();
                match paired_finite(&gx, &gy).and_then(|(px, py)| correlate(&px, &py)) {
                    Ok(pair) => GroupOutcome::Computed(pair),
                    Err(e) => GroupOutcome::Failed(e),
                }
            };
            GroupReport {
                group,
                rows: positions.len(),
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::{Column, REDSHIFT, SFR};

    fn two_rows() -> GalaxyTable {
        GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.2]),
            Column::numeric(STELLAR_MASS, vec![1e9, 1e10]),
            Column::numeric(SFR, vec![0.5, 5.0]),
            Column::numeric(SSFR, vec![5e-10, 5e-10]),
        ])
        .with_redshift_groups()
    }

    /// Twelve galaxies: seven in group 1, four in group 2, one in group 3.
    fn catalogue() -> GalaxyTable {
        let z = vec![
            0.01, 0.02, 0.03, 0.04, 0.05, 0.015, 0.025, 0.06, 0.08, 0.1, 0.12, 0.2,
        ];
        let mstar: Vec<f64> = (0..12).map(|i| 10f64.powf(8.5 + 0.2 * i as f64)).collect();
        let sfr: Vec<f64> = (0..12).map(|i| 0.1 + 0.5 * i as f64).collect();
        let ssfr: Vec<f64> = mstar.iter().zip(&sfr).map(|(m, s)| s / m).collect();
        GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, z),
            Column::numeric(STELLAR_MASS, mstar),
            Column::numeric(SFR, sfr),
            Column::numeric(SSFR, ssfr),
        ])
        .with_redshift_groups()
    }

    fn controls_for(table: &GalaxyTable) -> Controls {
        let bounds = SliderBounds::from_table(table);
        let mut controls = Controls::defaults(table, &bounds, (8.0, 11.5));
        // Open every range so nothing is filtered out.
        controls.ranges.log_mass = bounds.log_mass;
        controls
    }

    #[test]
    fn end_to_end_two_galaxies() {
        let table = two_rows();
        let mut controls = controls_for(&table);
        controls.ranges.redshift = (0.0, 0.3);
        controls.ranges.log_mass = (8.0, 11.0);

        let view = render(&table, Variant::GroupAnalysis, &controls);
        assert_eq!(view.selected(), 2);
        let labels: Vec<&str> = view.groups.iter().map(|g| g.group.label()).collect();
        assert_eq!(labels, vec!["Group 1", "Group 3"]);
        // Both groups are below the minimum size.
        assert!(view
            .groups
            .iter()
            .all(|g| g.outcome == GroupOutcome::Insufficient));
    }

    #[test]
    fn defaults_pick_mass_and_specific_sfr() {
        let table = catalogue();
        let controls = controls_for(&table);
        assert_eq!(controls.x_column, STELLAR_MASS);
        assert_eq!(controls.y_column, SSFR);
        assert_eq!(controls.histogram_column, REDSHIFT);
        assert_eq!(controls.histogram_bins, DEFAULT_BINS);
    }

    #[test]
    fn summary_and_plots_use_the_filtered_rows() {
        let table = catalogue();
        let mut controls = controls_for(&table);
        controls.ranges.redshift = (0.0, 0.05);

        let view = render(&table, Variant::GroupAnalysis, &controls);
        assert_eq!(view.selected(), 7);
        assert_eq!(view.total, 12);
        let z = view.summary.iter().find(|s| s.column == REDSHIFT).unwrap();
        assert_eq!(z.count, 7);
        assert_eq!(z.max, 0.05);
        assert_eq!(view.distribution.histogram.as_ref().unwrap().total(), 7);
        let points: usize = view.scatter.series.iter().map(|s| s.points.len()).sum();
        assert_eq!(points, 7);
    }

    #[test]
    fn group_breakdown_skips_small_groups_only() {
        let table = catalogue();
        let mut controls = controls_for(&table);
        controls.x_column = SFR.to_string();
        controls.y_column = STELLAR_MASS.to_string();
        controls.log_y = true;

        let view = render(&table, Variant::GroupAnalysis, &controls);
        let summary: Vec<(RedshiftGroup, usize)> =
            view.groups.iter().map(|g| (g.group, g.rows)).collect();
        assert_eq!(
            summary,
            vec![
                (RedshiftGroup::Group1, 7),
                (RedshiftGroup::Group2, 4),
                (RedshiftGroup::Group3, 1)
            ]
        );
        assert!(matches!(view.groups[0].outcome, GroupOutcome::Computed(_)));
        assert!(matches!(view.groups[1].outcome, GroupOutcome::Computed(_)));
        assert_eq!(view.groups[2].outcome, GroupOutcome::Insufficient);

        // log10(M*) is linear in SFR within every group.
        if let GroupOutcome::Computed(pair) = view.groups[1].outcome {
            assert_relative_eq!(pair.pearson.coefficient, 1.0, epsilon = 1e-9);
            assert_relative_eq!(pair.spearman.coefficient, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn group_failures_do_not_stop_other_groups() {
        let table = GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.02, 0.03, 0.1, 0.11, 0.12]),
            Column::numeric(STELLAR_MASS, vec![1e9; 6]),
            Column::numeric(SFR, vec![1.0, 1.0, 1.0, 1.0, 2.0, 3.0]),
            Column::numeric(SSFR, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]),
        ])
        .with_redshift_groups();
        let mut controls = controls_for(&table);
        controls.x_column = SFR.to_string();
        controls.y_column = SSFR.to_string();

        let view = render(&table, Variant::GroupAnalysis, &controls);
        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.groups[0].outcome, GroupOutcome::Failed(StatsError::Degenerate));
        assert!(matches!(view.groups[1].outcome, GroupOutcome::Computed(_)));
    }

    #[test]
    fn empty_view_degrades_to_warnings() {
        let table = catalogue();
        let mut controls = controls_for(&table);
        controls.ranges.redshift = (5.0, 6.0);

        let view = render(&table, Variant::GroupAnalysis, &controls);
        assert_eq!(view.selected(), 0);
        assert!(view.summary.iter().all(|s| s.count == 0));
        assert!(view.distribution.histogram.is_none());
        assert!(view.scatter.series.is_empty());
        assert!(view.scatter.fit.is_none());
        assert_eq!(
            view.scatter.correlation,
            Err(StatsError::InsufficientData { needed: 2, got: 0 })
        );
        assert!(view.groups.is_empty());
    }

    #[test]
    fn log_axes_drop_non_positive_values() {
        let table = GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.02, 0.03]),
            Column::numeric(STELLAR_MASS, vec![1e9, 1e10, 1e11]),
            Column::numeric(SFR, vec![0.0, 1.0, 10.0]),
            Column::numeric(SSFR, vec![1.0, 2.0, 3.0]),
        ]);
        let mut controls = controls_for(&table);
        controls.x_column = SFR.to_string();
        controls.log_x = true;

        let view = render(&table, Variant::Explorer, &controls);
        assert_eq!(view.scatter.x_label, "log(SFR)");
        assert_eq!(view.scatter.y_label, SSFR);
        assert_eq!(view.scatter.series.len(), 1);
        assert_eq!(view.scatter.series[0].group, None);
        assert_eq!(view.scatter.series[0].points, vec![[0.0, 2.0], [1.0, 3.0]]);
        let fit = view.scatter.fit.unwrap();
        assert_relative_eq!(fit[0][1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit[1][1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn heatmap_only_in_explorer_when_toggled() {
        let table = catalogue();
        let mut controls = controls_for(&table);
        assert!(render(&table, Variant::Explorer, &controls).heatmap.is_none());

        controls.show_heatmap = true;
        let explorer = render(&table, Variant::Explorer, &controls);
        assert_eq!(explorer.heatmap.as_ref().map(|m| m.size()), Some(4));
        assert!(explorer.groups.is_empty());
        assert!(render(&table, Variant::GroupAnalysis, &controls).heatmap.is_none());
    }

    #[test]
    fn render_is_deterministic() {
        let table = catalogue();
        let controls = controls_for(&table);
        assert_eq!(
            render(&table, Variant::GroupAnalysis, &controls),
            render(&table, Variant::GroupAnalysis, &controls)
        );
    }
}
