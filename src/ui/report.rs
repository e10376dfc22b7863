use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::dashboard::{GroupOutcome, GroupReport};
use crate::stats::correlation::CorrelationPair;
use crate::stats::summary::{ColumnSummary, SUMMARY_HEADERS};
use crate::stats::StatsError;

const ROW_HEIGHT: f32 = 18.0;
const WARNING: Color32 = Color32::from_rgb(200, 140, 0);

/// Descriptive statistics, one row per numeric column.
pub fn summary_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(90.0))
        .columns(TableColumn::auto().at_least(70.0), SUMMARY_HEADERS.len() - 1)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in SUMMARY_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for summary in summaries {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(summary.column.as_str());
                    });
                    row.col(|ui| {
                        ui.label(summary.count.to_string());
                    });
                    for value in &summary.cells()[1..] {
                        row.col(|ui| {
                            ui.label(format_stat(*value));
                        });
                    }
                });
            }
        });
}

/// Compact number formatting for the statistics table.
pub fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v != 0.0 && (v.abs() >= 1e5 || v.abs() < 1e-3) {
        format!("{v:.4e}")
    } else {
        format!("{v:.4}")
    }
}

fn correlation_lines(ui: &mut Ui, pair: &CorrelationPair, prefix: &str) {
    ui.label(
        RichText::new(format!(
            "{prefix}Pearson r = {:.3}, p = {:.3e}",
            pair.pearson.coefficient, pair.pearson.p_value
        ))
        .strong(),
    );
    ui.label(
        RichText::new(format!(
            "{prefix}Spearman ρ = {:.3}, p = {:.3e}",
            pair.spearman.coefficient, pair.spearman.p_value
        ))
        .strong(),
    );
}

/// Global correlation of the scatter axes, or a warning.
pub fn correlation_summary(ui: &mut Ui, correlation: &Result<CorrelationPair, StatsError>) {
    match correlation {
        Ok(pair) => correlation_lines(ui, pair, ""),
        Err(e) => {
            ui.label(
                RichText::new(format!("⚠ Correlation unavailable for these axes: {e}"))
                    .color(WARNING),
            );
        }
    }
}

/// Per-group correlation breakdown.
pub fn group_breakdown(ui: &mut Ui, reports: &[GroupReport]) {
    if reports.is_empty() {
        ui.label("No galaxies selected.");
        return;
    }
    for report in reports {
        ui.label(
            RichText::new(format!(
                "{} ({} galaxies)",
                report.group.range_label(),
                report.rows
            ))
            .heading(),
        );
        match &report.outcome {
            GroupOutcome::Insufficient => {
                ui.label("Too few galaxies for analysis.");
            }
            GroupOutcome::Computed(pair) => correlation_lines(ui, pair, "• "),
            GroupOutcome::Failed(e) => {
                ui.label(RichText::new(format!("❌ Statistics failed: {e}")).color(Color32::RED));
            }
        }
        ui.add_space(4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_formatting() {
        assert_eq!(format_stat(f64::NAN), "NaN");
        assert_eq!(format_stat(0.0), "0.0000");
        assert_eq!(format_stat(0.1234567), "0.1235");
        assert_eq!(format_stat(2.5e10), "2.5000e10");
        assert_eq!(format_stat(5e-10), "5.0000e-10");
    }
}
