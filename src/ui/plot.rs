use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{diverging, diverging_text, GroupColors};
use crate::dashboard::{DistributionView, ScatterView};
use crate::stats::matrix::CorrelationMatrix;

const PLOT_HEIGHT: f32 = 320.0;
const HEATMAP_CELL: f32 = 56.0;
const HEATMAP_LABEL_WIDTH: f32 = 90.0;

// ---------------------------------------------------------------------------
// Histogram with density overlay
// ---------------------------------------------------------------------------

/// Binned counts of one column with its density curve.
pub fn histogram_plot(ui: &mut Ui, dist: &DistributionView) {
    let Some(hist) = &dist.histogram else {
        ui.label("No values to plot.");
        return;
    };

    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .zip(&hist.counts)
        .map(|(center, &count)| Bar::new(center, count as f64).width(width))
        .collect();

    Plot::new("histogram_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(dist.column.as_str())
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(format!("count (n = {})", hist.total()))
                    .color(Color32::from_rgb(90, 140, 200)),
            );
            if let Some(density) = &dist.density {
                plot_ui.line(
                    Line::new(PlotPoints::from(density.clone()))
                        .name("density")
                        .color(Color32::from_rgb(30, 60, 120))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot with regression line
// ---------------------------------------------------------------------------

/// Scatter points coloured by redshift group, with the global fit.
pub fn scatter_plot(ui: &mut Ui, scatter: &ScatterView, colors: &GroupColors) {
    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(scatter.x_label.as_str())
        .y_axis_label(scatter.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &scatter.series {
                let name = series
                    .group
                    .map(|g| g.range_label())
                    .unwrap_or_else(|| "galaxies".to_string());
                plot_ui.points(
                    Points::new(PlotPoints::from(series.points.clone()))
                        .name(name)
                        .color(colors.color_for(series.group))
                        .radius(2.5),
                );
            }

            if let Some(segment) = scatter.fit {
                plot_ui.line(
                    Line::new(PlotPoints::from(segment.to_vec()))
                        .name("Global fit")
                        .color(Color32::BLACK)
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated colour grid of a correlation matrix.
pub fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    if n == 0 {
        ui.label("No numeric columns.");
        return;
    }

    let grid = HEATMAP_CELL * n as f32;
    let size = Vec2::new(HEATMAP_LABEL_WIDTH + grid, HEATMAP_LABEL_WIDTH + grid);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(11.0);
    let label_color = ui.visuals().text_color();
    let origin = rect.min + Vec2::splat(HEATMAP_LABEL_WIDTH);

    for (i, name) in matrix.columns.iter().enumerate() {
        let offset = HEATMAP_CELL * (i as f32 + 0.5);
        // Row labels on the left, column labels on top.
        painter.text(
            egui::pos2(origin.x - 4.0, origin.y + offset),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            label_color,
        );
        painter.text(
            egui::pos2(origin.x + offset, origin.y - 4.0),
            Align2::CENTER_BOTTOM,
            name,
            font.clone(),
            label_color,
        );
    }

    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let cell = egui::Rect::from_min_size(
                origin + Vec2::new(HEATMAP_CELL * col as f32, HEATMAP_CELL * row as f32),
                Vec2::splat(HEATMAP_CELL),
            );
            painter.rect_filled(cell, 0.0, diverging(value));
            painter.rect_stroke(
                cell,
                0.0,
                Stroke::new(0.5, Color32::WHITE),
                egui::StrokeKind::Inside,
            );
            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                diverging_text(value),
            );
        }
    }
}
