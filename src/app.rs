use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::dashboard::DashboardView;
use crate::data::filter::Variant;
use crate::state::AppState;
use crate::ui::{panels, plot, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GalaxyExplorerApp {
    pub state: AppState,
}

impl GalaxyExplorerApp {
    /// Create the app and load the configured table.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load();
        Self { state }
    }
}

impl eframe::App for GalaxyExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics and plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match &self.state.view {
                    Some(view) => dashboard_page(ui, view, &self.state),
                    None => {
                        ui.centered_and_justified(|ui: &mut Ui| {
                            let msg = self
                                .state
                                .status_message
                                .as_deref()
                                .unwrap_or("Open a galaxy table  (File → Open…)");
                            ui.heading(msg);
                        });
                    }
                });
        });
    }
}

/// The fixed vertical layout of the page.
fn dashboard_page(ui: &mut Ui, view: &DashboardView, state: &AppState) {
    ui.heading("Galaxy physical parameters");
    ui.label(RichText::new(format!("Selected galaxies: {}", view.selected())).strong());
    ui.add_space(8.0);

    ui.heading("📈 Summary statistics");
    report::summary_table(ui, &view.summary);
    ui.add_space(12.0);

    ui.heading("🔍 Histogram");
    plot::histogram_plot(ui, &view.distribution);
    ui.add_space(12.0);

    let scatter_title = match view.variant {
        Variant::Explorer => "🌌 Scatter plot",
        Variant::GroupAnalysis => "🌌 Scatter plot + linear fit",
    };
    ui.heading(scatter_title);
    plot::scatter_plot(ui, &view.scatter, &state.group_colors);
    report::correlation_summary(ui, &view.scatter.correlation);
    ui.add_space(12.0);

    if view.variant == Variant::GroupAnalysis {
        ui.heading("🔎 Analysis by redshift group");
        report::group_breakdown(ui, &view.groups);
        ui.add_space(12.0);
    }

    if let Some(matrix) = &view.heatmap {
        ui.heading("Correlation heatmap");
        plot::heatmap(ui, matrix);
    }
}
