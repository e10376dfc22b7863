use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::dashboard::Controls;
use crate::data::filter::{SliderBounds, Variant};
use crate::export::DEFAULT_EXPORT_NAME;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(bounds), Some(current)) = (state.bounds, state.controls.as_ref()) else {
        ui.label("No dataset loaded.");
        return;
    };
    let columns = state
        .table
        .as_ref()
        .map(|t| t.numeric_column_names())
        .unwrap_or_default();
    let variant = state.variant();

    // Widgets edit a copy; the state re-renders only if it differs.
    let mut controls = current.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            range_sliders(ui, &mut controls, &bounds, variant);
            ui.separator();

            ui.strong("Histogram");
            column_combo(ui, "hist_column", "Parameter", &mut controls.histogram_column, &columns);
            ui.separator();

            ui.strong("Scatter plot");
            column_combo(ui, "x_column", "X axis", &mut controls.x_column, &columns);
            ui.checkbox(&mut controls.log_x, "Log scale for X");
            column_combo(ui, "y_column", "Y axis", &mut controls.y_column, &columns);
            ui.checkbox(&mut controls.log_y, "Log scale for Y");

            if variant == Variant::Explorer {
                ui.separator();
                ui.checkbox(&mut controls.show_heatmap, "Show correlation heatmap");
            }

            if variant == Variant::GroupAnalysis {
                ui.separator();
                if ui.button("📥 Export filtered CSV…").clicked() {
                    save_file_dialog(state);
                }
            }
        });

    state.set_controls(controls);
}

fn range_sliders(ui: &mut Ui, controls: &mut Controls, bounds: &SliderBounds, variant: Variant) {
    let ranges = &mut controls.ranges;

    ui.strong("Redshift");
    match variant {
        // The explorer filters on the lower redshift bound only.
        Variant::Explorer => {
            let (lo, hi) = bounds.redshift;
            ui.add(Slider::new(&mut ranges.redshift.0, lo..=hi).text("min"));
        }
        Variant::GroupAnalysis => range_pair(ui, &mut ranges.redshift, bounds.redshift),
    }

    ui.strong("log(M*)");
    range_pair(ui, &mut ranges.log_mass, bounds.log_mass);

    if variant == Variant::GroupAnalysis {
        ui.strong("SFR (M☉/yr)");
        range_pair(ui, &mut ranges.sfr, bounds.sfr);
    }
}

/// Two sliders editing a `(min, max)` selection; the other handle follows
/// when one is dragged past it.
fn range_pair(ui: &mut Ui, range: &mut (f64, f64), (lo, hi): (f64, f64)) {
    if ui.add(Slider::new(&mut range.0, lo..=hi).text("min")).changed() && range.0 > range.1 {
        range.1 = range.0;
    }
    if ui.add(Slider::new(&mut range.1, lo..=hi).text("max")).changed() && range.1 < range.0 {
        range.0 = range.1;
    }
}

fn column_combo(ui: &mut Ui, id: &str, label: &str, selected: &mut String, columns: &[String]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    ui.selectable_value(selected, col.clone(), col.as_str());
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.session.reset();
                state.load();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut variant = state.variant();
        for v in [Variant::Explorer, Variant::GroupAnalysis] {
            ui.selectable_value(&mut variant, v, v.title());
        }
        state.set_variant(variant);

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} galaxies loaded, {} selected",
                view.total,
                view.selected()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        if let Some(msg) = &state.export_message {
            ui.separator();
            ui.label(msg.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open galaxy table")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered galaxies")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
