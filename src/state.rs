use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::GroupColors;
use crate::config::DashboardConfig;
use crate::dashboard::{render, Controls, DashboardView};
use crate::data::filter::{SliderBounds, Variant};
use crate::data::model::GalaxyTable;
use crate::data::session::DataSession;
use crate::export;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Source of the table; owns the once-loaded copy.
    pub session: DataSession,

    /// Shared handle to the loaded table (None until a load succeeds).
    pub table: Option<Arc<GalaxyTable>>,

    /// Slider extents of the loaded table.
    pub bounds: Option<SliderBounds>,

    /// Current widget values.
    pub controls: Option<Controls>,

    /// Page computed from `table` and `controls` (cached between repaints).
    pub view: Option<DashboardView>,

    /// Colours of the redshift groups.
    pub group_colors: GroupColors,

    /// Load error shown in the UI.
    pub status_message: Option<String>,

    /// Outcome of the last export.
    pub export_message: Option<String>,

    default_log_mass: (f64, f64),
    histogram_bins: usize,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            session: DataSession::new(&config.data_path, config.variant),
            table: None,
            bounds: None,
            controls: None,
            view: None,
            group_colors: GroupColors::default(),
            status_message: None,
            export_message: None,
            default_log_mass: config.default_log_mass,
            histogram_bins: config.histogram_bins,
        }
    }

    pub fn variant(&self) -> Variant {
        self.session.variant()
    }

    /// Load the session table (first call reads the file).
    pub fn load(&mut self) {
        match self.session.table() {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.session.path().display());
                self.status_message = Some(format!("Error: {e}"));
                self.table = None;
                self.bounds = None;
                self.controls = None;
                self.view = None;
            }
        }
    }

    /// Start a new session on another file.
    pub fn open_path(&mut self, path: PathBuf) {
        self.session = DataSession::new(path, self.variant());
        self.load();
    }

    /// Ingest a newly loaded table, initialise the controls and render.
    pub fn set_table(&mut self, table: Arc<GalaxyTable>) {
        let bounds = SliderBounds::from_table(&table);
        let mut controls = Controls::defaults(&table, &bounds, self.default_log_mass);
        controls.histogram_bins = self.histogram_bins;

        self.table = Some(table);
        self.bounds = Some(bounds);
        self.controls = Some(controls);
        self.status_message = None;
        self.export_message = None;
        self.refresh();
    }

    /// Switch dashboard variant, keeping the widget values.
    pub fn set_variant(&mut self, variant: Variant) {
        if variant == self.variant() {
            return;
        }
        self.session.set_variant(variant);
        if self.table.is_some() {
            match self.session.table() {
                Ok(table) => self.table = Some(table),
                Err(e) => self.status_message = Some(format!("Error: {e}")),
            }
        }
        self.refresh();
    }

    /// Apply new widget values; re-renders only when something changed.
    pub fn set_controls(&mut self, controls: Controls) {
        if self.controls.as_ref() == Some(&controls) {
            return;
        }
        self.controls = Some(controls);
        self.refresh();
    }

    /// Recompute the page from the table and the current controls.
    pub fn refresh(&mut self) {
        self.view = match (&self.table, &self.controls) {
            (Some(table), Some(controls)) => Some(render(table, self.variant(), controls)),
            _ => None,
        };
    }

    /// Write the currently displayed rows to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let (Some(table), Some(view)) = (&self.table, &self.view) else {
            return;
        };
        let rows = table.view(view.rows.clone());
        self.export_message = Some(match export::save_csv(&rows, path) {
            Ok(()) => format!("Exported {} galaxies to {}", rows.len(), path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Export failed: {e:#}")
            }
        });
    }
}
