use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::Variant;
use crate::stats::distribution::DEFAULT_BINS;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "GALAXY_EXPLORER_CONFIG";
/// Environment override of the data path.
pub const DATA_ENV: &str = "GALAXY_EXPLORER_DATA";
/// Environment override of the dashboard variant (`explorer` / `group_analysis`).
pub const VARIANT_ENV: &str = "GALAXY_EXPLORER_VARIANT";

/// Start-up settings of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub variant: Variant,
    pub histogram_bins: usize,
    /// Initial log10(M*) selection, clamped into the data range.
    pub default_log_mass: (f64, f64),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("analisis_galaxias.csv"),
            variant: Variant::default(),
            histogram_bins: DEFAULT_BINS,
            default_log_mass: (8.0, 11.5),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON configuration file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Defaults ← config file from [`CONFIG_ENV`] ← [`DATA_ENV`] / [`VARIANT_ENV`]
    /// ← first command-line argument (data path).
    pub fn resolve(args: &[String]) -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(DATA_ENV).ok().as_deref(),
            std::env::var(VARIANT_ENV).ok().as_deref(),
        );
        if let Some(path) = args.first() {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }

    fn apply_overrides(&mut self, data: Option<&str>, variant: Option<&str>) {
        if let Some(data) = data.filter(|d| !d.is_empty()) {
            self.data_path = PathBuf::from(data);
        }
        if let Some(raw) = variant {
            match parse_variant(raw) {
                Some(v) => self.variant = v,
                None => log::warn!("Ignoring unknown {VARIANT_ENV} value '{raw}'"),
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.histogram_bins == 0 {
            log::warn!("histogram_bins must be positive, using {DEFAULT_BINS}");
            self.histogram_bins = DEFAULT_BINS;
        }
        let (lo, hi) = self.default_log_mass;
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            log::warn!("Invalid default_log_mass ({lo}, {hi}), using defaults");
            self.default_log_mass = Self::default().default_log_mass;
        }
        self
    }
}

fn parse_variant(raw: &str) -> Option<Variant> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase())).ok()
}
