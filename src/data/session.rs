use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::filter::Variant;
use super::loader::{load_file, LoadError};
use super::model::GalaxyTable;

// ---------------------------------------------------------------------------
// DataSession – the once-loaded, read-only table handle
// ---------------------------------------------------------------------------

/// Owns the table for one session: loaded on first access, shared read-only
/// afterwards, dropped by [`DataSession::reset`].
#[derive(Debug)]
pub struct DataSession {
    path: PathBuf,
    variant: Variant,
    table: Option<Arc<GalaxyTable>>,
}

impl DataSession {
    pub fn new(path: impl Into<PathBuf>, variant: Variant) -> Self {
        DataSession {
            path: path.into(),
            variant,
            table: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The session table, reading the file only on the first call.
    pub fn table(&mut self) -> Result<Arc<GalaxyTable>, LoadError> {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(&self.path, self.variant)?);
        log::info!(
            "Loaded {} galaxies with {} columns from {}",
            table.len(),
            table.columns.len(),
            self.path.display()
        );
        if table.is_empty() {
            log::warn!("{} contains no rows", self.path.display());
        }
        self.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Switch variant without touching the file: the cached table gains or
    /// loses its redshift groups.
    pub fn set_variant(&mut self, variant: Variant) {
        if variant == self.variant {
            return;
        }
        self.variant = variant;
        if let Some(table) = self.table.take() {
            let table = Arc::unwrap_or_clone(table);
            let table = if variant.uses_groups() {
                table.with_redshift_groups()
            } else {
                table.without_redshift_groups()
            };
            self.table = Some(Arc::new(table));
        }
    }

    /// Drop the cached table; the next [`DataSession::table`] call reloads.
    pub fn reset(&mut self) {
        self.table = None;
    }
}
