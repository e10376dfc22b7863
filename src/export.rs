use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::FilteredView;

/// Default file name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_galaxies.csv";

/// Write the rows of the view as CSV: the table header (plus the group
/// column when groups exist) followed by exactly the view's rows.
pub fn write_csv<W: io::Write>(view: &FilteredView<'_>, writer: W) -> Result<(), csv::Error> {
    let table = view.table();
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.export_header())?;

    for &row in view.rows() {
        let mut record: Vec<String> = table
            .export_columns()
            .map(|c| c.data.cell_text(row))
            .collect();
        if let Some(group) = table.group_of(row) {
            record.push(group.label().to_string());
        }
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Save the view to `path`.
pub fn save_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, io::BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} galaxies to {}", view.len(), path.display());
    Ok(())
}
