use super::groups::RedshiftGroup;

/// Columns every galaxy table must provide.
pub const REDSHIFT: &str = "redshift";
pub const STELLAR_MASS: &str = "Mstar";
pub const SFR: &str = "SFR";
pub const SSFR: &str = "sSFR";
pub const REQUIRED_COLUMNS: [&str; 4] = [REDSHIFT, STELLAR_MASS, SFR, SSFR];

/// Name of the derived group column written on export.
pub const GROUP_COLUMN: &str = "z_group";

// ---------------------------------------------------------------------------
// ColumnData – the values of one column
// ---------------------------------------------------------------------------

/// Column storage. Missing numeric cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Cell as CSV text. Floats use the shortest representation that parses
    /// back to the same value; missing values are empty.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(x) if !x.is_nan() => x.to_string(),
                _ => String::new(),
            },
            ColumnData::Text(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }
}

/// A named column of the galaxy table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }
}

// ---------------------------------------------------------------------------
// GalaxyTable – the complete loaded catalogue
// ---------------------------------------------------------------------------

/// The full parsed table. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyTable {
    /// Columns in file order.
    pub columns: Vec<Column>,
    /// Redshift group of every row, present only when classification ran.
    pub groups: Option<Vec<RedshiftGroup>>,
    n_rows: usize,
}

impl GalaxyTable {
    /// Build a table from equally long columns.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.data.len() == n_rows));
        GalaxyTable {
            columns,
            groups: None,
            n_rows,
        }
    }

    /// Attach the redshift group column. Rows without a redshift are out of range.
    pub fn with_redshift_groups(mut self) -> Self {
        let groups = match self.numeric(REDSHIFT) {
            Some(z) => RedshiftGroup::classify_all(z),
            None => vec![RedshiftGroup::OutOfRange; self.n_rows],
        };
        self.groups = Some(groups);
        self
    }

    pub fn without_redshift_groups(mut self) -> Self {
        self.groups = None;
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of a numeric column, `None` if absent or textual.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.data.as_numeric())
    }

    /// Names of the numeric columns, in file order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Columns written on export. A stored `z_group` column (from a file
    /// exported earlier) gives way to the freshly classified groups.
    pub fn export_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        let replaced = self.groups.is_some();
        self.columns
            .iter()
            .filter(move |c| !(replaced && c.name == GROUP_COLUMN))
    }

    /// Header of the table as exported (group column last, when present).
    pub fn export_header(&self) -> Vec<String> {
        let mut header: Vec<String> = self.export_columns().map(|c| c.name.clone()).collect();
        if self.groups.is_some() {
            header.push(GROUP_COLUMN.to_string());
        }
        header
    }

    pub fn group_of(&self, row: usize) -> Option<RedshiftGroup> {
        self.groups.as_ref().and_then(|g| g.get(row).copied())
    }

    /// View of the given rows.
    pub fn view(&self, rows: Vec<usize>) -> FilteredView<'_> {
        debug_assert!(rows.iter().all(|&r| r < self.n_rows));
        FilteredView { table: self, rows }
    }

    /// View of every row.
    #[cfg(test)]
    pub fn full_view(&self) -> FilteredView<'_> {
        self.view((0..self.n_rows).collect())
    }
}

// ---------------------------------------------------------------------------
// FilteredView – a row subset of the table
// ---------------------------------------------------------------------------

/// Rows of a [`GalaxyTable`] that passed the current filters.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a GalaxyTable,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn table(&self) -> &'a GalaxyTable {
        self.table
    }

    /// Row indices into the full table, ascending.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a numeric column restricted to the view.
    pub fn numeric(&self, name: &str) -> Option<Vec<f64>> {
        let values = self.table.numeric(name)?;
        Some(self.rows.iter().map(|&r| values[r]).collect())
    }

    /// Group of each row in the view, when the table carries groups.
    pub fn groups(&self) -> Option<Vec<RedshiftGroup>> {
        let groups = self.table.groups.as_ref()?;
        Some(self.rows.iter().map(|&r| groups[r]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GalaxyTable {
        GalaxyTable::from_columns(vec![
            Column::numeric(REDSHIFT, vec![0.01, 0.2, 0.1]),
            Column::numeric(STELLAR_MASS, vec![1e9, 1e10, f64::NAN]),
            Column::text("name", vec!["a".into(), "b".into(), "c".into()]),
        ])
    }

    #[test]
    fn numeric_lookup_skips_text_columns() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert!(table.numeric("name").is_none());
        assert!(table.numeric("missing").is_none());
        assert_eq!(table.numeric_column_names(), vec![REDSHIFT, STELLAR_MASS]);
    }

    #[test]
    fn view_projects_rows() {
        let table = sample();
        let view = table.view(vec![0, 2]);
        assert_eq!(view.numeric(REDSHIFT), Some(vec![0.01, 0.1]));
        assert!(view.groups().is_none());
    }

    #[test]
    fn groups_follow_redshift() {
        let table = sample().with_redshift_groups();
        assert_eq!(
            table.full_view().groups(),
            Some(vec![
                RedshiftGroup::Group1,
                RedshiftGroup::Group3,
                RedshiftGroup::Group2
            ])
        );
        assert_eq!(table.export_header().last().map(String::as_str), Some(GROUP_COLUMN));
    }

    #[test]
    fn cell_text_leaves_missing_empty() {
        let table = sample();
        let mass = &table.column(STELLAR_MASS).unwrap().data;
        assert_eq!(mass.cell_text(0), "1000000000");
        assert_eq!(mass.cell_text(2), "");
    }
}
