use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::filter::Variant;
use super::model::{Column, ColumnData, GalaxyTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a table could not be loaded. Always fatal for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("required column '{0}' is not numeric")]
    NonNumericColumn(String),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    fn parse(path: &Path, message: impl ToString) -> Self {
        LoadError::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    fn access(path: &Path, source: std::io::Error) -> Self {
        LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a galaxy table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one galaxy per line (the catalogue format)
/// * `.json`    – `[{ "redshift": 0.02, "Mstar": 1.2e10, ... }, ...]`
/// * `.parquet` – flat numeric / string columns
///
/// The group analysis variant classifies redshifts during the load.
pub fn load_file(path: &Path, variant: Variant) -> Result<GalaxyTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    validate(&table)?;

    Ok(if variant.uses_groups() {
        table.with_redshift_groups()
    } else {
        table
    })
}

fn validate(table: &GalaxyTable) -> Result<(), LoadError> {
    for name in REQUIRED_COLUMNS {
        match table.column(name) {
            None => return Err(LoadError::MissingColumn(name.to_string())),
            Some(col) if !col.is_numeric() => {
                return Err(LoadError::NonNumericColumn(name.to_string()))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one galaxy per record.
/// A column is numeric when every non-blank cell parses as a float
/// (surrounding whitespace ignored); blank cells in numeric columns are
/// missing values. Text cells are kept as written.
fn load_csv(path: &Path) -> Result<GalaxyTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::access(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::parse(path, format!("reading headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::parse(path, format!("row {row_no}: {e}")))?;
        for (col, value) in record.iter().enumerate() {
            cells[col].push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column {
            name,
            data: infer_column(values),
        })
        .collect();

    Ok(GalaxyTable::from_columns(columns))
}

fn infer_column(values: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|s| {
            let s = s.trim();
            if s.is_empty() {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(numbers) => ColumnData::Numeric(numbers),
        None => ColumnData::Text(values),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "redshift": 0.021, "Mstar": 3.1e10, "SFR": 1.4, "sSFR": 4.5e-11 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys; absent keys and `null` are missing.
fn load_json(path: &Path) -> Result<GalaxyTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::access(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| LoadError::parse(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::parse(path, "expected top-level JSON array"))?;

    let mut raw: BTreeMap<String, Vec<Option<JsonValue>>> = BTreeMap::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            raw.entry(key.clone())
                .or_insert_with(|| vec![None; i]);
        }
        for (key, values) in raw.iter_mut() {
            values.push(obj.get(key).cloned());
        }
    }

    let columns = raw
        .into_iter()
        .map(|(name, values)| Column {
            name,
            data: json_column(values),
        })
        .collect();

    Ok(GalaxyTable::from_columns(columns))
}

fn json_column(values: Vec<Option<JsonValue>>) -> ColumnData {
    let all_numeric = values
        .iter()
        .all(|v| matches!(v, None | Some(JsonValue::Null) | Some(JsonValue::Number(_))));

    if all_numeric {
        ColumnData::Numeric(
            values
                .iter()
                .map(|v| v.as_ref().and_then(JsonValue::as_f64).unwrap_or(f64::NAN))
                .collect(),
        )
    } else {
        ColumnData::Text(
            values
                .into_iter()
                .map(|v| match v {
                    None | Some(JsonValue::Null) => String::new(),
                    Some(JsonValue::String(s)) => s,
                    Some(other) => other.to_string(),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per parameter.
///
/// Integer and float columns become numeric (nulls are missing); every
/// other type is read as text. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<GalaxyTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::access(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| LoadError::parse(path, format!("reading parquet metadata: {e}")))?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| LoadError::parse(path, format!("building parquet reader: {e}")))?;

    let mut data: Vec<Option<ColumnData>> = vec![None; names.len()];

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| LoadError::parse(path, format!("reading record batch: {e}")))?;
        for (idx, slot) in data.iter_mut().enumerate() {
            let chunk = arrow_column(batch.column(idx))
                .map_err(|e| LoadError::parse(path, format!("column '{}': {e}", names[idx])))?;
            let merged = match (slot.take(), chunk) {
                (None, chunk) => chunk,
                (Some(ColumnData::Numeric(mut acc)), ColumnData::Numeric(more)) => {
                    acc.extend(more);
                    ColumnData::Numeric(acc)
                }
                (Some(ColumnData::Text(mut acc)), ColumnData::Text(more)) => {
                    acc.extend(more);
                    ColumnData::Text(acc)
                }
                (Some(_), _) => {
                    return Err(LoadError::parse(
                        path,
                        format!("column '{}' changes type between batches", names[idx]),
                    ))
                }
            };
            *slot = Some(merged);
        }
    }

    let columns = names
        .into_iter()
        .zip(data)
        .map(|(name, values)| Column {
            name,
            data: values.unwrap_or(ColumnData::Numeric(Vec::new())),
        })
        .collect();

    Ok(GalaxyTable::from_columns(columns))
}

/// Convert one Arrow array to column storage.
fn arrow_column(col: &ArrayRef) -> Result<ColumnData, arrow::error::ArrowError> {
    if col.data_type().is_numeric() {
        let floats = cast(col.as_ref(), &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        Ok(ColumnData::Numeric(
            floats.iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        ))
    } else {
        let strings = cast(col.as_ref(), &DataType::Utf8)?;
        let strings = strings.as_string::<i32>();
        Ok(ColumnData::Text(
            (0..strings.len())
                .map(|i| {
                    if strings.is_null(i) {
                        String::new()
                    } else {
                        strings.value(i).to_string()
                    }
                })
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::groups::RedshiftGroup;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const CSV: &str = "\
name,redshift,Mstar,SFR,sSFR,metallicity
a,0.01,1e9,0.5,5e-10,8.7
b,0.2,1e10,5.0,5e-10,
";

    #[test]
    fn loads_csv_with_mixed_columns() {
        let file = write_temp(".csv", CSV);
        let table = load_file(file.path(), Variant::Explorer).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.column("name").unwrap().is_numeric());
        assert_eq!(table.numeric("Mstar"), Some(&[1e9, 1e10][..]));
        let metallicity = table.numeric("metallicity").unwrap();
        assert_eq!(metallicity[0], 8.7);
        assert!(metallicity[1].is_nan());
        assert!(table.groups.is_none());
    }

    #[test]
    fn text_cells_keep_their_spaces() {
        let file = write_temp(
            ".csv",
            "name,redshift,Mstar,SFR,sSFR\n  NGC 7 ,0.01, 1e9 ,0.5,5e-10\n",
        );
        let table = load_file(file.path(), Variant::Explorer).unwrap();
        assert_eq!(table.numeric("Mstar"), Some(&[1e9][..]));
        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Text(vec!["  NGC 7 ".to_string()])
        );
    }

    #[test]
    fn group_variant_classifies_on_load() {
        let file = write_temp(".csv", CSV);
        let table = load_file(file.path(), Variant::GroupAnalysis).unwrap();
        assert_eq!(
            table.groups,
            Some(vec![RedshiftGroup::Group1, RedshiftGroup::Group3])
        );
    }

    #[test]
    fn missing_file_is_access_error() {
        let err = load_file(Path::new("/definitely/not/here.csv"), Variant::Explorer).unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
    }

    #[test]
    fn ragged_csv_is_parse_error() {
        let file = write_temp(".csv", "redshift,Mstar,SFR,sSFR\n0.1,1e9,1\n");
        let err = load_file(file.path(), Variant::Explorer).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{err}");
    }

    #[test]
    fn required_columns_are_checked() {
        let file = write_temp(".csv", "redshift,Mstar,SFR\n0.1,1e9,1\n");
        let err = load_file(file.path(), Variant::Explorer).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "sSFR"));

        let file = write_temp(".csv", "redshift,Mstar,SFR,sSFR\nx,1e9,1,1\n");
        let err = load_file(file.path(), Variant::Explorer).unwrap_err();
        assert!(matches!(err, LoadError::NonNumericColumn(ref c) if c == "redshift"));
    }

    #[test]
    fn unsupported_extension() {
        let file = write_temp(".txt", CSV);
        let err = load_file(file.path(), Variant::Explorer).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref e) if e == "txt"));
    }

    #[test]
    fn loads_parquet_columns() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("redshift", DataType::Float64, false),
            Field::new("Mstar", DataType::Float64, false),
            Field::new("SFR", DataType::Float64, true),
            Field::new("sSFR", DataType::Float64, false),
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![0.01, 0.2])) as ArrayRef,
                Arc::new(Float64Array::from(vec![1e9, 1e10])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(0.5), None])) as ArrayRef,
                Arc::new(Float64Array::from(vec![5e-10, 5e-10])) as ArrayRef,
                Arc::new(Int64Array::from(vec![7, 8])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path(), Variant::GroupAnalysis).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.numeric("id"), Some(&[7.0, 8.0][..]));
        assert!(table.numeric("SFR").unwrap()[1].is_nan());
        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Text(vec!["a".into(), String::new()])
        );
        assert_eq!(table.group_of(1), Some(RedshiftGroup::Group3));
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[
                {"redshift": 0.01, "Mstar": 1e9, "SFR": 0.5, "sSFR": 5e-10, "id": "g1"},
                {"redshift": 0.2, "Mstar": 1e10, "SFR": null, "sSFR": 5e-10}
            ]"#,
        );
        let table = load_file(file.path(), Variant::Explorer).unwrap();
        assert_eq!(table.len(), 2);
        let sfr = table.numeric("SFR").unwrap();
        assert_eq!(sfr[0], 0.5);
        assert!(sfr[1].is_nan());
        assert_eq!(
            table.column("id").unwrap().data,
            ColumnData::Text(vec!["g1".into(), String::new()])
        );
    }
}
