use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{
    Dataset, LaunchRecord, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION, COL_FLIGHT_NUMBER,
    COL_OUTCOME, COL_PAYLOAD, COL_SITE, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per line (the usual export)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – same column names, numeric payload/class columns
///
/// Any failure here is fatal for the dashboard: it never starts without data.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading launch records from {}", path.display()))?;

    Ok(Dataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Launch Site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "class")]
    class: f64,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<LaunchRecord, DataError> {
        Ok(LaunchRecord::from_raw(
            row,
            self.site,
            self.payload_mass_kg,
            self.class,
            self.booster_category,
        )?
        .with_flight_number(self.flight_number)
        .with_booster_version(self.booster_version))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored.
/// Rows are numbered from 1 (the first line after the header) in errors.
fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row = idx + 1;
        let raw = result.map_err(|e| DataError::invalid_row(row, e.to_string()))?;
        records.push(raw.into_record(row)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Flight Number": 1,
///     "Launch Site": "CCAFS LC-40",
///     "class": 0,
///     "Payload Mass (kg)": 0.0,
///     "Booster Version": "F9 v1.0  B0003",
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = match root {
        JsonValue::Array(rows) => rows,
        _ => anyhow::bail!("Expected top-level JSON array"),
    };

    let mut records = Vec::with_capacity(rows.len());
    for (idx, value) in rows.into_iter().enumerate() {
        let row = idx + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| DataError::invalid_row(row, "not a JSON object"))?;
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !obj.contains_key(**c)) {
            return Err(DataError::MissingColumn(missing.to_string()).into());
        }

        let raw: RawRecord =
            serde_json::from_value(value).map_err(|e| DataError::invalid_row(row, e.to_string()))?;
        records.push(raw.into_record(row)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the launch columns.
///
/// Payload and class may be stored as any of Float64/Float32/Int64/Int32
/// (class may also be Boolean); sites and categories as Utf8 or LargeUtf8.
/// Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, &mut records)?;
    }

    Ok(records)
}

fn read_batch(batch: &RecordBatch, out: &mut Vec<LaunchRecord>) -> Result<(), DataError> {
    let site_col = required_column(batch, COL_SITE)?;
    let payload_col = required_column(batch, COL_PAYLOAD)?;
    let class_col = required_column(batch, COL_OUTCOME)?;
    let category_col = required_column(batch, COL_BOOSTER_CATEGORY)?;
    let flight_col = column(batch, COL_FLIGHT_NUMBER);
    let version_col = column(batch, COL_BOOSTER_VERSION);

    for i in 0..batch.num_rows() {
        let row = out.len() + 1;
        let cell_error = |col: &str| DataError::invalid_row(row, format!("missing or non-{col} value"));

        let site = string_cell(site_col, i).ok_or_else(|| cell_error("string site"))?;
        let payload = numeric_cell(payload_col, i).ok_or_else(|| cell_error("numeric payload"))?;
        let class = numeric_cell(class_col, i).ok_or_else(|| cell_error("numeric class"))?;
        let category =
            string_cell(category_col, i).ok_or_else(|| cell_error("string booster category"))?;

        let flight_number = flight_col
            .and_then(|c| numeric_cell(c, i))
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32);
        let booster_version = version_col.and_then(|c| string_cell(c, i));

        let record = LaunchRecord::from_raw(row, site, payload, class, category)?
            .with_flight_number(flight_number)
            .with_booster_version(booster_version);
        out.push(record);
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a ArrayRef> {
    batch.schema().index_of(name).ok().map(|i| batch.column(i))
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, DataError> {
    column(batch, name).ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// Read a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn numeric_cell(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| if a.value(row) { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Read a string cell; `None` for nulls and non-string columns.
fn string_cell(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any.downcast_ref::<StringArray>().map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use crate::data::model::Outcome;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn data_error(err: &anyhow::Error) -> Option<&DataError> {
        err.chain().find_map(|e| e.downcast_ref::<DataError>())
    }

    const CSV_OK: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,1,525.0,F9 v1.0  B0005,v1.0
2,3,VAFB SLC-4E,1,9600.0,F9 FT B1036.1,FT
";

    #[test]
    fn test_load_csv() {
        let file = write_temp(".csv", CSV_OK);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites(), ["CCAFS LC-40".to_string(), "VAFB SLC-4E".to_string()]);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 9600.0);

        let last = &ds.records()[2];
        assert_eq!(last.outcome, Outcome::Success);
        assert_eq!(last.flight_number, Some(3));
        assert_eq!(last.booster_version.as_deref(), Some("F9 FT B1036.1"));
        assert_eq!(last.booster_category, "FT");
    }

    #[test]
    fn test_csv_without_optional_columns() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,2000,1,FT\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records()[0].flight_number, None);
        assert_eq!(ds.records()[0].booster_version, None);
    }

    #[test]
    fn test_csv_missing_column_is_fatal() {
        let file = write_temp(".csv", "Launch Site,class,Booster Version Category\nA,1,FT\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            data_error(&err),
            Some(&DataError::MissingColumn("Payload Mass (kg)".to_string()))
        );
    }

    #[test]
    fn test_csv_malformed_row_is_fatal() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nA,2000,1,FT\nB,heavy,0,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(data_error(&err), Some(DataError::InvalidRow { row: 2, .. })));
    }

    #[test]
    fn test_csv_header_only_is_empty() {
        let file = write_temp(".csv", "Launch Site,Payload Mass (kg),class,Booster Version Category\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(data_error(&err), Some(&DataError::Empty));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            data_error(&err),
            Some(&DataError::UnsupportedFormat("xlsx".to_string()))
        );
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(
            ".json",
            r#"[
                {"Flight Number": 4, "Launch Site": "KSC LC-39A", "class": 1,
                 "Payload Mass (kg)": 2490.0, "Booster Version": null,
                 "Booster Version Category": "FT"},
                {"Launch Site": "KSC LC-39A", "class": 0.0,
                 "Payload Mass (kg)": 5300, "Booster Version Category": "B4"}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].flight_number, Some(4));
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.max_payload(), 5300.0);
    }

    #[test]
    fn test_json_missing_column() {
        let file = write_temp(".json", r#"[{"Launch Site": "A", "class": 1, "Payload Mass (kg)": 1.0}]"#);
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            data_error(&err),
            Some(&DataError::MissingColumn("Booster Version Category".to_string()))
        );
    }

    #[test]
    fn test_json_rejects_bad_class() {
        let file = write_temp(
            ".json",
            r#"[{"Launch Site": "A", "class": 3, "Payload Mass (kg)": 1.0, "Booster Version Category": "FT"}]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(data_error(&err), Some(DataError::InvalidRow { row: 1, .. })));
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_OUTCOME, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_FLIGHT_NUMBER, DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "A", "B"])),
                Arc::new(Float64Array::from(vec![2000.0, 5000.0, 3000.0])),
                Arc::new(Int64Array::from(vec![1, 0, 1])),
                Arc::new(StringArray::from(vec!["v1.1", "FT", "FT"])),
                Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites(), ["A".to_string(), "B".to_string()]);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.records()[1].flight_number, None);
        assert_eq!(ds.records()[2].flight_number, Some(3));
    }

    #[test]
    fn test_parquet_missing_column() {
        let schema = Arc::new(Schema::new(vec![Field::new(COL_SITE, DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["A"])) as ArrayRef],
        )
        .unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            data_error(&err),
            Some(&DataError::MissingColumn(COL_PAYLOAD.to_string()))
        );
    }
}
