//! CSV loading for subtraction inputs.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{SubtractError, SubtractResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Load a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type; empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> SubtractResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Load CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> SubtractResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(SubtractError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let row = schema
            .fields
            .iter()
            .zip(col_idxs.iter())
            .map(|(field, &csv_idx)| {
                let raw = record.get(csv_idx).unwrap_or("");
                parse_typed_value(user_row, &field.name, field.data_type, raw)
            })
            .collect::<SubtractResult<Vec<Value>>>()?;
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Deserialize every record of a CSV file into `T`, matching struct fields to headers.
///
/// ```no_run
/// use keyed_subtract::ingestion::csv::read_rows_from_path;
/// use keyed_subtract::row::SingleValueRow;
///
/// # fn main() -> Result<(), keyed_subtract::SubtractError> {
/// let rows: Vec<SingleValueRow> = read_rows_from_path("opening.csv")?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn read_rows_from_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> SubtractResult<Vec<T>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_rows(rdr)
}

/// Deserialize every record from `reader` into `T`. The first line must be a header.
pub fn read_rows_from_reader<T: DeserializeOwned, R: Read>(reader: R) -> SubtractResult<Vec<T>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_rows(rdr)
}

fn collect_rows<T: DeserializeOwned, R: Read>(mut rdr: csv::Reader<R>) -> SubtractResult<Vec<T>> {
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        out.push(record?);
    }
    Ok(out)
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> SubtractResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| SubtractError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
