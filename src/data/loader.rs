use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FormulaTable, Metadata, MetadataValue, RecordTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a formula table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with a Utf8 formula column
/// * `.json`    – `[{ "formula": "Fe2O3", ...meta }, ...]`
/// * `.csv`     – header row, one column holding formulas
///
/// The formula column must exist; an empty or null cell in it is kept as a
/// missing formula and left for the filter to report.
pub fn load_file(path: &Path, formula_column: &str) -> Result<FormulaTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, formula_column),
        "json" => load_json(path, formula_column),
        "csv" => load_csv(path, formula_column),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    debug!(
        "loaded {} rows, columns {:?} from {}",
        table.len(),
        table.column_names,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "formula": "Fe2O3", "material_id": "mp-19770", "band_gap": 2.1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path, formula_column: &str) -> Result<FormulaTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    records_from_json(&root, formula_column)
}

pub(crate) fn records_from_json(root: &JsonValue, formula_column: &str) -> Result<FormulaTable> {
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut column_names = vec![formula_column.to_string()];
    let mut rows = Vec::with_capacity(records.len());
    let mut saw_formula = records.is_empty();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let formula = match obj.get(formula_column) {
            Some(JsonValue::String(s)) => {
                saw_formula = true;
                non_blank(s)
            }
            Some(JsonValue::Null) => {
                saw_formula = true;
                None
            }
            Some(other) => bail!("Row {i}: '{formula_column}' is not a string: {other}"),
            None => None,
        };

        let mut metadata = Metadata::new();
        for (key, val) in obj {
            if key == formula_column {
                continue;
            }
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
            metadata.insert(key.clone(), json_to_metadata(val));
        }

        rows.push((formula, metadata));
    }

    if !saw_formula {
        bail!("JSON records have no '{formula_column}' field");
    }

    Ok(FormulaTable {
        table: RecordTable::from_rows(rows),
        column_names,
    })
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                MetadataValue::Float(f)
            } else {
                MetadataValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

fn non_blank(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one of which holds formulas.
/// All other columns are carried as metadata, verbatim.
fn load_csv(path: &Path, formula_column: &str) -> Result<FormulaTable> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    records_from_csv(reader, formula_column)
}

pub(crate) fn records_from_csv<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    formula_column: &str,
) -> Result<FormulaTable> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let formula_idx = headers
        .iter()
        .position(|h| h == formula_column)
        .with_context(|| format!("CSV missing '{formula_column}' column"))?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let formula = record.get(formula_idx).and_then(non_blank);

        let mut metadata = Metadata::new();
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == formula_idx {
                continue;
            }
            let col_name = &headers[col_idx];
            metadata.insert(col_name.clone(), csv_cell(value));
        }

        rows.push((formula, metadata));
    }

    Ok(FormulaTable {
        table: RecordTable::from_rows(rows),
        column_names: headers,
    })
}

/// CSV cells stay as their raw text so they are written back unchanged
/// (`007` must not become `7`); only empty cells become `Null`.
fn csv_cell(s: &str) -> MetadataValue {
    if s.is_empty() {
        MetadataValue::Null
    } else {
        MetadataValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of formula records.
///
/// Expected schema:
/// - formula column: Utf8 or LargeUtf8
/// - Any other columns are treated as metadata (strings, ints, floats, bools)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, formula_column: &str) -> Result<FormulaTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let formula_idx = schema
            .index_of(formula_column)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{formula_column}' column"))?;
        let formula_col = batch.column(formula_idx);

        let meta_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != formula_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let formula = extract_string(formula_col, row)
                .with_context(|| format!("Row {row}: failed to read '{formula_column}'"))?;

            let mut metadata = Metadata::new();
            for (col_idx, col_name) in &meta_cols {
                let value = extract_metadata_value(batch.column(*col_idx), row);
                metadata.insert(col_name.clone(), value);
            }

            rows.push((formula, metadata));
        }
    }

    Ok(FormulaTable {
        table: RecordTable::from_rows(rows),
        column_names,
    })
}

// -- Parquet / Arrow helpers --

/// Read a string cell; nulls and blanks become `None`.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        other => bail!("Expected Utf8 formula column, got {other:?}"),
    };
    Ok(non_blank(value))
}

/// Extract a single metadata value from an Arrow column at a given row.
fn extract_metadata_value(col: &Arc<dyn Array>, row: usize) -> MetadataValue {
    if col.is_null(row) {
        return MetadataValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => MetadataValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => {
            MetadataValue::String(col.as_string::<i64>().value(row).to_string())
        }
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| MetadataValue::Integer(a.value(row) as i64))
            .unwrap_or(MetadataValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| MetadataValue::Integer(a.value(row)))
            .unwrap_or(MetadataValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| MetadataValue::Float(a.value(row) as f64))
            .unwrap_or(MetadataValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| MetadataValue::Float(a.value(row)))
            .unwrap_or(MetadataValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| MetadataValue::Bool(a.value(row)))
            .unwrap_or(MetadataValue::Null),
        other => MetadataValue::String(format!("{other:?}")),
    }
}
