use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value as JsonValue};

use super::model::{FormulaTable, MetadataValue};

/// Write a (filtered) formula table back out, in the column order it was
/// loaded with. Dispatch by extension: `.csv` or `.json`.
pub fn save_file(table: &FormulaTable, path: &Path, formula_column: &str) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let writer = csv::Writer::from_path(path).context("creating CSV")?;
            write_csv(table, writer, formula_column)
        }
        "json" => {
            let json = serde_json::to_string_pretty(&to_json(table, formula_column))?;
            std::fs::write(path, json).context("writing JSON file")
        }
        other => bail!("Unsupported output extension: .{other}"),
    }
    .with_context(|| format!("saving {}", path.display()))
}

pub(crate) fn write_csv<W: std::io::Write>(
    table: &FormulaTable,
    mut writer: csv::Writer<W>,
    formula_column: &str,
) -> Result<()> {
    writer.write_record(&table.column_names)?;
    for record in &table.table.records {
        let cells = table.column_names.iter().map(|col| {
            if col == formula_column {
                record.formula.clone().unwrap_or_default()
            } else {
                record
                    .payload
                    .get(col)
                    .map(MetadataValue::to_string)
                    .unwrap_or_default()
            }
        });
        writer.write_record(cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// Records-oriented JSON, the shape `load_file` reads.
pub(crate) fn to_json(table: &FormulaTable, formula_column: &str) -> JsonValue {
    let rows = table
        .table
        .records
        .iter()
        .map(|record| {
            let mut obj = Map::new();
            for col in &table.column_names {
                let value = if col == formula_column {
                    record
                        .formula
                        .clone()
                        .map(JsonValue::String)
                        .unwrap_or(JsonValue::Null)
                } else {
                    match record.payload.get(col) {
                        Some(v) => JsonValue::from(v),
                        None => continue,
                    }
                };
                obj.insert(col.clone(), value);
            }
            JsonValue::Object(obj)
        })
        .collect();
    JsonValue::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, records_from_csv};
    use serde_json::json;

    fn sample() -> FormulaTable {
        let data = "material_id,formula,band_gap\nmp-1,MgO,7.8\nmp-2,ZnO,\n";
        records_from_csv(csv::Reader::from_reader(data.as_bytes()), "formula").unwrap()
    }

    #[test]
    fn test_write_csv_keeps_column_order() {
        let mut out = Vec::new();
        write_csv(&sample(), csv::Writer::from_writer(&mut out), "formula").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "material_id,formula,band_gap\nmp-1,MgO,7.8\nmp-2,ZnO,\n");
    }

    #[test]
    fn test_to_json() {
        let value = to_json(&sample(), "formula");
        assert_eq!(
            value,
            json!([
                { "material_id": "mp-1", "formula": "MgO", "band_gap": "7.8" },
                { "material_id": "mp-2", "formula": "ZnO", "band_gap": null }
            ])
        );
    }

    #[test]
    fn test_save_and_reload_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_file(&sample(), &path, "formula").unwrap();
        let reloaded = load_file(&path, "formula").unwrap();
        assert_eq!(reloaded.table.formulas(), vec!["MgO", "ZnO"]);
        assert_eq!(
            reloaded.table.records[0].payload.get("band_gap"),
            Some(&MetadataValue::String("7.8".to_string()))
        );
        assert_eq!(reloaded.column_names, vec!["formula", "material_id", "band_gap"]);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let text = serde_json::to_string(&to_json(&sample(), "formula")).unwrap();
        assert!(text.starts_with(r#"[{"material_id":"mp-1","formula":"MgO","band_gap":"7.8"}"#));
    }

    #[test]
    fn test_csv_survives_filtering_byte_for_byte() {
        use crate::data::filter::{FilterOptions, FilterPipeline};
        use crate::report::NullReporter;

        let data = "formula,material_id,band_gap,note\n\
                    MgO,007,1.50,1e3\n\
                    NaNO3,008,4.20,\n\
                    ZnO,0012,3.40,\"a, b\"\n";
        let loaded =
            records_from_csv(csv::Reader::from_reader(data.as_bytes()), "formula").unwrap();
        let outcome = FilterPipeline::default()
            .run(loaded.table, &FilterOptions::default(), &mut NullReporter)
            .unwrap();
        let filtered = FormulaTable {
            table: outcome.table,
            column_names: loaded.column_names,
        };

        let mut out = Vec::new();
        write_csv(&filtered, csv::Writer::from_writer(&mut out), "formula").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "formula,material_id,band_gap,note\nMgO,007,1.50,1e3\nZnO,0012,3.40,\"a, b\"\n"
        );

        let unfiltered = records_from_csv(
            csv::Reader::from_reader("formula,id\nMgO,007\n".as_bytes()),
            "formula",
        )
        .unwrap();
        let mut out = Vec::new();
        write_csv(&unfiltered, csv::Writer::from_writer(&mut out), "formula").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "formula,id\nMgO,007\n");
    }

    #[test]
    fn test_unsupported_output() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_file(&sample(), &dir.path().join("out.parquet"), "formula").is_err());
    }
}
