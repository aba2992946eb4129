use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (formula, band gap in eV) — a mix of clean oxides, oxyanion salts and
/// non-oxides, enough to exercise every filter stage.
const SAMPLES: &[(&str, f64)] = &[
    ("Fe2O3", 2.1),
    ("MgO", 7.8),
    ("ZnO", 3.4),
    ("TiO2", 3.0),
    ("Al2O3", 8.8),
    ("BaTiO3", 3.2),
    ("LiCoO2", 2.7),
    ("FePO4", 3.7),
    ("Ca3(AsO4)2", 4.5),
    ("SiO2", 8.9),
    ("NaNO3", 4.2),
    ("KNO2", 3.5),
    ("CaCO3", 6.0),
    ("BaSO4", 7.6),
    ("Li3PO4", 5.9),
    ("Na2SO3", 4.8),
    ("NaCl", 8.5),
    ("GaAs", 1.4),
    ("Ca(OH)2", 5.6),
    ("CuSO4·5H2O", 3.1),
];

fn main() {
    let formulas = StringArray::from(SAMPLES.iter().map(|(f, _)| *f).collect::<Vec<_>>());
    let ids: Vec<String> = (0..SAMPLES.len()).map(|i| format!("mp-{}", 1000 + i)).collect();
    let id_array = StringArray::from(ids.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let gap_array = Float64Array::from(SAMPLES.iter().map(|(_, g)| *g).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("formula", DataType::Utf8, false),
        Field::new("material_id", DataType::Utf8, false),
        Field::new("band_gap", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(formulas), Arc::new(id_array), Arc::new(gap_array)],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_formulas.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} formulas to {output_path}", SAMPLES.len());
}
