/// Data layer: record tables, loading, filtering, writing.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → FormulaTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RecordTable<P>│  Vec<Record>, formula + opaque payload
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  metal oxides → complex anions → patterns → formulas
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  surviving rows → .json / .csv
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
