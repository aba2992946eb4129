//! Filter tables of chemical formulas down to "clean" metal oxides.
//!
//! ```no_run
//! use proper_oxides::{filter_table, FilterOptions, RecordTable};
//!
//! let rows = ["Fe2O3", "NaNO3", "MgO"].map(|f| (Some(f.to_string()), ()));
//! let outcome = filter_table(RecordTable::from_rows(rows), &FilterOptions::default())?;
//! assert_eq!(outcome.table.formulas(), vec!["Fe2O3", "MgO"]);
//! # Ok::<(), proper_oxides::FilterError>(())
//! ```

pub mod chem;
pub mod data;
pub mod error;
pub mod report;

pub use chem::classify::{is_metal_oxide, MetalOxideClassifier};
pub use chem::formula::{parse_formula, Composition};
pub use data::filter::{
    filter_table, FilterOptions, FilterOutcome, FilterPipeline, RemovalReport, Stage, StageReport,
};
pub use data::model::{FormulaTable, Metadata, MetadataValue, Record, RecordTable};
pub use error::{FilterError, ParseError};
pub use report::{LogReporter, NullReporter, RecordingReporter, ReportEvent, Reporter};
