use std::collections::BTreeMap;
use std::fmt;

use crate::error::FilterError;

// ---------------------------------------------------------------------------
// MetadataValue – a single cell in a pass-through column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => Ok(()),
        }
    }
}

impl From<&MetadataValue> for serde_json::Value {
    fn from(value: &MetadataValue) -> Self {
        match value {
            MetadataValue::String(s) => serde_json::Value::String(s.clone()),
            MetadataValue::Integer(i) => serde_json::Value::from(*i),
            MetadataValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            MetadataValue::Bool(b) => serde_json::Value::Bool(*b),
            MetadataValue::Null => serde_json::Value::Null,
        }
    }
}

/// Every column other than the formula, by name.
pub type Metadata = BTreeMap<String, MetadataValue>;

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One row: the formula plus an opaque payload carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<P> {
    /// Position in the table as first built; stable across filtering.
    pub row: usize,
    pub formula: Option<String>,
    pub payload: P,
}

impl<P> Record<P> {
    /// The formula, or `MissingField` when absent or blank.
    pub fn formula(&self) -> Result<&str, FilterError> {
        match self.formula.as_deref() {
            Some(f) if !f.trim().is_empty() => Ok(f),
            _ => Err(FilterError::MissingField {
                row: self.row,
                field: "formula",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordTable – ordered rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable<P> {
    pub records: Vec<Record<P>>,
}

impl<P> Default for RecordTable<P> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<P> RecordTable<P> {
    /// Build a table, numbering rows in iteration order.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, P)>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, (formula, payload))| Record {
                row,
                formula,
                payload,
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Formulas in row order; absent ones are skipped.
    pub fn formulas(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| r.formula.as_deref())
            .collect()
    }

    /// Split into (kept, removed) by `keep`, preserving order in both halves.
    /// The first error aborts the split.
    pub fn retain_by<F>(self, mut keep: F) -> Result<(Self, Vec<Record<P>>), FilterError>
    where
        F: FnMut(&Record<P>) -> Result<bool, FilterError>,
    {
        let mut kept = Vec::with_capacity(self.records.len());
        let mut removed = Vec::new();
        for record in self.records {
            if keep(&record)? {
                kept.push(record);
            } else {
                removed.push(record);
            }
        }
        Ok((Self { records: kept }, removed))
    }
}

// ---------------------------------------------------------------------------
// FormulaTable – a table loaded from disk
// ---------------------------------------------------------------------------

/// A loaded file: rows plus the column layout needed to write it back.
#[derive(Debug, Clone, Default)]
pub struct FormulaTable {
    pub table: RecordTable<Metadata>,
    /// All column names in file order, formula column included.
    pub column_names: Vec<String>,
}

impl FormulaTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(formulas: &[Option<&str>]) -> RecordTable<usize> {
        RecordTable::from_rows(
            formulas
                .iter()
                .enumerate()
                .map(|(i, f)| (f.map(String::from), i * 10)),
        )
    }

    #[test]
    fn test_from_rows_numbers_rows() {
        let t = table(&[Some("MgO"), None, Some("ZnO")]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.records[2].row, 2);
        assert_eq!(t.records[2].payload, 20);
        assert_eq!(t.formulas(), vec!["MgO", "ZnO"]);
    }

    #[test]
    fn test_missing_formula() {
        let t = table(&[None, Some("  ")]);
        assert!(matches!(
            t.records[0].formula(),
            Err(FilterError::MissingField { row: 0, field: "formula" })
        ));
        assert!(matches!(
            t.records[1].formula(),
            Err(FilterError::MissingField { row: 1, .. })
        ));
    }

    #[test]
    fn test_retain_by_preserves_order() {
        let t = table(&[Some("a"), Some("b"), Some("c"), Some("d")]);
        let (kept, removed) = t
            .retain_by(|r| Ok(r.row % 2 == 0))
            .unwrap();
        assert_eq!(kept.formulas(), vec!["a", "c"]);
        let removed: Vec<usize> = removed.iter().map(|r| r.row).collect();
        assert_eq!(removed, vec![1, 3]);
    }

    #[test]
    fn test_retain_by_aborts_on_error() {
        let t = table(&[Some("a"), None]);
        let result = t.retain_by(|r| r.formula().map(|_| true));
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_to_json() {
        assert_eq!(
            serde_json::Value::from(&MetadataValue::Float(1.5)),
            serde_json::json!(1.5)
        );
        assert_eq!(
            serde_json::Value::from(&MetadataValue::Float(f64::NAN)),
            serde_json::Value::Null
        );
        assert_eq!(MetadataValue::Null.to_string(), "");
    }
}
