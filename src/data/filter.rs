use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{Record, RecordTable};
use crate::chem::classify::MetalOxideClassifier;
use crate::chem::elements::COMMON_COMPLEX;
use crate::error::{FilterError, Result};
use crate::report::{LogReporter, Reporter};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Which stages run, and with what extra patterns.
///
/// Deserialises from JSON with every field optional:
///
/// ```json
/// { "metal_oxides_only": true, "additional_patterns": ["OH"], "specific_formulas": ["H2O2"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOptions {
    /// Keep only formulas whose elements are all metals, As, P or O.
    pub metal_oxides_only: bool,
    /// Drop formulas containing a common complex anion (nitrate, sulfate, ...).
    pub filter_complex: bool,
    /// Also report the removed formulas of every stage.
    pub verbose: bool,
    /// Extra substrings; a formula containing any of them is dropped.
    pub additional_patterns: Vec<String>,
    /// Formulas dropped on exact match.
    pub specific_formulas: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            metal_oxides_only: false,
            filter_complex: true,
            verbose: false,
            additional_patterns: Vec::new(),
            specific_formulas: Vec::new(),
        }
    }
}

impl FilterOptions {
    /// Options with every stage switched off.
    pub fn passthrough() -> Self {
        Self {
            filter_complex: false,
            ..Self::default()
        }
    }

    /// Reject blank entries: an empty substring would match every row.
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self
            .additional_patterns
            .iter()
            .position(|p| p.trim().is_empty())
        {
            return Err(FilterError::Configuration(format!(
                "additional_patterns[{i}] is blank"
            )));
        }
        if let Some(i) = self
            .specific_formulas
            .iter()
            .position(|f| f.trim().is_empty())
        {
            return Err(FilterError::Configuration(format!(
                "specific_formulas[{i}] is blank"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stages and their reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    MetalOxides,
    ComplexAnions,
    AdditionalPatterns,
    SpecificFormulas,
}

impl Stage {
    pub fn description(self) -> &'static str {
        match self {
            Stage::MetalOxides => "restricting to metal oxides only",
            Stage::ComplexAnions => "removing common O-containing anions",
            Stage::AdditionalPatterns => "removing additional patterns in formulas",
            Stage::SpecificFormulas => "removing additional specific formulas",
        }
    }
}

/// What one enabled stage did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Removed formulas, flat, in the order the stage removed them.
    pub removed: Vec<String>,
}

/// Reports of the stages that ran, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemovalReport {
    pub stages: Vec<StageReport>,
}

impl RemovalReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn total_removed(&self) -> usize {
        self.stages.iter().map(|s| s.removed.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<P> {
    pub table: RecordTable<P>,
    pub report: RemovalReport,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The ordered filter stages, with their reference sets fixed at construction.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    classifier: MetalOxideClassifier,
    complex_patterns: Vec<String>,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self {
            classifier: MetalOxideClassifier::default(),
            complex_patterns: COMMON_COMPLEX.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterPipeline {
    pub fn new(classifier: MetalOxideClassifier, complex_patterns: Vec<String>) -> Result<Self> {
        if complex_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(FilterError::Configuration(
                "complex anion patterns must not be blank".to_string(),
            ));
        }
        Ok(Self {
            classifier,
            complex_patterns,
        })
    }

    pub fn complex_patterns(&self) -> &[String] {
        &self.complex_patterns
    }

    /// Run every enabled stage in order. Each stage consumes the previous
    /// table; any error aborts the whole run and no table is returned.
    pub fn run<P>(
        &self,
        table: RecordTable<P>,
        options: &FilterOptions,
        reporter: &mut dyn Reporter,
    ) -> Result<FilterOutcome<P>> {
        options.validate()?;

        let mut table = table;
        let mut report = RemovalReport::default();

        if options.metal_oxides_only {
            reporter.stage_started(Stage::MetalOxides);
            let before = table.len();
            let (kept, removed) = table.retain_by(|record| {
                let formula = record.formula()?;
                self.classifier
                    .is_metal_oxide(formula)
                    .map_err(|source| FilterError::Parse {
                        row: record.row,
                        source,
                    })
            })?;
            table = kept;
            let removed = removed.into_iter().filter_map(|r| r.formula).collect();
            finish_stage(
                Stage::MetalOxides,
                before,
                &table,
                removed,
                options,
                reporter,
                &mut report,
            );
        }

        if options.filter_complex {
            reporter.stage_started(Stage::ComplexAnions);
            let before = table.len();
            let (kept, removed) = remove_patterns(table, &self.complex_patterns)?;
            table = kept;
            finish_stage(
                Stage::ComplexAnions,
                before,
                &table,
                removed,
                options,
                reporter,
                &mut report,
            );
        }

        if !options.additional_patterns.is_empty() {
            reporter.stage_started(Stage::AdditionalPatterns);
            let before = table.len();
            let (kept, removed) = remove_patterns(table, &options.additional_patterns)?;
            table = kept;
            finish_stage(
                Stage::AdditionalPatterns,
                before,
                &table,
                removed,
                options,
                reporter,
                &mut report,
            );
        }

        if !options.specific_formulas.is_empty() {
            reporter.stage_started(Stage::SpecificFormulas);
            let before = table.len();
            let excluded: HashSet<&str> =
                options.specific_formulas.iter().map(String::as_str).collect();
            let (kept, removed) =
                table.retain_by(|record| Ok(!excluded.contains(record.formula()?)))?;
            table = kept;
            let removed = removed.into_iter().filter_map(|r| r.formula).collect();
            finish_stage(
                Stage::SpecificFormulas,
                before,
                &table,
                removed,
                options,
                reporter,
                &mut report,
            );
        }

        Ok(FilterOutcome { table, report })
    }
}

/// Drop rows containing any pattern, pattern by pattern in list order.
/// A row is attributed to the first pattern that matches it.
fn remove_patterns<P>(
    table: RecordTable<P>,
    patterns: &[String],
) -> Result<(RecordTable<P>, Vec<String>)> {
    let mut table = table;
    let mut removed_all = Vec::new();
    for pattern in patterns {
        let (kept, removed) =
            table.retain_by(|record| Ok(!record.formula()?.contains(pattern.as_str())))?;
        if !removed.is_empty() {
            debug!("pattern {pattern:?} removed {} rows", removed.len());
        }
        removed_all.extend(removed.into_iter().filter_map(|r: Record<P>| r.formula));
        table = kept;
    }
    Ok((table, removed_all))
}

fn finish_stage<P>(
    stage: Stage,
    rows_before: usize,
    table: &RecordTable<P>,
    removed: Vec<String>,
    options: &FilterOptions,
    reporter: &mut dyn Reporter,
    report: &mut RemovalReport,
) {
    let stage_report = StageReport {
        stage,
        rows_before,
        rows_after: table.len(),
        removed,
    };
    reporter.stage_finished(&stage_report);
    if options.verbose {
        reporter.removed(&stage_report);
    }
    report.stages.push(stage_report);
}

/// Run the default pipeline, reporting progress through the log.
pub fn filter_table<P>(table: RecordTable<P>, options: &FilterOptions) -> Result<FilterOutcome<P>> {
    FilterPipeline::default().run(table, options, &mut LogReporter)
}
