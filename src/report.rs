use log::info;

use crate::data::filter::{Stage, StageReport};

// ---------------------------------------------------------------------------
// Reporter – progress side channel of the filter pipeline
// ---------------------------------------------------------------------------

/// Receives progress events while the pipeline runs. Not part of the result;
/// every method defaults to doing nothing.
pub trait Reporter {
    fn stage_started(&mut self, _stage: Stage) {}

    fn stage_finished(&mut self, _report: &StageReport) {}

    /// Called after `stage_finished` only when verbose output was requested.
    fn removed(&mut self, _report: &StageReport) {}
}

/// Discards every event.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Human-readable progress lines through the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn stage_started(&mut self, stage: Stage) {
        if stage == Stage::MetalOxides {
            info!("Oxygen only: No other non-metals are being allowed!");
        }
    }

    fn stage_finished(&mut self, report: &StageReport) {
        info!("{}", finished_line(report));
    }

    fn removed(&mut self, report: &StageReport) {
        info!("{}", removed_line(report));
    }
}

/// `==> After <what the stage did>: <rows left>`
pub fn finished_line(report: &StageReport) -> String {
    format!("==> After {}: {}", report.stage.description(), report.rows_after)
}

/// `removed:  ["NaNO3", "CaCO3"]`
pub fn removed_line(report: &StageReport) -> String {
    format!("removed:  {:?}", report.removed)
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Started(Stage),
    Finished(StageReport),
    Removed(StageReport),
}

/// Keeps events in memory, in the order they were emitted.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl Reporter for RecordingReporter {
    fn stage_started(&mut self, stage: Stage) {
        self.events.push(ReportEvent::Started(stage));
    }

    fn stage_finished(&mut self, report: &StageReport) {
        self.events.push(ReportEvent::Finished(report.clone()));
    }

    fn removed(&mut self, report: &StageReport) {
        self.events.push(ReportEvent::Removed(report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stage: Stage, rows_after: usize, removed: &[&str]) -> StageReport {
        StageReport {
            stage,
            rows_before: rows_after + removed.len(),
            rows_after,
            removed: removed.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_finished_lines() {
        assert_eq!(
            finished_line(&report(Stage::MetalOxides, 2, &["SiO2"])),
            "==> After restricting to metal oxides only: 2"
        );
        assert_eq!(
            finished_line(&report(Stage::ComplexAnions, 3, &[])),
            "==> After removing common O-containing anions: 3"
        );
        assert_eq!(
            finished_line(&report(Stage::AdditionalPatterns, 0, &["NaOH"])),
            "==> After removing additional patterns in formulas: 0"
        );
        assert_eq!(
            finished_line(&report(Stage::SpecificFormulas, 1, &["MgO"])),
            "==> After removing additional specific formulas: 1"
        );
    }

    #[test]
    fn test_removed_line() {
        assert_eq!(
            removed_line(&report(Stage::ComplexAnions, 3, &["NaNO3", "CaCO3"])),
            r#"removed:  ["NaNO3", "CaCO3"]"#
        );
        assert_eq!(removed_line(&report(Stage::SpecificFormulas, 1, &[])), "removed:  []");
    }

    #[test]
    fn test_log_reporter_accepts_every_event() {
        let mut reporter = LogReporter;
        let r = report(Stage::MetalOxides, 1, &["SiO2"]);
        reporter.stage_started(Stage::MetalOxides);
        reporter.stage_finished(&r);
        reporter.removed(&r);
    }
}
