//! Run-level result aggregation.
//!
//! A [`RunReporter`] is a scoped run context: [`RunReporter::begin`] opens
//! it, [`RunReporter::record`] appends scenario results in arrival order,
//! and [`RunReporter::end`] consumes the reporter and produces the final
//! [`RunSummary`]. Move semantics make double-finalization a compile
//! error rather than a runtime bug. No state survives across runs.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every step passed.
    Passed,
    /// An assertion failed; the resource answered but broke the contract.
    Failed,
    /// Infrastructure failure; the resource could not be reached, or the
    /// run was cancelled mid-scenario.
    Aborted,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Aborted => "aborted",
        })
    }
}

/// Result of one scenario; immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario name.
    pub name: String,

    /// Pass/fail/abort outcome.
    pub outcome: Outcome,

    /// Failure detail (expected versus actual) when not passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Wall-clock duration of the scenario in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// A passing result.
    pub fn passed(name: &str, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Passed,
            detail: None,
            duration_ms,
        }
    }

    /// A failing result with diagnostic detail.
    pub fn failed(name: &str, detail: String, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Failed,
            detail: Some(detail),
            duration_ms,
        }
    }

    /// An aborted result with diagnostic detail.
    pub fn aborted(name: &str, detail: String, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Aborted,
            detail: Some(detail),
            duration_ms,
        }
    }
}

/// Scoped run context aggregating scenario results.
#[derive(Debug)]
pub struct RunReporter {
    started_at: DateTime<Utc>,
    begun: Instant,
    results: Mutex<Vec<ScenarioResult>>,
}

impl RunReporter {
    /// Opens a fresh run context.
    pub fn begin() -> Self {
        info!("contract run started");
        Self {
            started_at: Utc::now(),
            begun: Instant::now(),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Appends a scenario result. Safe under concurrent calls should the
    /// embedding suite drive scenarios from several tasks.
    pub fn record(&self, result: ScenarioResult) {
        match result.outcome {
            Outcome::Passed => debug!(scenario = %result.name, "scenario passed"),
            Outcome::Failed => warn!(
                scenario = %result.name,
                detail = result.detail.as_deref().unwrap_or(""),
                "scenario failed"
            ),
            Outcome::Aborted => warn!(
                scenario = %result.name,
                detail = result.detail.as_deref().unwrap_or(""),
                "scenario aborted"
            ),
        }

        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result);
    }

    /// Finalizes the run and emits the summary. Consumes the reporter, so a
    /// run is finalized exactly once.
    pub fn end(self) -> RunSummary {
        let results = self
            .results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let summary = RunSummary {
            started_at: self.started_at,
            duration_ms: self.begun.elapsed().as_millis() as u64,
            passed: count(&results, Outcome::Passed),
            failed: count(&results, Outcome::Failed),
            aborted: count(&results, Outcome::Aborted),
            results,
        };

        info!(
            passed = summary.passed,
            failed = summary.failed,
            aborted = summary.aborted,
            duration_ms = summary.duration_ms,
            "contract run finished"
        );

        summary
    }
}

fn count(results: &[ScenarioResult], outcome: Outcome) -> usize {
    results.iter().filter(|r| r.outcome == outcome).count()
}

/// Final report of one run: counts by outcome, timing, and the ordered
/// per-scenario results.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,

    /// Total run duration in milliseconds.
    pub duration_ms: u64,

    /// Scenarios that passed.
    pub passed: usize,

    /// Scenarios that failed an assertion.
    pub failed: usize,

    /// Scenarios aborted on infrastructure failure or cancellation.
    pub aborted: usize,

    /// All results, in arrival order.
    pub results: Vec<ScenarioResult>,
}

impl RunSummary {
    /// Total number of scenarios recorded.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True when every scenario passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.aborted == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for result in &self.results {
            write!(
                f,
                "{:<8} {} ({} ms)",
                result.outcome, result.name, result.duration_ms
            )?;
            if let Some(detail) = &result.detail {
                write!(f, "\n         {detail}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{} scenarios: {} passed, {} failed, {} aborted in {} ms",
            self.total(),
            self.passed,
            self.failed,
            self.aborted,
            self.duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_accumulate_in_arrival_order() {
        let reporter = RunReporter::begin();
        reporter.record(ScenarioResult::passed("first", 10));
        reporter.record(ScenarioResult::failed("second", "boom".to_string(), 20));
        reporter.record(ScenarioResult::aborted("third", "down".to_string(), 30));

        let summary = reporter.end();
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.aborted, 1);
        assert_eq!(
            summary.results.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
        assert!(!summary.all_passed());
    }

    #[test]
    fn empty_run_finalizes_cleanly() {
        let summary = RunReporter::begin().end();
        assert_eq!(summary.total(), 0);
        assert!(summary.all_passed());
    }

    #[test]
    fn summary_display_includes_counts_and_details() {
        let reporter = RunReporter::begin();
        reporter.record(ScenarioResult::failed(
            "update-echo",
            "status mismatch: expected 200, got 404".to_string(),
            12,
        ));
        let rendered = reporter.end().to_string();

        assert!(rendered.contains("failed   update-echo"));
        assert!(rendered.contains("status mismatch"));
        assert!(rendered.contains("1 scenarios: 0 passed, 1 failed, 0 aborted"));
    }

    #[test]
    fn summary_serializes_for_machine_consumption() {
        let reporter = RunReporter::begin();
        reporter.record(ScenarioResult::passed("cv", 5));
        let summary = reporter.end();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["results"][0]["outcome"], "passed");
        assert!(json["results"][0].get("detail").is_none());
    }
}
