//! The lifecycle orchestrator.
//!
//! Drives scenarios against a [`Transport`], converting every step failure
//! into a recorded outcome instead of letting it propagate: an assertion
//! mismatch fails the scenario, a transport failure aborts it, and either
//! way the remaining steps of that scenario are skipped while sibling
//! scenarios still run. The run always completes and the reporter is always
//! finalized.
//!
//! Scenarios execute sequentially, one at a time. That is deliberate: the
//! remote resource is externally owned, and concurrent scenarios could
//! collide on server state in ways that have nothing to do with the
//! contract under test.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

use crate::context::{ScenarioContext, extract};
use crate::error::{AssertionError, ContextError, HarnessResult, SpecError};
use crate::matcher::{assert_status, match_exact, match_partial};
use crate::report::{RunReporter, RunSummary, ScenarioResult};
use crate::scenario::{DistinctStep, HttpStep, MatchMode, Scenario, Step, StepAction};
use crate::spec::{Method, RequestSpec};
use crate::transport::Transport;

/// Execution state of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    /// Not started yet.
    Pending,
    /// Steps are executing.
    Running,
    /// Every step passed.
    Passed,
    /// An assertion failed.
    Failed,
    /// Infrastructure failure or cancellation.
    Aborted,
}

/// Executes scenarios and aggregates their results.
pub struct Runner<T: Transport> {
    transport: T,
}

impl<T: Transport> Runner<T> {
    /// Creates a runner over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Runs the scenarios sequentially to completion and returns the
    /// finalized summary.
    pub async fn run(&self, scenarios: &[Scenario]) -> RunSummary {
        self.run_with_shutdown(scenarios, std::future::pending::<()>())
            .await
    }

    /// Runs the scenarios sequentially until done or until `shutdown`
    /// resolves. On cancellation the in-flight scenario is abandoned and
    /// recorded as aborted, remaining scenarios are not attempted, and the
    /// reporter is still finalized with everything recorded so far.
    pub async fn run_with_shutdown(
        &self,
        scenarios: &[Scenario],
        shutdown: impl Future<Output = ()>,
    ) -> RunSummary {
        let reporter = RunReporter::begin();
        tokio::pin!(shutdown);

        for scenario in scenarios {
            let start = Instant::now();
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    reporter.record(ScenarioResult::aborted(
                        &scenario.name,
                        "run cancelled".to_string(),
                        elapsed_ms(start),
                    ));
                    break;
                }
                result = self.run_scenario(scenario) => reporter.record(result),
            }
        }

        reporter.end()
    }

    async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let mut context = ScenarioContext::new();

        let state = ScenarioState::Pending;
        debug!(scenario = %scenario.name, ?state, "scenario queued");
        let state = ScenarioState::Running;
        debug!(scenario = %scenario.name, ?state, "scenario started");

        for step in &scenario.steps {
            if let Err(error) = self.run_step(step, &mut context).await {
                let state = if error.is_infrastructure() {
                    ScenarioState::Aborted
                } else {
                    ScenarioState::Failed
                };
                debug!(scenario = %scenario.name, step = %step.name, ?state, "scenario stopped");

                let detail = format!("step '{}': {error}", step.name);
                return match state {
                    ScenarioState::Aborted => {
                        ScenarioResult::aborted(&scenario.name, detail, elapsed_ms(start))
                    }
                    _ => ScenarioResult::failed(&scenario.name, detail, elapsed_ms(start)),
                };
            }
        }

        let state = ScenarioState::Passed;
        debug!(scenario = %scenario.name, ?state, "scenario finished");
        ScenarioResult::passed(&scenario.name, elapsed_ms(start))
    }

    async fn run_step(&self, step: &Step, context: &mut ScenarioContext) -> HarnessResult<()> {
        match &step.action {
            StepAction::Http(http) => self.run_http_step(step, http, context).await,
            StepAction::Distinct(check) => run_distinct_step(check, context),
        }
    }

    async fn run_http_step(
        &self,
        step: &Step,
        http: &HttpStep,
        context: &mut ScenarioContext,
    ) -> HarnessResult<()> {
        let path = context.render_path(&http.path)?;

        let spec = match http.method {
            Method::Get => RequestSpec::get(path)?,
            Method::Delete => RequestSpec::delete(path)?,
            Method::Post | Method::Put => {
                let body = http.body.clone().ok_or_else(|| SpecError::MissingBody {
                    method: http.method.to_string(),
                    path: path.clone(),
                })?;
                if http.method == Method::Post {
                    RequestSpec::post(path, body)?
                } else {
                    RequestSpec::put(path, body)?
                }
            }
        };

        debug!(step = %step.name, request = %spec, "executing step");

        let response = self.transport.issue(&spec).await?;

        assert_status(response.status, http.expect.status)?;
        if let Some(expected) = &http.expect.body {
            match &http.expect.mode {
                MatchMode::Partial => match_partial(&response.body, expected)?,
                MatchMode::Exact { ignore } => match_exact(&response.body, expected, ignore)?,
            }
        }

        for capture in &http.capture {
            let value = extract(&response.body, &capture.path)
                .ok_or_else(|| ContextError::CapturePath {
                    path: capture.path.clone(),
                })?
                .clone();
            context.capture(&capture.key, value)?;
        }

        Ok(())
    }
}

fn run_distinct_step(check: &DistinctStep, context: &ScenarioContext) -> HarnessResult<()> {
    for (left, right) in &check.pairs {
        let left_value = context.require(left)?;
        let right_value = context.require(right)?;
        if left_value == right_value {
            return Err(AssertionError::NotDistinct {
                left: left.clone(),
                right: right.clone(),
                value: left_value.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
