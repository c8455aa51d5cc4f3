//! Outcome reporting and notification dispatch.
//!
//! After a run reaches a terminal state the reporter builds a structured
//! summary — even on abort — and invokes exactly one of two outbound
//! notification channels. The concrete transport (chat, email, log) lives
//! behind the [`Notifier`] trait; the reporter itself is memoryless
//! across runs and never retries a notification.

use crate::core::{RunOutcome, StageStatus};
use crate::gate::GateResolution;
use crate::pipeline::{PipelineRun, RunAbort};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// One stage line of a run summary.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// The stage name.
    pub name: String,
    /// The terminal status of the stage.
    pub status: StageStatus,
    /// The error message, when the stage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The structured summary of one terminal pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The pipeline name.
    pub pipeline: String,
    /// The run ID.
    pub run_id: Uuid,
    /// The overall outcome.
    pub overall: RunOutcome,
    /// Stage name/status pairs in pipeline order.
    pub stages: Vec<StageReport>,
    /// One-line abort reason, when the run did not complete every stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    /// The promotion target approved by a gate, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_target: Option<String>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: f64,
}

impl RunSummary {
    /// Builds a summary from a terminal run.
    #[must_use]
    pub fn from_run(run: &PipelineRun) -> Self {
        Self {
            pipeline: run.pipeline.clone(),
            run_id: run.run_id,
            overall: run.outcome,
            stages: run
                .records
                .iter()
                .map(|record| StageReport {
                    name: record.name.clone(),
                    status: record.status,
                    error: record.error.clone(),
                })
                .collect(),
            abort_reason: run.abort.as_ref().map(RunAbort::reason),
            approved_target: run.approved_target.clone(),
            duration_ms: run.duration_ms(),
        }
    }

    /// The process exit status for the invoking environment.
    ///
    /// Zero when the run passed, one otherwise. This is the only
    /// machine-readable artifact beyond the summary itself.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.overall.is_passed())
    }
}

/// Outbound notification channels for terminal runs.
///
/// Implementations own the transport. Exactly one of the two methods is
/// invoked per run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Invoked when the run passed.
    async fn on_success(&self, summary: &RunSummary);

    /// Invoked when the run failed or aborted, with remediation hints.
    async fn on_failure(&self, summary: &RunSummary, hints: &[String]);
}

/// A notifier that writes to the `tracing` framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    /// Creates a new logging notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn on_success(&self, summary: &RunSummary) {
        info!(
            pipeline = %summary.pipeline,
            run_id = %summary.run_id,
            stages = summary.stages.len(),
            duration_ms = summary.duration_ms,
            "pipeline passed"
        );
    }

    async fn on_failure(&self, summary: &RunSummary, hints: &[String]) {
        error!(
            pipeline = %summary.pipeline,
            run_id = %summary.run_id,
            abort = summary.abort_reason.as_deref().unwrap_or("unknown"),
            hints = ?hints,
            "pipeline failed"
        );
    }
}

/// A notifier that records deliveries in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    successes: parking_lot::RwLock<Vec<RunSummary>>,
    failures: parking_lot::RwLock<Vec<(RunSummary, Vec<String>)>>,
}

impl CollectingNotifier {
    /// Creates a new collecting notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the summaries delivered on the success channel.
    #[must_use]
    pub fn successes(&self) -> Vec<RunSummary> {
        self.successes.read().clone()
    }

    /// Returns the summaries and hints delivered on the failure channel.
    #[must_use]
    pub fn failures(&self) -> Vec<(RunSummary, Vec<String>)> {
        self.failures.read().clone()
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn on_success(&self, summary: &RunSummary) {
        self.successes.write().push(summary.clone());
    }

    async fn on_failure(&self, summary: &RunSummary, hints: &[String]) {
        self.failures
            .write()
            .push((summary.clone(), hints.to_vec()));
    }
}

/// Builds summaries for terminal runs and dispatches notifications.
pub struct OutcomeReporter {
    notifier: Arc<dyn Notifier>,
}

impl OutcomeReporter {
    /// Creates a reporter with the given notifier.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Summarizes a terminal run and invokes the matching channel.
    ///
    /// A summary is always produced, abort or not.
    pub async fn report(&self, run: &PipelineRun) -> RunSummary {
        let summary = RunSummary::from_run(run);

        if summary.overall.is_passed() {
            self.notifier.on_success(&summary).await;
        } else {
            let hints = remediation_hints(run.abort.as_ref());
            self.notifier.on_failure(&summary, &hints).await;
        }

        summary
    }
}

impl std::fmt::Debug for OutcomeReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeReporter").finish_non_exhaustive()
    }
}

fn remediation_hints(abort: Option<&RunAbort>) -> Vec<String> {
    match abort {
        Some(RunAbort::StageFailed { stage, .. }) => vec![
            format!("Inspect the output of stage '{stage}'."),
            "Fix the underlying fault and start a new run; stages are not retried in place."
                .to_string(),
        ],
        Some(RunAbort::GateRejected { gate, resolution }) => match resolution {
            GateResolution::TimedOut => vec![
                format!("No approval for gate '{gate}' arrived within the configured wait bound."),
                "Raise the gate timeout or confirm an approver is available, then start a new run."
                    .to_string(),
            ],
            _ => vec![
                format!("Gate '{gate}' was declined by an approver."),
                "Coordinate with the approver before starting a new run.".to_string(),
            ],
        },
        None => vec!["Check the per-stage statuses in the summary.".to_string()],
    }
}
