//! The sequential pipeline runner.

use super::{PipelineEntry, PipelineRun, RunAbort};
use crate::context::RunContext;
use crate::core::{RunOutcome, StageRecord};
use crate::errors::{GateRejectedError, StageFailedError};
use crate::events::EventSink;
use crate::gate::{GateResolution, GateService};
use crate::utils::{iso_timestamp, now_utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A validated, immutable pipeline definition.
///
/// A pipeline is reusable: each call to [`run`](Self::run) executes the
/// same ordered entries against a fresh [`PipelineRun`]. No state is
/// shared between runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    entries: Vec<PipelineEntry>,
}

impl Pipeline {
    pub(super) fn new(name: String, entries: Vec<PipelineEntry>) -> Self {
        Self { name, entries }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of entries (stages and gates).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entry names in execution order.
    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(PipelineEntry::name).collect()
    }

    /// Executes the pipeline strictly in order.
    ///
    /// Each entry transitions pending → running → passed/failed. The first
    /// stage failure or gate rejection aborts the run; every not-yet-started
    /// entry transitions directly to skipped, without execution. Gates
    /// suspend on `gates` until resolved or timed out; an approved choice
    /// is recorded on the run context before the guarded stage runs.
    ///
    /// Always returns a terminal run: failures become the abort record,
    /// never an `Err`.
    pub async fn run(&self, gates: &GateService, sink: Arc<dyn EventSink>) -> PipelineRun {
        let ctx = RunContext::new(&self.name).with_event_sink(sink);
        let started_at = now_utc();

        let mut records: Vec<StageRecord> = self
            .entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| StageRecord::pending(entry.name(), ordinal))
            .collect();

        ctx.try_emit(
            "run.started",
            Some(serde_json::json!({
                "pipeline": self.name,
                "run_id": ctx.run_id(),
                "entries": self.entry_names(),
                "at": iso_timestamp(),
            })),
        );
        info!(pipeline = %self.name, run_id = %ctx.run_id(), "run started");

        let mut abort: Option<RunAbort> = None;

        for (ordinal, entry) in self.entries.iter().enumerate() {
            let outcome = match entry {
                PipelineEntry::Stage(spec) => run_stage(&ctx, spec, &mut records[ordinal]).await,
                PipelineEntry::Gate(spec) => {
                    run_gate(&ctx, gates, spec, &mut records[ordinal]).await
                }
            };

            if let Some(reason) = outcome {
                abort = Some(reason);
                break;
            }
        }

        if let Some(ref abort) = abort {
            let reason = format!("aborted upstream: {}", abort.reason());
            for record in records.iter_mut().filter(|r| !r.is_terminal()) {
                record.skip(reason.as_str());
                ctx.try_emit(
                    "stage.skipped",
                    Some(serde_json::json!({
                        "stage": record.name,
                        "reason": reason,
                    })),
                );
            }
        }

        let outcome = RunOutcome::from_statuses(records.iter().map(|r| &r.status));

        ctx.try_emit(
            "run.finished",
            Some(serde_json::json!({
                "pipeline": self.name,
                "run_id": ctx.run_id(),
                "outcome": outcome,
                "abort": abort.as_ref().map(RunAbort::reason),
                "at": iso_timestamp(),
            })),
        );
        info!(pipeline = %self.name, run_id = %ctx.run_id(), %outcome, "run finished");

        PipelineRun {
            run_id: ctx.run_id(),
            pipeline: self.name.clone(),
            started_at,
            finished_at: now_utc(),
            records,
            outcome,
            abort,
            approved_target: ctx.approved_target(),
        }
    }
}

async fn run_stage(
    ctx: &RunContext,
    spec: &super::StageSpec,
    record: &mut StageRecord,
) -> Option<RunAbort> {
    record.start();
    ctx.try_emit(
        "stage.started",
        Some(serde_json::json!({"stage": spec.name})),
    );

    let stage_start = Instant::now();
    match spec.action.execute(ctx).await {
        Ok(()) => {
            let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;
            record.pass(duration_ms);
            ctx.try_emit(
                "stage.passed",
                Some(serde_json::json!({
                    "stage": spec.name,
                    "duration_ms": duration_ms,
                })),
            );
            None
        }
        Err(cause) => {
            let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;
            let err = StageFailedError::new(&spec.name, cause);
            warn!(stage = %spec.name, error = %err.cause, "stage failed");

            record.fail(err.cause.to_string(), duration_ms);
            ctx.try_emit(
                "stage.failed",
                Some(serde_json::json!({
                    "stage": spec.name,
                    "error": err.cause.to_string(),
                    "duration_ms": duration_ms,
                })),
            );
            Some(RunAbort::from(&err))
        }
    }
}

async fn run_gate(
    ctx: &RunContext,
    gates: &GateService,
    spec: &super::GateSpec,
    record: &mut StageRecord,
) -> Option<RunAbort> {
    record.start();
    ctx.try_emit(
        "gate.pending",
        Some(serde_json::json!({
            "gate": spec.name,
            "prompt": spec.config.prompt(),
            "choices": spec.config.choices(),
        })),
    );

    let gate_start = Instant::now();
    let resolution = gates.wait(&spec.name, &spec.config).await;
    let duration_ms = gate_start.elapsed().as_secs_f64() * 1000.0;

    match resolution {
        GateResolution::Approved(choice) => {
            ctx.set_approved_target(&choice);
            record.pass(duration_ms);
            ctx.try_emit(
                "gate.approved",
                Some(serde_json::json!({
                    "gate": spec.name,
                    "choice": choice,
                })),
            );
            None
        }
        resolution @ (GateResolution::Denied | GateResolution::TimedOut) => {
            let err = GateRejectedError::new(&spec.name, resolution);
            warn!(gate = %spec.name, resolution = %err.resolution, "gate rejected the run");

            record.fail(format!("approval {}", err.resolution), duration_ms);
            ctx.try_emit(
                "gate.rejected",
                Some(serde_json::json!({
                    "gate": spec.name,
                    "resolution": err.resolution,
                })),
            );
            Some(RunAbort::from(&err))
        }
    }
}

