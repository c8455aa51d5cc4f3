//! Terminal run results.

use crate::core::{RunOutcome, StageRecord, StageStatus};
use crate::errors::{GateRejectedError, StageFailedError};
use crate::gate::GateResolution;
use crate::utils::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// Why a run aborted before completing every stage.
///
/// Distinguishes "which stage failed" from "gate rejected" so callers can
/// act on the two differently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RunAbort {
    /// A stage's action reported failure.
    StageFailed {
        /// The failed stage.
        stage: String,
        /// The error reported by the action.
        error: String,
    },
    /// An approval gate denied the run or timed out.
    GateRejected {
        /// The rejecting gate.
        gate: String,
        /// How the gate resolved.
        resolution: GateResolution,
    },
}

impl RunAbort {
    /// A one-line human-readable abort reason.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::StageFailed { stage, error } => {
                format!("stage '{stage}' failed: {error}")
            }
            Self::GateRejected { gate, resolution } => {
                format!("gate '{gate}' {resolution}")
            }
        }
    }
}

impl From<&StageFailedError> for RunAbort {
    fn from(err: &StageFailedError) -> Self {
        Self::StageFailed {
            stage: err.stage.clone(),
            error: err.cause.to_string(),
        }
    }
}

impl From<&GateRejectedError> for RunAbort {
    fn from(err: &GateRejectedError) -> Self {
        Self::GateRejected {
            gate: err.gate.clone(),
            resolution: err.resolution.clone(),
        }
    }
}

/// The terminal result of one pipeline run.
///
/// Owned by exactly one execution; once returned, nothing mutates it.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// The unique run ID.
    pub run_id: Uuid,
    /// The pipeline name.
    pub pipeline: String,
    /// When the run started.
    pub started_at: Timestamp,
    /// When the run reached its terminal state.
    pub finished_at: Timestamp,
    /// Per-entry records in pipeline order. Every record is terminal.
    pub records: Vec<StageRecord>,
    /// The overall outcome.
    pub outcome: RunOutcome,
    /// Why the run aborted, when it did not complete every stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort: Option<RunAbort>,
    /// The promotion target approved by a gate, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_target: Option<String>,
}

impl PipelineRun {
    /// Returns true if every stage passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.outcome.is_passed()
    }

    /// Looks up the record for a stage by name.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&StageRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Returns the status of a stage by name.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<StageStatus> {
        self.record(name).map(|r| r.status)
    }

    /// Total wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        let delta = self.finished_at - self.started_at;
        delta
            .num_microseconds()
            .map_or_else(|| delta.num_milliseconds() as f64, |us| us as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::now_utc;

    fn passed_run() -> PipelineRun {
        let mut build = StageRecord::pending("build", 0);
        build.start();
        build.pass(1.0);

        PipelineRun {
            run_id: Uuid::new_v4(),
            pipeline: "release".to_string(),
            started_at: now_utc(),
            finished_at: now_utc(),
            records: vec![build],
            outcome: RunOutcome::Passed,
            abort: None,
            approved_target: None,
        }
    }

    #[test]
    fn test_record_lookup() {
        let run = passed_run();
        assert!(run.is_passed());
        assert_eq!(run.status_of("build"), Some(StageStatus::Passed));
        assert_eq!(run.status_of("missing"), None);
    }

    #[test]
    fn test_abort_reasons() {
        let abort = RunAbort::StageFailed {
            stage: "test".to_string(),
            error: "3 tests failed".to_string(),
        };
        assert_eq!(abort.reason(), "stage 'test' failed: 3 tests failed");

        let abort = RunAbort::GateRejected {
            gate: "promote".to_string(),
            resolution: GateResolution::TimedOut,
        };
        assert_eq!(abort.reason(), "gate 'promote' timed out");
    }

    #[test]
    fn test_abort_from_errors() {
        let err = StageFailedError::new("build", anyhow::anyhow!("no compiler"));
        let abort = RunAbort::from(&err);
        assert!(matches!(abort, RunAbort::StageFailed { ref stage, .. } if stage == "build"));

        let err = GateRejectedError::new("promote", GateResolution::Denied);
        let abort = RunAbort::from(&err);
        assert!(matches!(abort, RunAbort::GateRejected { ref gate, .. } if gate == "promote"));
    }

    #[test]
    fn test_run_serializes() {
        let run = passed_run();
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["pipeline"], "release");
        assert_eq!(json["outcome"], "passed");
        assert!(json.get("abort").is_none());
    }
}
