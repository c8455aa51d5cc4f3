//! Error types for the shipgate pipeline core.
//!
//! The taxonomy is intentionally small: a run terminates for exactly two
//! reasons beyond normal completion, a stage failure or a gate rejection.
//! Everything else is a definition-time validation problem.

use crate::gate::GateResolution;
use thiserror::Error;

/// The main error type for shipgate operations.
#[derive(Debug, Error)]
pub enum ShipgateError {
    /// A pipeline definition failed validation.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// A gate configuration was invalid.
    #[error("{0}")]
    GateConfig(#[from] GateConfigError),

    /// An individual stage's action reported failure or raised an
    /// unexpected fault.
    #[error("{0}")]
    StageFailed(#[from] StageFailedError),

    /// An approval gate was denied or timed out.
    #[error("{0}")]
    GateRejected(#[from] GateRejectedError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error raised when a stage's action fails.
///
/// Carries the stage name and the underlying cause as reported by the
/// action. The runner never retries; the cause is surfaced as-is.
#[derive(Debug, Error)]
#[error("Stage '{stage}' failed: {cause}")]
pub struct StageFailedError {
    /// The name of the failed stage.
    pub stage: String,
    /// The underlying cause reported by the stage action.
    pub cause: anyhow::Error,
}

impl StageFailedError {
    /// Creates a new stage failure error.
    #[must_use]
    pub fn new(stage: impl Into<String>, cause: anyhow::Error) -> Self {
        Self {
            stage: stage.into(),
            cause,
        }
    }
}

/// Error raised when an approval gate denies the run or times out.
#[derive(Debug, Clone, Error)]
#[error("Gate '{gate}' rejected the run: {resolution}")]
pub struct GateRejectedError {
    /// The name of the rejecting gate.
    pub gate: String,
    /// How the gate resolved (denied or timed out).
    pub resolution: GateResolution,
}

impl GateRejectedError {
    /// Creates a new gate rejection error.
    #[must_use]
    pub fn new(gate: impl Into<String>, resolution: GateResolution) -> Self {
        Self {
            gate: gate.into(),
            resolution,
        }
    }

    /// Returns true if the gate timed out rather than being denied.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        matches!(self.resolution, GateResolution::TimedOut)
    }
}

/// Error raised when a pipeline definition fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// Error raised when a gate configuration is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateConfigError {
    /// The allowed-choice set was empty.
    #[error("Gate requires at least one allowed choice")]
    EmptyChoices,

    /// The approval timeout was zero.
    ///
    /// There is deliberately no default timeout; callers must choose one.
    #[error("Gate timeout must be greater than zero")]
    ZeroTimeout,

    /// The prompt shown to approvers was empty or whitespace-only.
    #[error("Gate prompt cannot be empty")]
    BlankPrompt,
}
