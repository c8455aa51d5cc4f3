//! Stage status and overall run outcome enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The execution status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not started yet.
    Pending,
    /// Stage is currently executing.
    Running,
    /// Stage completed successfully.
    Passed,
    /// Stage failed, or the gate it models was rejected.
    Failed,
    /// Stage was never executed because an upstream stage failed
    /// or a gate rejected the run.
    Skipped,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Skipped)
    }

    /// Returns true if the status indicates the stage ran and succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true if the status indicates failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// The overall outcome of a pipeline run.
///
/// A run is `Failed` if any stage failed; `Passed` once every stage
/// reached a terminal state with no failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stage reached a terminal state and none failed.
    Passed,
    /// At least one stage failed or a gate rejected the run.
    Failed,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl RunOutcome {
    /// Derives the overall outcome from a collection of stage statuses.
    #[must_use]
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a StageStatus>) -> Self {
        if statuses.into_iter().any(StageStatus::is_failure) {
            Self::Failed
        } else {
            Self::Passed
        }
    }

    /// Returns true if the run passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_status_display() {
        assert_eq!(StageStatus::Passed.to_string(), "passed");
        assert_eq!(StageStatus::Failed.to_string(), "failed");
        assert_eq!(StageStatus::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_stage_status_is_terminal() {
        assert!(StageStatus::Passed.is_terminal());
        assert!(StageStatus::Failed.is_terminal());
        assert!(StageStatus::Skipped.is_terminal());
        assert!(!StageStatus::Pending.is_terminal());
        assert!(!StageStatus::Running.is_terminal());
    }

    #[test]
    fn test_skipped_is_not_success() {
        assert!(!StageStatus::Skipped.is_success());
        assert!(!StageStatus::Skipped.is_failure());
    }

    #[test]
    fn test_stage_status_serialize() {
        let status = StageStatus::Passed;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#""passed""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::Passed);
    }

    #[test]
    fn test_run_outcome_from_statuses() {
        let all_passed = [StageStatus::Passed, StageStatus::Passed];
        assert_eq!(RunOutcome::from_statuses(&all_passed), RunOutcome::Passed);

        let with_failure = [StageStatus::Passed, StageStatus::Failed, StageStatus::Skipped];
        assert_eq!(RunOutcome::from_statuses(&with_failure), RunOutcome::Failed);
    }

    #[test]
    fn test_run_outcome_display() {
        assert_eq!(RunOutcome::Passed.to_string(), "passed");
        assert_eq!(RunOutcome::Failed.to_string(), "failed");
    }
}
