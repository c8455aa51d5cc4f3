//! Per-stage records owned by a single pipeline run.

use super::StageStatus;
use serde::{Deserialize, Serialize};

/// The record of one stage within a pipeline run.
///
/// A record is created in `Pending` state when the pipeline definition is
/// loaded into a run. Only the runner mutates it, and once the status is
/// terminal the record is never touched again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage name.
    pub name: String,

    /// Zero-based position of the stage in the pipeline.
    pub ordinal: usize,

    /// The current execution status.
    pub status: StageStatus,

    /// Error message, set when the stage failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Why the stage was skipped, set when it never ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    /// Wall-clock execution time, set once the stage ran to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
}

impl StageRecord {
    /// Creates a new pending record for a stage at the given position.
    #[must_use]
    pub fn pending(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            ordinal,
            status: StageStatus::Pending,
            error: None,
            skip_reason: None,
            duration_ms: None,
        }
    }

    /// Marks the stage as running.
    pub fn start(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = StageStatus::Running;
    }

    /// Marks the stage as passed.
    pub fn pass(&mut self, duration_ms: f64) {
        self.status = StageStatus::Passed;
        self.duration_ms = Some(duration_ms);
    }

    /// Marks the stage as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>, duration_ms: f64) {
        self.status = StageStatus::Failed;
        self.error = Some(error.into());
        self.duration_ms = Some(duration_ms);
    }

    /// Marks a never-started stage as skipped.
    pub fn skip(&mut self, reason: impl Into<String>) {
        debug_assert_eq!(self.status, StageStatus::Pending);
        self.status = StageStatus::Skipped;
        self.skip_reason = Some(reason.into());
    }

    /// Returns true if the record reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_record() {
        let record = StageRecord::pending("build", 0);
        assert_eq!(record.name, "build");
        assert_eq!(record.ordinal, 0);
        assert_eq!(record.status, StageStatus::Pending);
        assert!(record.error.is_none());
        assert!(!record.is_terminal());
    }

    #[test]
    fn test_pass_transition() {
        let mut record = StageRecord::pending("test", 1);
        record.start();
        assert_eq!(record.status, StageStatus::Running);

        record.pass(12.5);
        assert_eq!(record.status, StageStatus::Passed);
        assert_eq!(record.duration_ms, Some(12.5));
        assert!(record.is_terminal());
    }

    #[test]
    fn test_fail_transition() {
        let mut record = StageRecord::pending("deploy", 2);
        record.start();
        record.fail("connection refused", 3.0);

        assert_eq!(record.status, StageStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_skip_transition() {
        let mut record = StageRecord::pending("deploy", 2);
        record.skip("upstream stage 'test' failed");

        assert_eq!(record.status, StageStatus::Skipped);
        assert_eq!(
            record.skip_reason.as_deref(),
            Some("upstream stage 'test' failed")
        );
        assert!(record.duration_ms.is_none());
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let record = StageRecord::pending("build", 0);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains(r#""status":"pending""#));
        assert!(!json.contains("error"));
        assert!(!json.contains("skip_reason"));
        assert!(!json.contains("duration_ms"));
    }
}
