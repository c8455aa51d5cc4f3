//! The per-run context shared with stage actions.

use crate::events::{EventSink, NoOpEventSink};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Run-scoped data visible to stage actions.
///
/// One context belongs to exactly one pipeline run. The runner creates it,
/// actions read it, and the only mutation is the runner recording which
/// promotion target a gate approved so downstream stages (a production
/// deploy, typically) can read it.
pub struct RunContext {
    /// The unique ID of this run.
    run_id: Uuid,
    /// The pipeline name.
    pipeline: String,
    /// The target approved by the most recent gate, if any.
    approved_target: RwLock<Option<String>>,
    /// Sink receiving lifecycle events.
    sink: Arc<dyn EventSink>,
}

impl RunContext {
    /// Creates a new run context with a generated run ID and no-op sink.
    #[must_use]
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pipeline: pipeline.into(),
            approved_target: RwLock::new(None),
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the run ID.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Returns the promotion target approved by the most recent gate.
    ///
    /// `None` until a gate in this run resolves to approved.
    #[must_use]
    pub fn approved_target(&self) -> Option<String> {
        self.approved_target.read().clone()
    }

    /// Records the approved promotion target.
    pub fn set_approved_target(&self, target: impl Into<String>) {
        *self.approved_target.write() = Some(target.into());
    }

    /// Emits a lifecycle event without blocking.
    pub fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.sink.try_emit(event_type, data);
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("pipeline", &self.pipeline)
            .field("approved_target", &self.approved_target.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;

    #[test]
    fn test_new_context() {
        let ctx = RunContext::new("release");
        assert_eq!(ctx.pipeline(), "release");
        assert!(ctx.approved_target().is_none());
    }

    #[test]
    fn test_approved_target_roundtrip() {
        let ctx = RunContext::new("release");
        ctx.set_approved_target("production");
        assert_eq!(ctx.approved_target().as_deref(), Some("production"));
    }

    #[test]
    fn test_context_emits_to_sink() {
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = RunContext::new("release").with_event_sink(sink.clone());

        ctx.try_emit("run.started", None);
        assert_eq!(sink.event_types(), vec!["run.started"]);
    }

    #[test]
    fn test_distinct_run_ids() {
        let a = RunContext::new("release");
        let b = RunContext::new("release");
        assert_ne!(a.run_id(), b.run_id());
    }
}
