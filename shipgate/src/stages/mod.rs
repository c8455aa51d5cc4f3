//! Stage actions: the invocable units a pipeline executes.
//!
//! An action is the only contract the runner consumes from the outside
//! world. Whatever an action does internally (shelling out to a build
//! tool, calling a deploy API) is opaque to the core; all that surfaces
//! is success or failure.

use crate::context::RunContext;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait for stage actions.
#[async_trait]
pub trait StageAction: Send + Sync + Debug {
    /// Executes the action.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The run context, including any gate-approved target
    ///
    /// # Errors
    ///
    /// Returns an error when the action's work failed. The runner treats
    /// any error as a stage failure; errors are never swallowed or
    /// downgraded to success.
    async fn execute(&self, ctx: &RunContext) -> Result<()>;
}

/// A closure-backed stage action for synchronous work.
pub struct FnStage<F>
where
    F: Fn(&RunContext) -> Result<()> + Send + Sync,
{
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&RunContext) -> Result<()> + Send + Sync,
{
    /// Creates a new closure-backed action.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnStage<F>
where
    F: Fn(&RunContext) -> Result<()> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> StageAction for FnStage<F>
where
    F: Fn(&RunContext) -> Result<()> + Send + Sync,
{
    async fn execute(&self, ctx: &RunContext) -> Result<()> {
        (self.func)(ctx)
    }
}

/// An action that always succeeds and does nothing.
///
/// Useful as a placeholder while wiring up a pipeline, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStage;

impl NoOpStage {
    /// Creates a new no-op action.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StageAction for NoOpStage {
    async fn execute(&self, _ctx: &RunContext) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_fn_stage_success() {
        let stage = FnStage::new(|_ctx| Ok(()));
        let ctx = RunContext::new("test");
        assert!(stage.execute(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_fn_stage_failure_propagates() {
        let stage = FnStage::new(|_ctx| Err(anyhow!("compiler exited with status 1")));
        let ctx = RunContext::new("test");

        let err = stage.execute(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "compiler exited with status 1");
    }

    #[tokio::test]
    async fn test_fn_stage_reads_context() {
        let stage = FnStage::new(|ctx: &RunContext| {
            ctx.approved_target()
                .map(|_| ())
                .ok_or_else(|| anyhow!("no approved target"))
        });
        let ctx = RunContext::new("test");

        assert!(stage.execute(&ctx).await.is_err());
        ctx.set_approved_target("production");
        assert!(stage.execute(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_noop_stage() {
        let stage = NoOpStage::new();
        let ctx = RunContext::new("test");
        assert!(stage.execute(&ctx).await.is_ok());
    }
}
