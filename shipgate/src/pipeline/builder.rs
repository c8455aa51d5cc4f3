//! Pipeline builder with definition-time validation.

use super::{GateSpec, Pipeline, PipelineEntry, StageSpec};
use crate::errors::PipelineValidationError;
use crate::gate::GateConfig;
use crate::stages::StageAction;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for creating validated pipelines.
///
/// Entries run in insertion order; the model is strictly linear, so there
/// is no dependency declaration.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    entries: Vec<PipelineEntry>,
    names: HashSet<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Appends an executable stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or already used.
    pub fn stage(
        mut self,
        name: impl Into<String>,
        action: Arc<dyn StageAction>,
    ) -> Result<Self, PipelineValidationError> {
        let name = name.into();
        self.check_name(&name)?;
        self.entries.push(PipelineEntry::Stage(StageSpec::new(&name, action)));
        self.names.insert(name);
        Ok(self)
    }

    /// Appends a blocking approval gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or already used.
    pub fn gate(
        mut self,
        name: impl Into<String>,
        config: GateConfig,
    ) -> Result<Self, PipelineValidationError> {
        let name = name.into();
        self.check_name(&name)?;
        self.entries.push(PipelineEntry::Gate(GateSpec::new(&name, config)));
        self.names.insert(name);
        Ok(self)
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline name is blank or no entries were
    /// added.
    pub fn build(self) -> Result<Pipeline, PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Pipeline name cannot be empty or whitespace-only",
            ));
        }
        if self.entries.is_empty() {
            return Err(PipelineValidationError::new(format!(
                "Pipeline '{}' has no stages",
                self.name
            )));
        }
        Ok(Pipeline::new(self.name, self.entries))
    }

    fn check_name(&self, name: &str) -> Result<(), PipelineValidationError> {
        if name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Stage name cannot be empty or whitespace-only",
            ));
        }
        if self.names.contains(name) {
            return Err(PipelineValidationError::new(format!(
                "Duplicate stage name '{name}'"
            ))
            .with_stages(vec![name.to_string()]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpStage;
    use std::time::Duration;

    fn noop() -> Arc<dyn StageAction> {
        Arc::new(NoOpStage::new())
    }

    #[test]
    fn test_builds_ordered_pipeline() {
        let pipeline = PipelineBuilder::new("release")
            .stage("build", noop())
            .unwrap()
            .stage("test", noop())
            .unwrap()
            .stage("deploy", noop())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.name(), "release");
        assert_eq!(pipeline.entry_count(), 3);
        assert_eq!(
            pipeline.entry_names(),
            vec!["build", "test", "deploy"]
        );
    }

    #[test]
    fn test_gate_entry() {
        let config =
            GateConfig::new("Promote?", ["production"], Duration::from_secs(1)).unwrap();
        let pipeline = PipelineBuilder::new("release")
            .stage("deploy-staging", noop())
            .unwrap()
            .gate("promote", config)
            .unwrap()
            .stage("deploy-production", noop())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.entry_count(), 3);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = PipelineBuilder::new("release")
            .stage("build", noop())
            .unwrap()
            .stage("build", noop())
            .unwrap_err();

        assert_eq!(err.stages, vec!["build".to_string()]);
    }

    #[test]
    fn test_rejects_blank_stage_name() {
        assert!(PipelineBuilder::new("release").stage("  ", noop()).is_err());
    }

    #[test]
    fn test_rejects_empty_pipeline() {
        assert!(PipelineBuilder::new("release").build().is_err());
        assert!(PipelineBuilder::new("  ").build().is_err());
    }
}
