//! Pipeline entry specifications.

use crate::gate::GateConfig;
use crate::stages::StageAction;
use std::sync::Arc;

/// Specification for a single executable stage.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique name of the stage.
    pub name: String,
    /// The action the stage invokes.
    pub action: Arc<dyn StageAction>,
}

impl StageSpec {
    /// Creates a new stage specification.
    #[must_use]
    pub fn new(name: impl Into<String>, action: Arc<dyn StageAction>) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

/// Specification for an approval gate between stages.
#[derive(Debug, Clone)]
pub struct GateSpec {
    /// The unique name of the gate.
    pub name: String,
    /// The gate configuration, including the required timeout.
    pub config: GateConfig,
}

impl GateSpec {
    /// Creates a new gate specification.
    #[must_use]
    pub fn new(name: impl Into<String>, config: GateConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// One ordered entry in a pipeline definition.
#[derive(Debug, Clone)]
pub enum PipelineEntry {
    /// An executable stage.
    Stage(StageSpec),
    /// A blocking approval gate.
    Gate(GateSpec),
}

impl PipelineEntry {
    /// Returns the entry's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Stage(spec) => &spec.name,
            Self::Gate(spec) => &spec.name,
        }
    }

    /// Returns true if the entry is a gate.
    #[must_use]
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::Gate(_))
    }
}
