//! Pipeline definition and sequential execution.
//!
//! A pipeline is an ordered list of entries — executable stages and
//! blocking approval gates — built through [`PipelineBuilder`] and run
//! strictly in order by [`Pipeline::run`].

mod builder;
mod run;
mod runner;
mod spec;

pub use builder::PipelineBuilder;
pub use run::{PipelineRun, RunAbort};
pub use runner::Pipeline;
pub use spec::{GateSpec, PipelineEntry, StageSpec};
