//! # Shipgate
//!
//! A staged deployment pipeline runner with promotion gates.
//!
//! Shipgate executes an ordered list of named stages strictly in
//! sequence, with support for:
//!
//! - **Sequential stage execution**: each stage passes, fails, or is
//!   skipped downstream of a prior failure — failures are never swallowed
//! - **Approval gates**: blocking promotion checkpoints that suspend the
//!   run until an actor approves a target from an enumerated choice set,
//!   denies it, or a required timeout elapses
//! - **Outcome reporting**: a structured summary is always produced, and
//!   exactly one of two notification channels fires per run
//! - **Event-driven observability**: lifecycle events for every stage and
//!   gate transition
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shipgate::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("release")
//!     .stage("build", build_action)?
//!     .stage("test", test_action)?
//!     .gate("promote", GateConfig::new("Deploy to production?", ["production"], timeout)?)?
//!     .stage("deploy-production", deploy_action)?
//!     .build()?;
//!
//! let run = pipeline.run(&gates, sink).await;
//! let summary = reporter.report(&run).await;
//! std::process::exit(summary.exit_code());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod gate;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::RunContext;
    pub use crate::core::{RunOutcome, StageRecord, StageStatus};
    pub use crate::errors::{
        GateConfigError, GateRejectedError, PipelineValidationError, ShipgateError,
        StageFailedError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::gate::{GateConfig, GateResolution, GateService, PendingGate};
    pub use crate::pipeline::{
        GateSpec, Pipeline, PipelineBuilder, PipelineEntry, PipelineRun, RunAbort, StageSpec,
    };
    pub use crate::report::{
        CollectingNotifier, LoggingNotifier, Notifier, OutcomeReporter, RunSummary, StageReport,
    };
    pub use crate::stages::{FnStage, NoOpStage, StageAction};
    pub use crate::utils::{iso_timestamp, now_utc, Timestamp};
}
