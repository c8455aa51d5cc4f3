//! Core domain model types for shipgate.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage status and overall run outcome enums
//! - The per-stage record owned by a run

mod record;
mod status;

pub use record::StageRecord;
pub use status::{RunOutcome, StageStatus};
