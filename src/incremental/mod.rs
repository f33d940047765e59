// src/incremental/mod.rs

//! The incremental compilation scheduler.
//!
//! - [`change_detector`] diffs modification times against the prior build
//!   record and classifies each input.
//! - [`external_deps`] walks external dependencies newer than the last build
//!   and marks the inputs they implicate.
//! - [`speculative`] expands cascading changes to their dependents.
//! - [`first_wave`] merges the three sets into the initial compile plan.
//! - [`scheduler`] owns the run state: the pending and skipped sets, the
//!   second-wave promotion logic, and the job-queue lifecycle.

pub mod change_detector;
pub mod external_deps;
pub mod first_wave;
pub mod scheduler;
pub mod speculative;

pub use change_detector::{compute_changed_inputs, ChangedInput};
pub use first_wave::FirstWavePlan;
pub use scheduler::{IncrementalScheduler, IncrementalSetup};
