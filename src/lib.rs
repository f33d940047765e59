// src/lib.rs

//! Incremental compilation scheduling for a compiler driver.
//!
//! Given the driver's input list, the persisted build record of the previous
//! run, and the module dependency graph, [`IncrementalScheduler`] decides
//! which inputs must recompile now (the first wave) and discovers further
//! work as compile jobs finish (the second wave), streaming jobs to the
//! executor through a closeable [`JobQueue`] and releasing post-compile jobs
//! once the pending set drains.
//!
//! The graph, the executor, and the filesystem are reached only through
//! traits, so the whole scheduler runs against fakes in tests.

pub mod diag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod incremental;
pub mod logging;
pub mod opts;
pub mod outputs;
pub mod record;
pub mod types;

pub use diag::{DiagnosticsSink, IncrementalReporter};
pub use engine::{ExecutorBackend, Job, JobOutcome, JobQueue, Runtime, RuntimeEvent};
pub use graph::{ModuleDependencyGraph, SharedGraph, SourcesAfterCompile};
pub use incremental::{IncrementalScheduler, IncrementalSetup};
pub use opts::{CompileMode, DriverOptions};
pub use record::{BuildRecord, InputStatus};
pub use types::{Input, InputKind, Timestamp};
