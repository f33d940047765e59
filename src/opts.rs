// src/opts.rs

//! Driver options and compiler modes, as observed by the scheduler.
//!
//! Option parsing itself belongs to the driver; the scheduler only looks at
//! the handful of flags that gate incremental compilation.

/// The already-parsed driver flags the scheduler cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverOptions {
    /// `-incremental`: the user asked for incremental compilation.
    pub incremental: bool,
    /// `-driver-show-incremental`: narrate every incremental decision.
    pub driver_show_incremental: bool,
    /// `-embed-bitcode`: incompatible with incremental builds.
    pub embed_bitcode: bool,
    /// Any of the show-job-lifecycle flags; also enables decision reports.
    pub show_job_lifecycle: bool,
}

impl DriverOptions {
    /// Whether incremental decisions should be narrated to the diagnostics
    /// sink.
    pub fn wants_incremental_reports(&self) -> bool {
        self.driver_show_incremental || self.show_job_lifecycle
    }
}

/// How the compiler was asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// One frontend invocation per input (or per batch); the normal mode.
    StandardCompile,
    /// Batched frontend invocations over the standard pipeline.
    BatchCompile,
    /// Compile and run immediately.
    Immediate,
    /// Interactive read-eval-print loop.
    Repl,
    /// Whole-module builds compile everything at once; nothing to skip.
    WholeModule,
    /// Precompiled-module emission; also all-or-nothing.
    PrecompileModule,
}

impl CompileMode {
    /// Modes in which per-input scheduling is meaningful.
    pub fn supports_incremental_compilation(self) -> bool {
        matches!(
            self,
            CompileMode::StandardCompile
                | CompileMode::BatchCompile
                | CompileMode::Immediate
                | CompileMode::Repl
        )
    }
}
