// src/diag/mod.rs

//! Diagnostics plumbing.
//!
//! The scheduler never talks to the driver's diagnostic engine directly; it
//! is handed a [`DiagnosticsSink`] at construction. Production drivers use
//! [`TracingDiagnostics`]; tests assert on [`CapturedDiagnostics`].
//!
//! Message wording here is a user-facing contract. Tools scrape these
//! strings, so they change only deliberately.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::opts::DriverOptions;
use crate::types::Input;

/// Warning emitted when `-incremental` is requested without an output file
/// map.
pub const WARN_INCREMENTAL_REQUIRES_OUTPUT_FILE_MAP: &str =
    "ignoring -incremental (currently requires an output file map)";

/// Remark explaining why incremental compilation was disabled.
pub fn disabled_because(reason: &impl std::fmt::Display) -> String {
    format!("Incremental compilation has been disabled, because {reason}")
}

/// Severity of a driver diagnostic. The scheduler only ever emits these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Remark,
}

/// One recorded diagnostic, as captured by [`CapturedDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Sink for driver diagnostics.
pub trait DiagnosticsSink: Send + Sync + Debug {
    fn warning(&self, message: &str);
    fn remark(&self, message: &str);
}

/// Production sink: forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn warning(&self, message: &str) {
        warn!("{message}");
    }

    fn remark(&self, message: &str) {
        info!("{message}");
    }
}

/// Test sink: records every diagnostic for later assertions.
#[derive(Debug, Default)]
pub struct CapturedDiagnostics {
    messages: Mutex<Vec<Diagnostic>>,
}

impl CapturedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Diagnostic> {
        self.messages.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.of_level(DiagnosticLevel::Warning)
    }

    pub fn remarks(&self) -> Vec<String> {
        self.of_level(DiagnosticLevel::Remark)
    }

    /// Remarks with the `"Incremental compilation: "` prefix stripped, i.e.
    /// the raw scheduler decision reports.
    pub fn incremental_reports(&self) -> Vec<String> {
        self.remarks()
            .into_iter()
            .filter_map(|m| m.strip_prefix("Incremental compilation: ").map(String::from))
            .collect()
    }

    fn of_level(&self, level: DiagnosticLevel) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect()
    }

    fn push(&self, level: DiagnosticLevel, message: &str) {
        self.messages.lock().unwrap().push(Diagnostic {
            level,
            message: message.to_string(),
        });
    }
}

impl DiagnosticsSink for CapturedDiagnostics {
    fn warning(&self, message: &str) {
        self.push(DiagnosticLevel::Warning, message);
    }

    fn remark(&self, message: &str) {
        self.push(DiagnosticLevel::Remark, message);
    }
}

/// Narrates incremental decisions as `"Incremental compilation: ..."`
/// remarks.
///
/// Present only when the user asked for it (`-driver-show-incremental` or a
/// show-job-lifecycle flag); callers hold an `Option<IncrementalReporter>`
/// and stay silent otherwise.
#[derive(Debug, Clone)]
pub struct IncrementalReporter {
    sink: Arc<dyn DiagnosticsSink>,
}

impl IncrementalReporter {
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { sink }
    }

    /// Construct a reporter iff the options enable decision narration.
    pub fn if_enabled(options: &DriverOptions, sink: &Arc<dyn DiagnosticsSink>) -> Option<Self> {
        options
            .wants_incremental_reports()
            .then(|| Self::new(Arc::clone(sink)))
    }

    /// Emit one decision, optionally tagged with the input it concerns.
    pub fn report(&self, message: &str, input: Option<&Input>) {
        let text = match input {
            Some(input) => format!("Incremental compilation: {message} {input}"),
            None => format!("Incremental compilation: {message}"),
        };
        self.sink.remark(&text);
    }
}
