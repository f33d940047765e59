// src/incremental/change_detector.rs

//! Classifies inputs by diffing current modification times against the
//! prior build record.

use tracing::debug;

use crate::diag::IncrementalReporter;
use crate::record::{BuildRecord, InputStatus};
use crate::types::{Input, Timestamp};

/// An input the detector decided must compile, with its prior status.
///
/// The status is what drives speculative expansion later: only
/// `NeedsCascadingBuild` cascades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedInput {
    pub input: Input,
    pub status: InputStatus,
}

/// Classify every compilable input against the record.
///
/// Returns the inputs that must compile, in input-list order. Rules, in
/// order:
///
/// 1. `UpToDate` and current mtime strictly before the build time: skip.
/// 2. `UpToDate` otherwise: schedule; the nature of the change is unknown.
/// 3. `NewlyAdded` (including inputs absent from the record): schedule.
/// 4. `NeedsCascadingBuild` / `NeedsNonCascadingBuild`: schedule.
///
/// A missing current mtime counts as infinitely future, so it always
/// schedules.
pub fn compute_changed_inputs(
    inputs: &[Input],
    record: &BuildRecord,
    reporter: Option<&IncrementalReporter>,
) -> Vec<ChangedInput> {
    let mut changed = Vec::new();

    for input in inputs.iter().filter(|i| i.is_compilable()) {
        let current = record.current_mod_time(input).unwrap_or(Timestamp::FUTURE);
        let status = record
            .info_for(input)
            .map(|info| info.status)
            .unwrap_or(InputStatus::NewlyAdded);

        let report = |message: &str| {
            if let Some(reporter) = reporter {
                reporter.report(message, Some(input));
            }
        };

        match status {
            InputStatus::UpToDate if current < record.build_time => {
                report("Skipping current");
                continue;
            }
            InputStatus::UpToDate => report("Scheduling changed input"),
            InputStatus::NewlyAdded => report("Scheduling new"),
            InputStatus::NeedsCascadingBuild => report("Scheduling cascading build"),
            InputStatus::NeedsNonCascadingBuild => report("Scheduling noncascading build"),
        }

        debug!(input = %input, ?status, "input must compile");
        changed.push(ChangedInput {
            input: input.clone(),
            status,
        });
    }

    changed
}
