// src/incremental/first_wave.rs

//! Merges the change, external, and speculative sets into the first wave.

use std::collections::BTreeSet;

use tracing::info;

use crate::diag::IncrementalReporter;
use crate::incremental::change_detector::ChangedInput;
use crate::record::BuildRecord;
use crate::types::Input;

/// The initial compile plan.
#[derive(Debug, Clone, Default)]
pub struct FirstWavePlan {
    /// Inputs to compile immediately, sorted by path.
    pub first_wave: Vec<Input>,
    /// Everything the record knows about that is not in the first wave.
    pub skipped: BTreeSet<Input>,
}

/// Plan the first wave:
/// `firstWave = changed ∪ external ∪ (speculative \ changed \ external)`,
/// sorted by path for deterministic ordering. Inputs from the changed or
/// external sets are reported as "initial", speculative-only ones as
/// "dependent"; an input never gets both tags.
pub fn plan_first_wave(
    changed: &[ChangedInput],
    external: &BTreeSet<Input>,
    speculative: &BTreeSet<Input>,
    record: &BuildRecord,
    reporter: Option<&IncrementalReporter>,
) -> FirstWavePlan {
    let mut immediate: BTreeSet<Input> = changed.iter().map(|c| c.input.clone()).collect();
    immediate.extend(external.iter().cloned());

    let mut first_wave = immediate.clone();
    first_wave.extend(speculative.iter().cloned());

    if let Some(reporter) = reporter {
        for input in &first_wave {
            let tag = if immediate.contains(input) {
                "Queuing (initial):"
            } else {
                "Queuing (dependent):"
            };
            reporter.report(tag, Some(input));
        }
    }

    let skipped: BTreeSet<Input> = record
        .compilation_input_modification_dates
        .keys()
        .filter(|input| !first_wave.contains(*input))
        .cloned()
        .collect();

    if let Some(reporter) = reporter {
        for input in &skipped {
            reporter.report("Skipping:", Some(input));
        }
    }

    info!(
        first_wave = first_wave.len(),
        skipped = skipped.len(),
        "planned first compilation wave"
    );

    FirstWavePlan {
        first_wave: first_wave.into_iter().collect(),
        skipped,
    }
}
