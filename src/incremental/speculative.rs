// src/incremental/speculative.rs

//! Speculative expansion of cascading changes to their dependents.

use std::collections::BTreeSet;

use tracing::debug;

use crate::diag::IncrementalReporter;
use crate::graph::ModuleDependencyGraph;
use crate::incremental::change_detector::ChangedInput;
use crate::record::InputStatus;
use crate::types::Input;

/// Dependents of every cascading changed input, excluding the cascading set
/// itself.
///
/// If a file previously required a cascading rebuild, its public interface
/// is suspect, so its dependents are queued eagerly even though the fresh
/// dependency summary (available only after it recompiles) may show fewer
/// are truly needed. The set is approximate either way; the second wave
/// converges on the true one.
pub fn compute_speculative_inputs(
    changed: &[ChangedInput],
    graph: &dyn ModuleDependencyGraph,
    reporter: Option<&IncrementalReporter>,
) -> BTreeSet<Input> {
    let cascading: BTreeSet<&Input> = changed
        .iter()
        .filter(|c| c.status.is_cascading())
        .map(|c| &c.input)
        .collect();

    let report = |message: String| {
        if let Some(reporter) = reporter {
            reporter.report(&message, None);
        }
    };

    let mut speculative = BTreeSet::new();

    for change in changed {
        match change.status {
            InputStatus::NeedsCascadingBuild => {
                for dependent in graph.find_dependent_sources(&change.input) {
                    if cascading.contains(&dependent) {
                        continue;
                    }
                    if speculative.insert(dependent.clone()) {
                        debug!(
                            dependent = %dependent,
                            of = %change.input,
                            "speculatively scheduling dependent"
                        );
                    }
                }
            }
            InputStatus::UpToDate => report(format!(
                "not scheduling dependents of {}; unknown changes",
                change.input
            )),
            InputStatus::NewlyAdded => report(format!(
                "not scheduling dependents of newly-added {}",
                change.input
            )),
            InputStatus::NeedsNonCascadingBuild => report(format!(
                "not scheduling dependents of {}: does not need cascading build",
                change.input
            )),
        }
    }

    speculative
}
