// src/incremental/external_deps.rs

//! Scans external dependencies (headers, interface files) for changes since
//! the last build.

use std::collections::BTreeSet;

use tracing::debug;

use crate::diag::IncrementalReporter;
use crate::fs::{mod_time_or_future, FileSystem};
use crate::graph::ModuleDependencyGraph;
use crate::types::{Input, Timestamp};

/// Inputs implicated by external dependencies modified at or after the prior
/// build time.
///
/// A dependency without a path or a readable mtime counts as infinitely
/// future and always schedules its dependents. The graph's traced bits
/// ensure a given summary node is collected at most once per scheduler pass;
/// summaries with no owning input are dropped.
pub fn compute_externally_dependent_inputs(
    graph: &mut dyn ModuleDependencyGraph,
    build_time: Timestamp,
    fs: &dyn FileSystem,
    reporter: Option<&IncrementalReporter>,
) -> BTreeSet<Input> {
    let mut scheduled = BTreeSet::new();

    for dep in graph.external_dependencies() {
        let ext_mod_time = dep
            .path
            .as_deref()
            .map(|p| mod_time_or_future(fs, p))
            .unwrap_or(Timestamp::FUTURE);

        if ext_mod_time < build_time {
            debug!(dep = %dep.name, "external dependency unchanged since last build");
            continue;
        }

        let mut nodes = Vec::new();
        graph.for_each_untraced_dependent(&dep, &mut |node| nodes.push(node));

        for node in nodes {
            let Some(input) = graph.source_of(node) else {
                debug!(node = node.0, "summary node has no owning input; dropped");
                continue;
            };
            if scheduled.insert(input.clone()) {
                if let Some(reporter) = reporter {
                    reporter.report(
                        &format!(
                            "Scheduling externally-dependent on newer {}",
                            dep.basename()
                        ),
                        Some(&input),
                    );
                }
            }
        }
    }

    scheduled
}
