#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use incdrive::diag::CapturedDiagnostics;
use incdrive::engine::Job;
use incdrive::fs::MockFileSystem;
use incdrive::graph::{
    shared, DepsNodeId, ExternalDependency, InMemoryDependencyGraph, SharedGraph,
    SourcesAfterCompile,
};
use incdrive::incremental::IncrementalSetup;
use incdrive::outputs::OutputFileMap;
use incdrive::record::{BuildRecord, InputInfo, InputStatus, RecordError};
use incdrive::{CompileMode, DriverOptions, Input, Timestamp};

/// Shorthand for a compilable source input.
pub fn source(path: &str) -> Input {
    Input::source(path)
}

/// Shorthand for a single-input compile job with no command line.
pub fn compile_job(path: &str) -> Job {
    Job::compiling(source(path))
}

/// Builder for [`BuildRecord`] snapshots, bypassing the on-disk format.
pub struct BuildRecordBuilder {
    record: BuildRecord,
}

impl BuildRecordBuilder {
    pub fn new() -> Self {
        Self {
            record: BuildRecord::default(),
        }
    }

    pub fn built_at(mut self, secs: u64) -> Self {
        self.record.build_time = Timestamp::from_secs(secs);
        self
    }

    /// Record a prior input with its status and previous mtime.
    pub fn prior_input(mut self, path: &str, status: InputStatus, mod_secs: u64) -> Self {
        self.record.input_infos.insert(
            PathBuf::from(path),
            InputInfo {
                status,
                previous_mod_time: Timestamp::from_secs(mod_secs),
            },
        );
        self
    }

    /// Record the current mtime captured for an input at startup.
    pub fn current_mtime(mut self, path: &str, mod_secs: u64) -> Self {
        self.record
            .compilation_input_modification_dates
            .insert(source(path), Timestamp::from_secs(mod_secs));
        self
    }

    /// Mark an input's current mtime as unreadable (infinitely future).
    pub fn current_mtime_missing(mut self, path: &str) -> Self {
        self.record
            .compilation_input_modification_dates
            .insert(source(path), Timestamp::FUTURE);
        self
    }

    pub fn build(self) -> BuildRecord {
        self.record
    }
}

impl Default for BuildRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the in-memory dependency graph used as the test oracle.
pub struct GraphBuilder {
    graph: InMemoryDependencyGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: InMemoryDependencyGraph::new(),
        }
    }

    pub fn source(mut self, path: &str) -> Self {
        self.graph.add_source(source(path));
        self
    }

    /// `dependent` depends on `dependency`.
    pub fn dependency(mut self, dependent: &str, dependency: &str) -> Self {
        self.graph
            .add_dependency(&source(dependent), &source(dependency));
        self
    }

    pub fn external(mut self, name: &str, path: Option<&str>) -> Self {
        self.graph
            .add_external(ExternalDependency::new(name, path.map(PathBuf::from)));
        self
    }

    /// `path`'s summary node directly depends on the external dep `name`.
    pub fn external_dependent(mut self, name: &str, path: &str) -> Self {
        let node = self.graph.add_source(source(path));
        self.graph.add_external_dependent(name, node);
        self
    }

    /// An orphaned summary node (no owning input) depending on `name`.
    pub fn orphan_external_dependent(mut self, name: &str) -> Self {
        let node: DepsNodeId = self.graph.add_orphan_node();
        self.graph.add_external_dependent(name, node);
        self
    }

    /// Program the post-compile answer for `path`.
    pub fn sources_after(mut self, path: &str, discovered: &[&str]) -> Self {
        self.graph.set_sources_after_compile(
            &source(path),
            SourcesAfterCompile::Known(discovered.iter().map(|p| source(p)).collect()),
        );
        self
    }

    /// Make the graph unable to answer precisely for `path`.
    pub fn sources_after_unknown(mut self, path: &str) -> Self {
        self.graph
            .set_sources_after_compile(&source(path), SourcesAfterCompile::Unknown);
        self
    }

    pub fn build_shared(self) -> SharedGraph {
        shared(self.graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`IncrementalSetup`] with everything faked and eligible by
/// default: incremental requested, standard compile mode, reports enabled,
/// empty output file map present, empty record, empty graph.
pub struct SetupBuilder {
    options: DriverOptions,
    mode: CompileMode,
    inputs: Vec<Input>,
    fs: MockFileSystem,
    output_file_map: Option<OutputFileMap>,
    build_record: Result<BuildRecord, RecordError>,
    graph: Option<SharedGraph>,
    diagnostics: Arc<CapturedDiagnostics>,
}

impl SetupBuilder {
    pub fn new() -> Self {
        Self {
            options: DriverOptions {
                incremental: true,
                driver_show_incremental: true,
                embed_bitcode: false,
                show_job_lifecycle: false,
            },
            mode: CompileMode::StandardCompile,
            inputs: Vec::new(),
            fs: MockFileSystem::new(),
            output_file_map: Some(OutputFileMap::new()),
            build_record: Ok(BuildRecord::default()),
            graph: Some(GraphBuilder::new().build_shared()),
            diagnostics: Arc::new(CapturedDiagnostics::new()),
        }
    }

    pub fn options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mode(mut self, mode: CompileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn inputs(mut self, paths: &[&str]) -> Self {
        self.inputs = paths.iter().map(|p| source(p)).collect();
        self
    }

    pub fn fs(mut self, fs: MockFileSystem) -> Self {
        self.fs = fs;
        self
    }

    pub fn no_output_file_map(mut self) -> Self {
        self.output_file_map = None;
        self
    }

    pub fn record(mut self, record: BuildRecord) -> Self {
        self.build_record = Ok(record);
        self
    }

    pub fn record_error(mut self, error: RecordError) -> Self {
        self.build_record = Err(error);
        self
    }

    pub fn graph(mut self, graph: SharedGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn no_graph(mut self) -> Self {
        self.graph = None;
        self
    }

    /// Handle to the captured diagnostics, for assertions after `build()`.
    pub fn diagnostics(&self) -> Arc<CapturedDiagnostics> {
        Arc::clone(&self.diagnostics)
    }

    /// Handle to the mock filesystem, for mutating files after `build()`.
    pub fn mock_fs(&self) -> MockFileSystem {
        self.fs.clone()
    }

    pub fn build(self) -> IncrementalSetup {
        IncrementalSetup {
            options: self.options,
            mode: self.mode,
            inputs: self.inputs,
            fs: Arc::new(self.fs),
            output_file_map: self.output_file_map,
            build_record: self.build_record,
            graph: self.graph,
            diagnostics: self.diagnostics,
        }
    }
}

impl Default for SetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
