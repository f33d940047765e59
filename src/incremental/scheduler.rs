// src/incremental/scheduler.rs

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::diag::{
    disabled_because, DiagnosticsSink, IncrementalReporter,
    WARN_INCREMENTAL_REQUIRES_OUTPUT_FILE_MAP,
};
use crate::engine::{Job, JobOutcome, JobQueue};
use crate::fs::FileSystem;
use crate::graph::{SharedGraph, SourcesAfterCompile};
use crate::incremental::change_detector::compute_changed_inputs;
use crate::incremental::external_deps::compute_externally_dependent_inputs;
use crate::incremental::first_wave::plan_first_wave;
use crate::incremental::speculative::compute_speculative_inputs;
use crate::opts::{CompileMode, DriverOptions};
use crate::outputs::OutputFileMap;
use crate::record::{BuildRecord, RecordError};
use crate::types::Input;

/// Everything the driver hands over when constructing the scheduler.
///
/// The build record arrives as the loader's outcome: a failed load declines
/// construction with a remark carrying the reason. A missing graph means
/// upstream graph construction failed; the gate declines silently because
/// the graph has already emitted its own remark.
pub struct IncrementalSetup {
    pub options: DriverOptions,
    pub mode: CompileMode,
    pub inputs: Vec<Input>,
    pub fs: Arc<dyn FileSystem>,
    pub output_file_map: Option<OutputFileMap>,
    pub build_record: Result<BuildRecord, RecordError>,
    pub graph: Option<SharedGraph>,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

/// Per-invocation incremental build state.
///
/// Created once per driver invocation; decides the first compilation wave at
/// construction and promotes skipped work into a second wave as compile jobs
/// finish. Lives until every compile and post-compile job has been delivered
/// through [`dynamic_jobs`].
///
/// All state mutation happens inside construction, [`job_finished`], or the
/// job-registration methods, never concurrently. The executor must deliver
/// completions one at a time; a re-entry guard turns a violation into a
/// panic instead of silent corruption.
///
/// [`dynamic_jobs`]: IncrementalScheduler::dynamic_jobs
/// [`job_finished`]: IncrementalScheduler::job_finished
#[derive(Debug)]
pub struct IncrementalScheduler {
    reporter: Option<IncrementalReporter>,
    graph: SharedGraph,
    /// The initial compile set, sorted by path.
    first_wave_inputs: Vec<Input>,
    /// Inputs whose compile jobs have been scheduled but not yet finished.
    pending_inputs: HashSet<Input>,
    /// Inputs not (yet) scheduled in this run.
    skipped_compilation_inputs: BTreeSet<Input>,
    /// Skipped compile jobs, indexed by each of their primary inputs.
    skipped_compile_jobs: HashMap<Input, Job>,
    /// Jobs to release once the pending set drains.
    post_compile_jobs: Vec<Job>,
    /// Stream of second-wave and post-compile jobs to the executor.
    dynamic_jobs: JobQueue,
    /// Re-entry guard for `job_finished`.
    handling_job_completion: bool,
}

impl IncrementalScheduler {
    /// Build the scheduler, or decline so the driver falls back to a full
    /// build.
    ///
    /// Declines when incrementality is not requested or not supported by the
    /// mode or flags, when the output file map or build record is missing or
    /// unusable, or when the dependency graph could not be built.
    pub fn try_new(setup: IncrementalSetup) -> Option<Self> {
        let IncrementalSetup {
            options,
            mode,
            inputs,
            fs,
            output_file_map,
            build_record,
            graph,
            diagnostics,
        } = setup;

        if !options.incremental {
            return None;
        }
        if !mode.supports_incremental_compilation() {
            debug!(?mode, "compile mode does not support incremental compilation");
            return None;
        }
        if options.embed_bitcode {
            debug!("-embed-bitcode disables incremental compilation");
            return None;
        }
        if output_file_map.is_none() {
            diagnostics.warning(WARN_INCREMENTAL_REQUIRES_OUTPUT_FILE_MAP);
            return None;
        }
        let record = match build_record {
            Ok(record) => record,
            Err(reason) => {
                diagnostics.remark(&disabled_because(&reason));
                return None;
            }
        };
        let graph = graph?;

        let reporter = IncrementalReporter::if_enabled(&options, &diagnostics);

        let changed = compute_changed_inputs(&inputs, &record, reporter.as_ref());
        let external = {
            let mut graph = graph.lock().unwrap();
            compute_externally_dependent_inputs(
                &mut *graph,
                record.build_time,
                fs.as_ref(),
                reporter.as_ref(),
            )
        };
        let speculative = {
            let graph = graph.lock().unwrap();
            compute_speculative_inputs(&changed, &*graph, reporter.as_ref())
        };
        let plan = plan_first_wave(
            &changed,
            &external,
            &speculative,
            &record,
            reporter.as_ref(),
        );

        let pending_inputs: HashSet<Input> = plan.first_wave.iter().cloned().collect();

        let mut scheduler = Self {
            reporter,
            graph,
            first_wave_inputs: plan.first_wave,
            pending_inputs,
            skipped_compilation_inputs: plan.skipped,
            skipped_compile_jobs: HashMap::new(),
            post_compile_jobs: Vec::new(),
            dynamic_jobs: JobQueue::new(),
            handling_job_completion: false,
        };

        // Nothing may need compiling at all; conclude immediately.
        scheduler.maybe_finished_with_compilations();

        Some(scheduler)
    }

    /// The initial compile set, in path sort order.
    pub fn first_wave_inputs(&self) -> &[Input] {
        &self.first_wave_inputs
    }

    /// Inputs still awaiting a compile completion.
    pub fn pending_inputs(&self) -> &HashSet<Input> {
        &self.pending_inputs
    }

    /// Inputs not scheduled in this run (so far).
    pub fn skipped_inputs(&self) -> &BTreeSet<Input> {
        &self.skipped_compilation_inputs
    }

    /// A consumer handle for the second-wave / post-compile job stream.
    pub fn dynamic_jobs(&self) -> JobQueue {
        self.dynamic_jobs.clone()
    }

    /// Register the compile jobs the driver built for skipped inputs, so
    /// they can be promoted later.
    ///
    /// Registering two jobs for the same primary input is a programming
    /// error and panics.
    pub fn add_skipped_compile_jobs(&mut self, jobs: Vec<Job>) {
        for job in jobs {
            for input in &job.primary_inputs {
                let prior = self.skipped_compile_jobs.insert(input.clone(), job.clone());
                assert!(
                    prior.is_none(),
                    "two skipped compile jobs registered for {input}"
                );
            }
        }
    }

    /// Register jobs that must run only after every compile has finished.
    ///
    /// While compiles are outstanding these are buffered and released by the
    /// terminal transition. If the queue has already closed (no more compile
    /// work will ever arrive) each job is appended directly instead.
    pub fn add_post_compile_jobs(&mut self, jobs: Vec<Job>) {
        for job in jobs {
            if self.dynamic_jobs.is_open() {
                self.post_compile_jobs.push(job);
            } else {
                self.dynamic_jobs.append(job);
            }
        }
    }

    /// Update incremental state when a job finishes: re-read its dependency
    /// summaries through the graph, promote previously-skipped jobs into the
    /// second wave, and drain the pending set.
    ///
    /// A non-success outcome updates state identically; aborting the build
    /// is the driver's decision.
    pub fn job_finished(&mut self, job: &Job, outcome: JobOutcome) {
        assert!(
            !self.handling_job_completion,
            "job_finished entered concurrently"
        );
        self.handling_job_completion = true;

        debug!(job = %job.description, ?outcome, "job finished");

        // After closure no further compile work may be scheduled, so late
        // completions (post-compile jobs) skip discovery entirely.
        if self.dynamic_jobs.is_open() {
            let discovered = self.collect_inputs_to_compile_after(job);
            self.schedule_second_wave(discovered);
        }

        for input in &job.primary_inputs {
            self.pending_inputs.remove(input);
        }

        self.maybe_finished_with_compilations();
        self.handling_job_completion = false;
    }

    /// Ask the graph which further inputs the just-finished job implicates.
    ///
    /// When the graph cannot answer precisely, every input currently skipped
    /// is considered potentially required. The result is sorted and
    /// deduplicated.
    fn collect_inputs_to_compile_after(&self, job: &Job) -> Vec<Input> {
        let mut graph = self.graph.lock().unwrap();
        let mut found = BTreeSet::new();

        for input in &job.primary_inputs {
            match graph.find_sources_to_compile_after(input) {
                SourcesAfterCompile::Known(sources) => found.extend(sources),
                SourcesAfterCompile::Unknown => {
                    debug!(
                        input = %input,
                        "graph cannot answer precisely; retrying everything skipped"
                    );
                    found.extend(self.skipped_compilation_inputs.iter().cloned());
                }
            }
        }

        found.into_iter().collect()
    }

    /// Promote each wave-2 input's previously-skipped job into the dynamic
    /// queue.
    fn schedule_second_wave(&mut self, inputs: Vec<Input>) {
        for input in inputs {
            self.report("Queuing because of dependencies discovered later:", Some(&input));

            let Some(job) = self.skipped_compile_jobs.remove(&input) else {
                // Already scheduled, either in the first wave or by an
                // earlier completion.
                self.report("Tried to schedule 2nd wave input again", Some(&input));
                continue;
            };

            for primary in &job.primary_inputs {
                self.skipped_compilation_inputs.remove(primary);
                self.pending_inputs.insert(primary.clone());
            }
            self.report("Scheduling for 2nd wave", Some(&input));
            self.dynamic_jobs.append(job);
        }
    }

    /// Terminal transition: once the pending set drains, release the
    /// buffered post-compile jobs and close the queue. Performed at most
    /// once; afterwards `add_post_compile_jobs` appends directly.
    fn maybe_finished_with_compilations(&mut self) {
        if !self.pending_inputs.is_empty() || !self.dynamic_jobs.is_open() {
            return;
        }

        let post = std::mem::take(&mut self.post_compile_jobs);
        info!(
            post_compile_jobs = post.len(),
            "all compilations finished; releasing post-compile jobs"
        );
        self.dynamic_jobs.extend(post);
        self.dynamic_jobs.close();
    }

    fn report(&self, message: &str, input: Option<&Input>) {
        if let Some(reporter) = &self.reporter {
            reporter.report(message, input);
        }
    }
}
