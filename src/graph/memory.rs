// src/graph/memory.rs

//! In-memory reference implementation of [`ModuleDependencyGraph`].
//!
//! Adjacency lives in a petgraph `DiGraphMap` whose nodes are summary-node
//! ids; an edge `a -> b` means "b depends on a", so dependents are reached
//! by walking outgoing edges. Post-compile answers are programmable, which
//! is what makes this graph a convenient oracle for tests and tools.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use tracing::debug;

use super::{DepsNodeId, ExternalDependency, ModuleDependencyGraph, SourcesAfterCompile};
use crate::types::Input;

#[derive(Debug, Default)]
pub struct InMemoryDependencyGraph {
    adjacency: DiGraphMap<u32, ()>,
    /// Summary node id -> owning input. `None` models an orphaned summary.
    sources: Vec<Option<Input>>,
    nodes_by_input: HashMap<Input, u32>,
    externals: Vec<ExternalDependency>,
    /// External dep name -> summary nodes directly depending on it.
    external_dependents: HashMap<String, Vec<DepsNodeId>>,
    traced: HashSet<DepsNodeId>,
    /// Programmed answers for `find_sources_to_compile_after`. Missing entry
    /// means "nothing further discovered".
    after_compile: HashMap<Input, SourcesAfterCompile>,
}

impl InMemoryDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input and its summary node, idempotently.
    pub fn add_source(&mut self, input: Input) -> DepsNodeId {
        if let Some(&id) = self.nodes_by_input.get(&input) {
            return DepsNodeId(id);
        }
        let id = self.sources.len() as u32;
        self.sources.push(Some(input.clone()));
        self.nodes_by_input.insert(input, id);
        self.adjacency.add_node(id);
        DepsNodeId(id)
    }

    /// Register a summary node with no owning input.
    pub fn add_orphan_node(&mut self) -> DepsNodeId {
        let id = self.sources.len() as u32;
        self.sources.push(None);
        self.adjacency.add_node(id);
        DepsNodeId(id)
    }

    /// Record that `dependent` depends on `dependency`.
    pub fn add_dependency(&mut self, dependent: &Input, dependency: &Input) {
        let dependent = self.add_source(dependent.clone());
        let dependency = self.add_source(dependency.clone());
        self.adjacency.add_edge(dependency.0, dependent.0, ());
    }

    pub fn add_external(&mut self, dep: ExternalDependency) {
        if !self.externals.contains(&dep) {
            self.externals.push(dep);
        }
    }

    /// Record that `node` directly depends on the external dep `name`.
    pub fn add_external_dependent(&mut self, name: &str, node: DepsNodeId) {
        self.external_dependents
            .entry(name.to_string())
            .or_default()
            .push(node);
    }

    /// Program the answer returned once `input`'s compile finishes.
    pub fn set_sources_after_compile(&mut self, input: &Input, answer: SourcesAfterCompile) {
        self.after_compile.insert(input.clone(), answer);
    }
}

impl ModuleDependencyGraph for InMemoryDependencyGraph {
    fn external_dependencies(&self) -> Vec<ExternalDependency> {
        self.externals.clone()
    }

    fn for_each_untraced_dependent(
        &mut self,
        dep: &ExternalDependency,
        visit: &mut dyn FnMut(DepsNodeId),
    ) {
        let nodes = self
            .external_dependents
            .get(&dep.name)
            .cloned()
            .unwrap_or_default();
        for node in nodes {
            if self.traced.insert(node) {
                visit(node);
            } else {
                debug!(node = node.0, dep = %dep.name, "summary already traced; skipping");
            }
        }
    }

    fn source_of(&self, node: DepsNodeId) -> Option<Input> {
        self.sources.get(node.0 as usize).cloned().flatten()
    }

    fn find_dependent_sources(&self, input: &Input) -> Vec<Input> {
        let Some(&start) = self.nodes_by_input.get(input) else {
            return Vec::new();
        };

        let mut dependents = Vec::new();
        let mut dfs = Dfs::new(&self.adjacency, start);
        while let Some(node) = dfs.next(&self.adjacency) {
            if node == start {
                continue;
            }
            if let Some(source) = self.source_of(DepsNodeId(node)) {
                dependents.push(source);
            }
        }
        dependents
    }

    fn find_sources_to_compile_after(&mut self, input: &Input) -> SourcesAfterCompile {
        self.after_compile
            .get(input)
            .cloned()
            .unwrap_or_else(|| SourcesAfterCompile::Known(Vec::new()))
    }
}
