// src/dag/graph.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::dag::registry::Registry;
use crate::errors::{Result, TomError};

/// Requirement graph derived from a [`Registry`].
///
/// Edge direction: product -> requirement. For a node declaring `a.o` with
/// `@requires "a.h"` there is an edge `a.o -> a.h`.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    index: HashMap<PathBuf, NodeIndex>,
    /// Paths that sit on a cycle, mapped to the members of that cycle.
    cyclic: HashMap<NodeIndex, usize>,
    cycles: Vec<Vec<NodeIndex>>,
}

impl DependencyGraph {
    pub fn from_registry(registry: &Registry) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<PathBuf, NodeIndex> = HashMap::new();

        let mut node_for = |graph: &mut DiGraph<PathBuf, ()>, path: &Path| -> NodeIndex {
            *index
                .entry(path.to_path_buf())
                .or_insert_with(|| graph.add_node(path.to_path_buf()))
        };

        for (product, owner) in registry.entries() {
            let from = node_for(&mut graph, product);
            let mut seen = HashSet::new();
            for req in owner.requirements() {
                let to = node_for(&mut graph, req);
                if seen.insert(to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut cyclic = HashMap::new();
        let mut cycles = Vec::new();
        for scc in tarjan_scc(&graph) {
            let is_cycle = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
            if is_cycle {
                for &n in &scc {
                    cyclic.insert(n, cycles.len());
                }
                cycles.push(scc);
            }
        }

        Self {
            graph,
            index,
            cyclic,
            cycles,
        }
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Fail with [`TomError::CycleDetected`] if anything reachable from
    /// `target` lies on a cycle.
    pub fn check_acyclic_from(&self, target: &Path) -> Result<()> {
        let Some(&start) = self.index.get(target) else {
            return Ok(());
        };

        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(n) = dfs.next(&self.graph) {
            if let Some(&cycle) = self.cyclic.get(&n) {
                let mut members: Vec<String> = self.cycles[cycle]
                    .iter()
                    .map(|m| self.graph[*m].display().to_string())
                    .collect();
                members.sort();
                return Err(TomError::CycleDetected(format!(
                    "building {} reaches a cycle between {}",
                    target.display(),
                    members.join(", ")
                )));
            }
        }

        Ok(())
    }
}
