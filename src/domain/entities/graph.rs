//! ModuleGraph entity
//!
//! Owns every [`ModuleRecord`] of a build, keyed by resolved identity. Edges are
//! not stored separately: each record carries its declared dependencies and
//! their resolved identities, and [`ModuleGraph::edges`] derives the edge list
//! from them, so the two can never disagree.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::entities::{DependencyKind, ModuleRecord};
use crate::domain::services::scc::strongly_connected;
use crate::domain::value_objects::ModuleId;

/// A directed import relation between two modules of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: ModuleId,
    pub to: ModuleId,
    pub specifier: String,
    pub kind: DependencyKind,
}

/// Non-fatal findings about the graph's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphDiagnostic {
    /// Modules importing each other statically
    StaticCycle { modules: Vec<String> },
    /// A cycle that passes through at least one split point
    AsyncCycle { modules: Vec<String> },
}

impl std::fmt::Display for GraphDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphDiagnostic::StaticCycle { modules } => {
                write!(f, "import cycle: {}", modules.join(" -> "))
            }
            GraphDiagnostic::AsyncCycle { modules } => {
                write!(f, "cycle through split point: {}", modules.join(" -> "))
            }
        }
    }
}

/// The module graph of one build.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    root: PathBuf,
    entries: Vec<(String, ModuleId)>,
    modules: HashMap<ModuleId, ModuleRecord>,
    order: Vec<ModuleId>,
}

impl ModuleGraph {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<(String, ModuleId)>) -> Self {
        Self {
            root: root.into(),
            entries,
            modules: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Logical entry names and their modules, in declared order
    pub fn entries(&self) -> &[(String, ModuleId)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(id)
    }

    pub fn get(&self, id: &ModuleId) -> Option<&ModuleRecord> {
        self.modules.get(id)
    }

    /// Insert or replace a record. Call [`Self::finalize`] once all writes of a
    /// pass are done.
    pub fn insert(&mut self, record: ModuleRecord) {
        self.modules.insert(record.id().clone(), record);
    }

    /// Drop a record. Edges pointing at it dangle until [`Self::finalize`]
    /// and [`Self::dangling_edges`] say otherwise.
    pub fn remove(&mut self, id: &ModuleId) -> Option<ModuleRecord> {
        self.modules.remove(id)
    }

    /// Records in discovery order (valid after [`Self::finalize`])
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.order.iter().filter_map(|id| self.modules.get(id))
    }

    /// Every identity whose path is `path`, regardless of query
    pub fn ids_for_path(&self, path: &Path) -> Vec<ModuleId> {
        let mut ids: Vec<ModuleId> = self
            .modules
            .keys()
            .filter(|id| id.path() == path)
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Display name of a module relative to the project root
    pub fn display_name(&self, id: &ModuleId) -> String {
        id.display_name(&self.root)
    }

    /// All edges in discovery order of their source module
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.modules()
            .flat_map(|record| {
                record
                    .resolved_dependencies()
                    .map(move |(dep, to)| DependencyEdge {
                        from: record.id().clone(),
                        to: to.clone(),
                        specifier: dep.specifier.clone(),
                        kind: dep.kind,
                    })
            })
            .collect()
    }

    /// Modules that import `id`, sorted by identity
    pub fn importers(&self, id: &ModuleId) -> Vec<ModuleId> {
        let mut importers: Vec<ModuleId> = self
            .modules
            .values()
            .filter(|r| r.resolved().contains(id))
            .map(|r| r.id().clone())
            .collect();
        importers.sort();
        importers.dedup();
        importers
    }

    /// Recompute discovery order and drop modules no entry reaches.
    ///
    /// Order is a depth-first pre-order from the entries in declared order,
    /// following dependencies in declared order, so it never depends on the
    /// order in which records were inserted. Returns the removed identities.
    pub fn finalize(&mut self) -> Vec<ModuleId> {
        let mut visited: HashSet<ModuleId> = HashSet::new();
        let mut order: Vec<ModuleId> = Vec::new();

        for (_, entry) in &self.entries {
            if !self.modules.contains_key(entry) || !visited.insert(entry.clone()) {
                continue;
            }
            order.push(entry.clone());
            let mut stack: Vec<(ModuleId, usize)> = vec![(entry.clone(), 0)];
            while let Some(top) = stack.last_mut() {
                let next = self
                    .modules
                    .get(&top.0)
                    .and_then(|r| r.resolved().get(top.1))
                    .cloned();
                match next {
                    Some(child) => {
                        top.1 += 1;
                        if self.modules.contains_key(&child) && visited.insert(child.clone()) {
                            order.push(child.clone());
                            stack.push((child, 0));
                        }
                    }
                    None => {
                        stack.pop();
                    }
                }
            }
        }

        let mut removed: Vec<ModuleId> = self
            .modules
            .keys()
            .filter(|id| !visited.contains(*id))
            .cloned()
            .collect();
        removed.sort();
        for id in &removed {
            self.modules.remove(id);
        }

        for (index, id) in order.iter().enumerate() {
            if let Some(record) = self.modules.get_mut(id) {
                record.set_discovery(index);
            }
        }
        self.order = order;
        removed
    }

    /// Edges whose target is missing from the graph. Empty for a valid graph.
    pub fn dangling_edges(&self) -> Vec<DependencyEdge> {
        let mut dangling: Vec<DependencyEdge> = self
            .modules
            .values()
            .flat_map(|record| {
                record
                    .resolved_dependencies()
                    .filter(|(_, to)| !self.modules.contains_key(*to))
                    .map(move |(dep, to)| DependencyEdge {
                        from: record.id().clone(),
                        to: to.clone(),
                        specifier: dep.specifier.clone(),
                        kind: dep.kind,
                    })
            })
            .collect();
        dangling.sort_by(|a, b| (&a.from, &a.specifier).cmp(&(&b.from, &b.specifier)));
        dangling
    }

    /// Every module reachable from `id` (excluding `id` unless it is on a cycle)
    pub fn transitive_dependencies(&self, id: &ModuleId) -> BTreeSet<ModuleId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&ModuleId> = self
            .get(id)
            .map(|r| r.resolved().iter().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if seen.insert(next.clone()) {
                if let Some(record) = self.get(next) {
                    stack.extend(record.resolved().iter());
                }
            }
        }
        seen
    }

    /// Cycle diagnostics, in discovery order.
    pub fn diagnostics(&self) -> Vec<GraphDiagnostic> {
        let ids: Vec<&ModuleId> = self.order.iter().collect();
        let index: HashMap<&ModuleId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut async_edges: HashSet<(usize, usize)> = HashSet::new();
        for (i, id) in ids.iter().enumerate() {
            let Some(record) = self.get(id) else { continue };
            for (dep, to) in record.resolved_dependencies() {
                if let Some(&j) = index.get(to) {
                    adjacency[i].push(j);
                    if dep.kind == DependencyKind::Async {
                        async_edges.insert((i, j));
                    }
                }
            }
        }

        let mut diagnostics = Vec::new();
        for component in strongly_connected(&adjacency) {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&v| adjacency[v].contains(&v));
            if !cyclic {
                continue;
            }
            let members: HashSet<usize> = component.iter().copied().collect();
            let through_split = async_edges
                .iter()
                .any(|(a, b)| members.contains(a) && members.contains(b));
            let modules: Vec<String> = component
                .iter()
                .map(|&i| self.display_name(ids[i]))
                .collect();
            diagnostics.push(if through_split {
                GraphDiagnostic::AsyncCycle { modules }
            } else {
                GraphDiagnostic::StaticCycle { modules }
            });
        }
        diagnostics.sort_by_key(|d| match d {
            GraphDiagnostic::StaticCycle { modules } | GraphDiagnostic::AsyncCycle { modules } => {
                modules.first().cloned()
            }
        });
        diagnostics
    }
}
