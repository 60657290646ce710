//! Chunk splitting
//!
//! Partitions a finalized [`ModuleGraph`] into chunks. Roots are the entries
//! plus every split-point target that is not itself an entry. Each module is
//! owned by exactly one chunk:
//!
//! - reached (over static edges) from one root: that root's chunk
//! - matched by a shared group: that group's chunk
//! - otherwise: the chunk of the first root that reaches it

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::domain::entities::{Chunk, ChunkKind, DependencyKind, ModuleGraph};
use crate::domain::value_objects::ModuleId;

/// A shared chunk modules can be promoted into.
#[derive(Debug, Clone)]
pub struct SplitGroup {
    pub name: String,
    /// Explicit extraction by path
    pub test: Option<Regex>,
    /// Number of roots that must reach a module
    pub min_roots: usize,
}

impl SplitGroup {
    pub fn new(name: impl Into<String>, min_roots: usize) -> Self {
        Self {
            name: name.into(),
            test: None,
            min_roots,
        }
    }

    fn matches(&self, id: &ModuleId, root_count: usize) -> bool {
        let path_ok = match &self.test {
            Some(re) => re.is_match(&id.path().to_string_lossy().replace('\\', "/")),
            None => true,
        };
        path_ok && root_count >= self.min_roots
    }
}

#[derive(Debug, Clone)]
pub struct SplitPolicy {
    pub enabled: bool,
    /// Treat a cycle through split points as an error
    pub require_dag: bool,
    pub groups: Vec<SplitGroup>,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            require_dag: false,
            groups: vec![SplitGroup::new("lib", 2)],
        }
    }
}

struct Root {
    name: String,
    kind: ChunkKind,
    module: ModuleId,
}

/// Split `graph` into chunks: entry chunks in declared order, then async
/// chunks in discovery order, then non-empty shared chunks in group order.
pub fn split(graph: &ModuleGraph, policy: &SplitPolicy) -> Vec<Chunk> {
    let roots = collect_roots(graph, policy);

    // root indices reaching each module, ascending
    let mut reached_by: HashMap<&ModuleId, Vec<usize>> = HashMap::new();
    for (index, root) in roots.iter().enumerate() {
        for id in static_closure(graph, &root.module) {
            reached_by.entry(id).or_default().push(index);
        }
    }

    let mut root_members: Vec<Vec<ModuleId>> = vec![Vec::new(); roots.len()];
    let mut group_members: Vec<Vec<ModuleId>> = vec![Vec::new(); policy.groups.len()];
    for record in graph.modules() {
        let id = record.id();
        let owners = reached_by.get(id).map(Vec::as_slice).unwrap_or(&[]);
        let Some(&first) = owners.first() else {
            // only reachable through a split point that targets an entry
            root_members[0].push(id.clone());
            continue;
        };
        let is_own_root = owners.len() == 1 && roots[first].module == *id;
        let group = if policy.enabled && !is_own_root {
            policy
                .groups
                .iter()
                .position(|g| g.matches(id, owners.len()))
        } else {
            None
        };
        match group {
            Some(g) => group_members[g].push(id.clone()),
            None => root_members[first].push(id.clone()),
        }
    }

    let mut chunks = Vec::new();
    for (root, members) in roots.iter().zip(root_members) {
        if root.kind == ChunkKind::Async && members.is_empty() {
            continue;
        }
        chunks.push(
            Chunk::new(root.name.clone(), root.kind, Some(root.module.clone()))
                .with_modules(dependencies_first(graph, members)),
        );
    }
    for (group, members) in policy.groups.iter().zip(group_members) {
        if members.is_empty() {
            continue;
        }
        chunks.push(
            Chunk::new(group.name.clone(), ChunkKind::Shared, None)
                .with_modules(dependencies_first(graph, members)),
        );
    }

    debug!(
        chunks = chunks.len(),
        roots = roots.len(),
        "split module graph"
    );
    chunks
}

fn collect_roots(graph: &ModuleGraph, policy: &SplitPolicy) -> Vec<Root> {
    let mut roots: Vec<Root> = graph
        .entries()
        .iter()
        .map(|(name, id)| Root {
            name: name.clone(),
            kind: ChunkKind::Entry,
            module: id.clone(),
        })
        .collect();

    let mut taken: HashSet<String> = roots.iter().map(|r| r.name.clone()).collect();
    taken.extend(policy.groups.iter().map(|g| g.name.clone()));

    for record in graph.modules() {
        for (dep, target) in record.resolved_dependencies() {
            if dep.kind != DependencyKind::Async || roots.iter().any(|r| &r.module == target) {
                continue;
            }
            let name = unique_name(&target.stem(), &mut taken);
            roots.push(Root {
                name,
                kind: ChunkKind::Async,
                module: target.clone(),
            });
        }
    }
    roots
}

fn unique_name(stem: &str, taken: &mut HashSet<String>) -> String {
    let base = if stem.is_empty() { "chunk" } else { stem };
    let mut name = base.to_string();
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{}-{}", base, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

/// Modules reachable from `start` over static edges, including `start`.
fn static_closure<'g>(graph: &'g ModuleGraph, start: &ModuleId) -> Vec<&'g ModuleId> {
    let Some(first) = graph.get(start) else {
        return Vec::new();
    };
    let mut seen: HashSet<&ModuleId> = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![first.id()];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        out.push(id);
        if let Some(record) = graph.get(id) {
            for (dep, to) in record.resolved_dependencies() {
                if dep.kind == DependencyKind::Static {
                    if let Some(target) = graph.get(to) {
                        stack.push(target.id());
                    }
                }
            }
        }
    }
    out
}

/// Post-order DFS over static edges between `members`, starting from members
/// in discovery order, so every dependency precedes its importer.
fn dependencies_first(graph: &ModuleGraph, members: Vec<ModuleId>) -> Vec<ModuleId> {
    let in_chunk: HashSet<&ModuleId> = members.iter().collect();
    let mut done: HashSet<&ModuleId> = HashSet::new();
    let mut out = Vec::with_capacity(members.len());

    for start in &members {
        if !done.insert(start) {
            continue;
        }
        let mut stack: Vec<(&ModuleId, usize)> = vec![(start, 0)];
        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            let child = graph.get(id).and_then(|r| {
                r.resolved_dependencies()
                    .skip(next)
                    .position(|(dep, to)| dep.kind == DependencyKind::Static && in_chunk.contains(to))
                    .map(|offset| (next + offset, &r.resolved()[next + offset]))
            });
            match child {
                Some((index, to)) => {
                    top.1 = index + 1;
                    if let Some(&member) = in_chunk.get(to) {
                        if done.insert(member) {
                            stack.push((member, 0));
                        }
                    }
                }
                None => {
                    out.push(id.clone());
                    stack.pop();
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Dependency, ModuleRecord};
    use crate::domain::value_objects::{ContentHash, ModuleType};

    fn id(name: &str) -> ModuleId {
        ModuleId::new(format!("/p/{}.js", name))
    }

    fn record(name: &str, deps: &[(&str, DependencyKind)]) -> ModuleRecord {
        let dependencies = deps
            .iter()
            .map(|(d, kind)| Dependency {
                specifier: format!("./{}", d),
                kind: *kind,
            })
            .collect();
        let resolved = deps.iter().map(|(d, _)| id(d)).collect();
        ModuleRecord::new(id(name), ModuleType::Script, ContentHash::from_content(name))
            .with_dependencies(dependencies, resolved)
    }

    fn graph(entries: &[&str], records: Vec<ModuleRecord>) -> ModuleGraph {
        let entries = entries.iter().map(|e| (e.to_string(), id(e))).collect();
        let mut g = ModuleGraph::new("/p", entries);
        for r in records {
            g.insert(r);
        }
        g.finalize();
        g
    }

    fn names(chunk: &Chunk) -> Vec<String> {
        chunk.modules().iter().map(|m| m.stem()).collect()
    }

    use DependencyKind::{Async, Static};

    #[test]
    fn shared_module_is_promoted_once() {
        let g = graph(
            &["a", "b"],
            vec![
                record("a", &[("util", Static)]),
                record("b", &[("util", Static)]),
                record("util", &[]),
            ],
        );
        let chunks = split(&g, &SplitPolicy::default());
        assert_eq!(chunks.len(), 3);
        assert_eq!(names(&chunks[0]), vec!["a"]);
        assert_eq!(names(&chunks[1]), vec!["b"]);
        assert_eq!(chunks[2].name(), "lib");
        assert_eq!(chunks[2].kind(), ChunkKind::Shared);
        assert_eq!(names(&chunks[2]), vec!["util"]);
    }

    #[test]
    fn disabled_splitting_keeps_module_in_first_root() {
        let g = graph(
            &["a", "b"],
            vec![
                record("a", &[("util", Static)]),
                record("b", &[("util", Static)]),
                record("util", &[]),
            ],
        );
        let policy = SplitPolicy {
            enabled: false,
            ..SplitPolicy::default()
        };
        let chunks = split(&g, &policy);
        assert_eq!(chunks.len(), 2);
        assert_eq!(names(&chunks[0]), vec!["util", "a"]);
        assert_eq!(names(&chunks[1]), vec!["b"]);
    }

    #[test]
    fn split_point_gets_async_chunk() {
        let g = graph(
            &["main"],
            vec![
                record("main", &[("lazy", Async)]),
                record("lazy", &[("helper", Static)]),
                record("helper", &[]),
            ],
        );
        let chunks = split(&g, &SplitPolicy::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].kind(), ChunkKind::Async);
        assert_eq!(chunks[1].name(), "lazy");
        assert_eq!(chunks[1].root(), Some(&id("lazy")));
        assert_eq!(names(&chunks[1]), vec!["helper", "lazy"]);
    }

    #[test]
    fn async_names_are_deduplicated() {
        let mut taken: HashSet<String> = ["main".to_string()].into_iter().collect();
        assert_eq!(unique_name("main", &mut taken), "main-2");
        assert_eq!(unique_name("main", &mut taken), "main-3");
        assert_eq!(unique_name("page", &mut taken), "page");
    }

    #[test]
    fn explicit_group_test_extracts_single_root_modules() {
        let g = graph(
            &["main"],
            vec![
                record("main", &[("vendor", Static), ("own", Static)]),
                record("vendor", &[]),
                record("own", &[]),
            ],
        );
        let policy = SplitPolicy {
            groups: vec![SplitGroup {
                name: "vendor".to_string(),
                test: Some(Regex::new("vendor").unwrap()),
                min_roots: 1,
            }],
            ..SplitPolicy::default()
        };
        let chunks = split(&g, &policy);
        assert_eq!(names(&chunks[0]), vec!["own", "main"]);
        assert_eq!(names(&chunks[1]), vec!["vendor"]);
    }

    #[test]
    fn chunk_order_is_dependencies_first() {
        let g = graph(
            &["main"],
            vec![
                record("main", &[("a", Static), ("b", Static)]),
                record("a", &[("c", Static)]),
                record("b", &[("c", Static)]),
                record("c", &[]),
            ],
        );
        let chunks = split(&g, &SplitPolicy::default());
        assert_eq!(names(&chunks[0]), vec!["c", "a", "b", "main"]);
    }

    #[test]
    fn every_module_lands_in_exactly_one_chunk() {
        let g = graph(
            &["a", "b"],
            vec![
                record("a", &[("x", Static), ("lazy", Async)]),
                record("b", &[("x", Static), ("y", Static)]),
                record("lazy", &[("y", Static), ("z", Static)]),
                record("x", &[]),
                record("y", &[]),
                record("z", &[]),
            ],
        );
        let chunks = split(&g, &SplitPolicy::default());
        let mut all: Vec<ModuleId> = chunks.iter().flat_map(|c| c.modules().to_vec()).collect();
        all.sort();
        let mut expected: Vec<ModuleId> = g.modules().map(|r| r.id().clone()).collect();
        expected.sort();
        assert_eq!(all, expected);
    }
}
