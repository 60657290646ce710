//! Property tests for chunk splitting over random module graphs.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use sheaf::domain::entities::{ChunkKind, Dependency, ModuleRecord};
use sheaf::domain::services::{split, SplitPolicy};
use sheaf::domain::value_objects::{ContentHash, ModuleType};
use sheaf::{ModuleGraph, ModuleId};

/// Edge lists per module: `(target, is_split_point)`. Every module after the
/// first hangs off an earlier one, so all of them are reachable from `m0`.
#[derive(Debug, Clone)]
struct GraphShape {
    edges: Vec<Vec<(usize, bool)>>,
    second_entry: bool,
}

fn graph_shape() -> impl Strategy<Value = GraphShape> {
    (2usize..9).prop_flat_map(|n| {
        (
            proptest::collection::vec((any::<usize>(), any::<bool>()), n),
            proptest::collection::vec((0..n, 0..n, any::<bool>()), 0..n),
            any::<bool>(),
        )
            .prop_map(move |(parents, extra, second_entry)| {
                let mut edges = vec![Vec::new(); n];
                for (i, (raw, lazy)) in parents.into_iter().enumerate().skip(1) {
                    edges[raw % i].push((i, lazy));
                }
                for (from, to, lazy) in extra {
                    if from != to && !edges[from].iter().any(|(t, _)| *t == to) {
                        edges[from].push((to, lazy));
                    }
                }
                GraphShape {
                    edges,
                    second_entry,
                }
            })
    })
}

fn id(i: usize) -> ModuleId {
    ModuleId::new(format!("/p/src/m{}.js", i))
}

fn build_graph(shape: &GraphShape) -> ModuleGraph {
    let mut entries = vec![("main".to_string(), id(0))];
    if shape.second_entry {
        entries.push(("second".to_string(), id(1)));
    }
    let mut graph = ModuleGraph::new("/p", entries);
    for (i, edges) in shape.edges.iter().enumerate() {
        let deps = edges
            .iter()
            .map(|(to, lazy)| {
                let specifier = format!("./m{}", to);
                if *lazy {
                    Dependency::split_point(specifier)
                } else {
                    Dependency::new(specifier)
                }
            })
            .collect();
        let resolved = edges.iter().map(|(to, _)| id(*to)).collect();
        graph.insert(
            ModuleRecord::new(id(i), ModuleType::Script, ContentHash::from_content(&i.to_string()))
                .with_dependencies(deps, resolved),
        );
    }
    graph.finalize();
    graph
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every module of the graph is owned by exactly one chunk.
    #[test]
    fn property_every_module_in_exactly_one_chunk(shape in graph_shape()) {
        let graph = build_graph(&shape);
        let chunks = split(&graph, &SplitPolicy::default());

        let mut owners: BTreeMap<ModuleId, usize> = BTreeMap::new();
        for chunk in &chunks {
            for module in chunk.modules() {
                *owners.entry(module.clone()).or_default() += 1;
            }
        }

        prop_assert_eq!(owners.len(), graph.len());
        for record in graph.modules() {
            prop_assert_eq!(owners.get(record.id()).copied(), Some(1), "module {}", record.id());
        }
    }

    /// PROPERTY: chunk names are unique and entry chunks come first, in the
    /// order the entries were declared.
    #[test]
    fn property_chunk_names_unique_entries_first(shape in graph_shape()) {
        let graph = build_graph(&shape);
        let chunks = split(&graph, &SplitPolicy::default());

        let names: HashSet<&str> = chunks.iter().map(|c| c.name()).collect();
        prop_assert_eq!(names.len(), chunks.len());

        let entry_names: Vec<&str> = chunks
            .iter()
            .take_while(|c| c.kind() == ChunkKind::Entry)
            .map(|c| c.name())
            .collect();
        let expected: Vec<&str> = graph.entries().iter().map(|(n, _)| n.as_str()).collect();
        prop_assert_eq!(entry_names, expected);
        prop_assert!(chunks.iter().skip(graph.entries().len()).all(|c| c.kind() != ChunkKind::Entry));
    }

    /// PROPERTY: splitting the same graph twice yields the same chunks.
    #[test]
    fn property_split_is_deterministic(shape in graph_shape()) {
        let graph = build_graph(&shape);
        let first = split(&graph, &SplitPolicy::default());
        let second = split(&graph, &SplitPolicy::default());
        prop_assert_eq!(first, second);
    }
}
