//! Graph inspection for `sheaf graph`

use serde::Serialize;

use crate::domain::entities::{Chunk, ChunkKind, DependencyKind, GraphDiagnostic, ModuleGraph};
use crate::domain::value_objects::{ModuleId, ModuleType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleListing {
    pub name: String,
    pub module_type: ModuleType,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeListing {
    pub from: String,
    pub to: String,
    pub specifier: String,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkListing {
    pub name: String,
    pub kind: ChunkKind,
    pub modules: Vec<String>,
}

/// Modules, edges and chunks of a project, with names relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    pub entries: Vec<(String, String)>,
    pub modules: Vec<ModuleListing>,
    pub edges: Vec<EdgeListing>,
    pub chunks: Vec<ChunkListing>,
    pub diagnostics: Vec<GraphDiagnostic>,
}

impl GraphReport {
    pub fn new(graph: &ModuleGraph, chunks: &[Chunk]) -> Self {
        let name = |id: &ModuleId| graph.display_name(id);
        Self {
            entries: graph
                .entries()
                .iter()
                .map(|(logical, id)| (logical.clone(), name(id)))
                .collect(),
            modules: graph
                .modules()
                .map(|r| ModuleListing {
                    name: name(r.id()),
                    module_type: r.module_type(),
                    size: r.output().len(),
                })
                .collect(),
            edges: graph
                .edges()
                .into_iter()
                .map(|e| EdgeListing {
                    from: name(&e.from),
                    to: name(&e.to),
                    specifier: e.specifier,
                    kind: e.kind,
                })
                .collect(),
            chunks: chunks
                .iter()
                .map(|c| ChunkListing {
                    name: c.name().to_string(),
                    kind: c.kind(),
                    modules: c.modules().iter().map(name).collect(),
                })
                .collect(),
            diagnostics: graph.diagnostics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ModuleRecord;
    use crate::domain::value_objects::ContentHash;

    #[test]
    fn names_are_relative_to_root() {
        let main = ModuleId::new("/p/src/main.js");
        let util = ModuleId::new("/p/src/util.js");
        let mut graph = ModuleGraph::new("/p", vec![("app".to_string(), main.clone())]);
        graph.insert(
            ModuleRecord::new(main.clone(), ModuleType::Script, ContentHash::from_content("m"))
                .with_output("require(\"./util\");".to_string(), Vec::new(), None)
                .with_dependencies(
                    vec![crate::domain::entities::Dependency::new("./util")],
                    vec![util.clone()],
                ),
        );
        graph.insert(ModuleRecord::new(util.clone(), ModuleType::Script, ContentHash::from_content("u")));
        graph.finalize();
        let chunks = vec![Chunk::new("app", ChunkKind::Entry, Some(main.clone()))
            .with_modules(vec![util.clone(), main.clone()])];

        let report = GraphReport::new(&graph, &chunks);

        assert_eq!(report.entries, vec![("app".to_string(), "src/main.js".to_string())]);
        assert_eq!(report.modules.len(), 2);
        assert_eq!(report.edges[0].from, "src/main.js");
        assert_eq!(report.edges[0].to, "src/util.js");
        assert_eq!(report.edges[0].kind, DependencyKind::Static);
        assert_eq!(report.chunks[0].modules, vec!["src/util.js", "src/main.js"]);
    }
}
