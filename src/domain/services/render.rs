//! Chunk script rendering
//!
//! A chunk script registers each of its modules with the shared runtime
//! object. Entry chunks additionally carry the runtime itself and finish with
//! a bootstrap call. Module ids are root-relative display names so bundles
//! are identical across machines.

use std::fmt::Write;

use crate::domain::entities::{Chunk, ChunkKind, DependencyKind, ModuleGraph, ModuleRecord};
use crate::domain::ports::transform::{substitute_markers, Marker};
use crate::domain::value_objects::ModuleId;

/// Registry guard every chunk starts with; safe to evaluate repeatedly.
const REGISTRY: &str = r#"var __sheaf = (globalThis.__sheaf = globalThis.__sheaf || { modules: {} });
__sheaf.define = __sheaf.define || function (id, deps, factory) {
  __sheaf.modules[id] = { deps: deps, factory: factory };
};
"#;

/// Module loader, split-point loader and interop helper. `__BASE__` is
/// replaced with the public path.
const RUNTIME: &str = r#"__sheaf.cache = __sheaf.cache || {};
__sheaf.chunks = __sheaf.chunks || {};
__sheaf.base = __sheaf.base || __BASE__;
__sheaf.interop = __sheaf.interop || function (m) {
  return m && m.__esModule ? m : { default: m };
};
__sheaf.load = __sheaf.load || function (path) {
  if (!__sheaf.chunks[path]) {
    __sheaf.chunks[path] = new Promise(function (resolve, reject) {
      var script = document.createElement("script");
      script.src = __sheaf.base + path;
      script.onload = resolve;
      script.onerror = function () { reject(new Error("sheaf: failed to load " + path)); };
      document.head.appendChild(script);
    });
  }
  return __sheaf.chunks[path];
};
__sheaf.require = __sheaf.require || function (id) {
  var cached = __sheaf.cache[id];
  if (cached) return cached.exports;
  var entry = __sheaf.modules[id];
  if (!entry) throw new Error("sheaf: module not loaded: " + id);
  var module = (__sheaf.cache[id] = { exports: {} });
  var local = function (spec) {
    var target = entry.deps[spec];
    return __sheaf.require(Array.isArray(target) ? target[0] : target);
  };
  local.async = function (spec) {
    var target = entry.deps[spec];
    return Promise.all(target[1].map(__sheaf.load)).then(function () {
      return __sheaf.require(target[0]);
    });
  };
  entry.factory.call(module.exports, module, module.exports, local);
  return module.exports;
};
"#;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Precede each registration with a comment naming the module
    pub module_comments: bool,
    pub public_path: &'a str,
}

/// Where one module's body sits in a rendered chunk script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLines {
    /// Display name of the module
    pub name: String,
    /// Zero-based line of the first body line
    pub first_line: usize,
    pub line_count: usize,
}

/// A chunk script and the line layout of its module bodies.
#[derive(Debug, Clone)]
pub struct RenderedScript {
    pub text: String,
    pub modules: Vec<ModuleLines>,
}

/// Render the script of `chunk`.
///
/// `async_paths` gives the chunk paths a split point to `target` must load;
/// `marker` replaces markers left in a module's output.
pub fn render_script(
    graph: &ModuleGraph,
    chunk: &Chunk,
    options: &RenderOptions<'_>,
    async_paths: impl Fn(&ModuleId) -> Vec<String>,
    marker: impl Fn(&ModuleRecord, Marker<'_>) -> String,
) -> RenderedScript {
    let mut out = String::from(REGISTRY);
    if chunk.kind() == ChunkKind::Entry {
        out.push_str(&RUNTIME.replace("__BASE__", &json_string(options.public_path)));
    }

    let mut modules = Vec::with_capacity(chunk.modules().len());
    let mut lines = 0usize;
    let mut counted = 0usize;
    for id in chunk.modules() {
        let Some(record) = graph.get(id) else { continue };
        let name = graph.display_name(id);
        if options.module_comments {
            let _ = writeln!(out, "/* {} */", name.replace("*/", "*\\/"));
        }
        let body = substitute_markers(record.output(), |m| marker(record, m));
        let _ = writeln!(
            out,
            "__sheaf.define({}, {}, function (module, exports, require) {{",
            json_string(&name),
            dependency_map(graph, record, &async_paths)
        );
        lines += out[counted..].matches('\n').count();
        counted = out.len();
        modules.push(ModuleLines {
            name,
            first_line: lines,
            line_count: body.lines().count(),
        });
        out.push_str(&body);
        if !body.is_empty() && !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("});\n");
    }

    if chunk.kind() == ChunkKind::Entry {
        if let Some(root) = chunk.root() {
            let _ = writeln!(
                out,
                "__sheaf.require({});",
                json_string(&graph.display_name(root))
            );
        }
    }
    RenderedScript { text: out, modules }
}

/// `{"./util": "src/util.js", "./lazy": ["src/lazy.js", ["js/lazy.js"]]}`
fn dependency_map(
    graph: &ModuleGraph,
    record: &ModuleRecord,
    async_paths: &impl Fn(&ModuleId) -> Vec<String>,
) -> String {
    let mut out = String::from("{");
    let mut first = true;
    let mut seen: Vec<&str> = Vec::new();
    for (dep, target) in record.resolved_dependencies() {
        if seen.contains(&dep.specifier.as_str()) {
            continue;
        }
        seen.push(&dep.specifier);
        if !first {
            out.push_str(", ");
        }
        first = false;
        let id = json_string(&graph.display_name(target));
        match dep.kind {
            DependencyKind::Static => {
                let _ = write!(out, "{}: {}", json_string(&dep.specifier), id);
            }
            DependencyKind::Async => {
                let paths: Vec<String> = async_paths(target).iter().map(|p| json_string(p)).collect();
                let _ = write!(
                    out,
                    "{}: [{}, [{}]]",
                    json_string(&dep.specifier),
                    id,
                    paths.join(", ")
                );
            }
        }
    }
    out.push('}');
    out
}

/// JSON string literal that keeps marker control characters intact.
fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{1}' => out.push(c),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
