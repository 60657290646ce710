//! Tests for the build pipeline, run against an in-memory project

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::*;
use crate::config::{parse_with_warnings, BuildOptions};
use crate::domain::entities::ChunkKind;
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{Mode, ModuleId};
use crate::error::SheafError;
use crate::infrastructure::fs::{MemoryFs, LOCK_FILE};

const APP: &str = "[entry]\napp = \"./src/main.js\"\n";

fn options(toml: &str, mode: Mode) -> BuildOptions {
    let (config, _) = parse_with_warnings(toml, Path::new("sheaf.toml")).unwrap();
    BuildOptions::resolve(&config, Path::new("/p"), mode).unwrap()
}

fn pipeline(fs: &MemoryFs, toml: &str) -> Pipeline {
    Pipeline::standard(options(toml, Mode::Production), Arc::new(fs.clone())).unwrap()
}

fn project() -> MemoryFs {
    MemoryFs::new()
        .with_file(
            "/p/src/main.js",
            "import { greet } from './util';\nimport './styles.css';\ngreet();\n",
        )
        .with_file("/p/src/util.js", "export function greet() { return 'hi'; }\n")
        .with_file("/p/src/styles.css", "body { color: red; }\n")
}

fn manifest_names(report: &BuildReport) -> Vec<String> {
    let mut names: Vec<String> = report.assets.iter().map(|a| a.logical_name.clone()).collect();
    names.sort();
    names
}

#[test]
fn entry_with_stylesheet_produces_js_and_css() {
    let fs = project();
    let (report, state) = pipeline(&fs, APP).build().unwrap();

    assert_eq!(manifest_names(&report), vec!["app.css", "app.js"]);
    assert_eq!(report.modules, 3);
    assert_eq!(report.changed, vec!["app.css", "app.js"]);

    let js = state.manifest.get("app.js").unwrap();
    assert!(js.starts_with("js/app.") && js.ends_with(".js"), "{js}");
    assert!(fs.is_file(&PathBuf::from("/p/dist").join(js)));
    assert!(fs.get(Path::new("/p/dist/manifest.json")).is_some());
}

#[test]
fn unchanged_input_builds_byte_identical_output() {
    let first_fs = project();
    let second_fs = project();
    pipeline(&first_fs, APP).build().unwrap();
    pipeline(&second_fs, APP).build().unwrap();

    assert_eq!(first_fs.paths(), second_fs.paths());
    for path in first_fs.paths() {
        assert_eq!(first_fs.get(&path), second_fs.get(&path), "{}", path.display());
    }
}

#[test]
fn script_hash_changes_only_when_a_script_changes() {
    let fs = project();
    let pipeline = pipeline(&fs, APP);
    let (_, before) = pipeline.build().unwrap();

    fs.insert("/p/src/styles.css", "body { color: blue; }\n");
    let (report, after_css) = pipeline
        .rebuild(&before, &[PathBuf::from("/p/src/styles.css")])
        .unwrap();
    assert_eq!(report.changed, vec!["app.css"]);
    assert_eq!(before.manifest.get("app.js"), after_css.manifest.get("app.js"));
    assert_ne!(before.manifest.get("app.css"), after_css.manifest.get("app.css"));

    fs.insert("/p/src/util.js", "export function greet() { return 'hello'; }\n");
    let (report, after_util) = pipeline
        .rebuild(&after_css, &[PathBuf::from("/p/src/util.js")])
        .unwrap();
    assert_eq!(report.changed, vec!["app.js"]);
    assert_ne!(after_css.manifest.get("app.js"), after_util.manifest.get("app.js"));
}

#[test]
fn missing_import_fails_with_resolution_error() {
    let fs = MemoryFs::new().with_file("/p/src/main.js", "import './missing';\n");
    let err = pipeline(&fs, APP).build().unwrap_err();

    let SheafError::Build(batch) = &err else {
        panic!("expected a build failure, got {err}");
    };
    let resolution: Vec<_> = batch.resolution_errors().collect();
    assert_eq!(resolution.len(), 1);
    assert_eq!(resolution[0].specifier, "./missing");
    assert!(resolution[0].importer.ends_with("src/main.js"));
    assert!(fs.get(Path::new("/p/dist/manifest.json")).is_none());
}

#[test]
fn shared_module_lands_once_in_shared_chunk() {
    let fs = MemoryFs::new()
        .with_file("/p/src/a.js", "import { x } from './shared';\nx();\n")
        .with_file("/p/src/b.js", "import { x } from './shared';\nx();\n")
        .with_file("/p/src/shared.js", "export const x = () => 1;\n");
    let toml = "[entry]\na = \"./src/a.js\"\nb = \"./src/b.js\"\n";
    let (report, state) = pipeline(&fs, toml).build().unwrap();

    let shared = ModuleId::new("/p/src/shared.js");
    let holders: Vec<_> = state.chunks.iter().filter(|c| c.contains(&shared)).collect();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].name(), "lib");
    assert_eq!(holders[0].kind(), ChunkKind::Shared);
    assert_eq!(manifest_names(&report), vec!["a.js", "b.js", "lib.js"]);
}

#[test]
fn module_shared_by_async_chunks_is_loaded_with_them() {
    let fs = MemoryFs::new()
        .with_file("/p/src/main.js", "import('./a');\nimport('./b');\n")
        .with_file("/p/src/a.js", "import { x } from './shared';\nx();\n")
        .with_file("/p/src/b.js", "import { x } from './shared';\nx();\n")
        .with_file("/p/src/shared.js", "export const x = () => 1;\n");
    let pipeline = Pipeline::standard(options(APP, Mode::Development), Arc::new(fs.clone())).unwrap();
    let (report, state) = pipeline.build().unwrap();

    let lib = state.chunks.iter().find(|c| c.name() == "lib").unwrap();
    assert!(lib.contains(&ModuleId::new("/p/src/shared.js")));
    assert_eq!(
        manifest_names(&report),
        vec!["a.js", "a.js.map", "app.js", "app.js.map", "b.js", "b.js.map", "lib.js", "lib.js.map"]
    );

    let app = String::from_utf8(fs.get(Path::new("/p/dist/js/app.js")).unwrap()).unwrap();
    assert!(app.contains("\"./a\": [\"src/a.js\", [\"js/a.js\", \"js/lib.js\"]]"), "{app}");
    assert!(app.contains("\"./b\": [\"src/b.js\", [\"js/b.js\", \"js/lib.js\"]]"), "{app}");
}

#[test]
fn imported_stylesheet_precedes_its_importer() {
    let fs = MemoryFs::new()
        .with_file("/p/src/main.js", "import './main.css';\n")
        .with_file("/p/src/main.css", "@import './reset.css';\n.app { color: red; }\n")
        .with_file("/p/src/reset.css", "* { margin: 0; }\n");
    let pipeline = Pipeline::standard(options(APP, Mode::Development), Arc::new(fs.clone())).unwrap();
    pipeline.build().unwrap();

    let css = String::from_utf8(fs.get(Path::new("/p/dist/css/app.css")).unwrap()).unwrap();
    assert!(!css.contains("@import"), "{css}");
    let reset = css.find("margin: 0").unwrap();
    let app = css.find(".app").unwrap();
    assert!(reset < app, "{css}");
}

#[test]
fn chunks_cover_every_module_exactly_once() {
    let fs = MemoryFs::new()
        .with_file("/p/src/a.js", "import './common';\nimport('./lazy');\n")
        .with_file("/p/src/b.js", "import './common';\n")
        .with_file("/p/src/common.js", "export default 1;\n")
        .with_file("/p/src/lazy.js", "import './common';\nexport const y = 2;\n");
    let toml = "[entry]\na = \"./src/a.js\"\nb = \"./src/b.js\"\n";
    let (graph, chunks) = pipeline(&fs, toml).plan().unwrap();

    let mut placed: Vec<&ModuleId> = chunks.iter().flat_map(|c| c.modules()).collect();
    placed.sort();
    let before = placed.len();
    placed.dedup();
    assert_eq!(placed.len(), before, "a module appears in two chunks");

    let mut reachable: Vec<&ModuleId> = graph.modules().map(|r| r.id()).collect();
    reachable.sort();
    assert_eq!(placed, reachable);
    assert!(chunks.iter().any(|c| c.kind() == ChunkKind::Async));
}

#[test]
fn incremental_change_only_touches_entries_that_reach_it() {
    let fs = MemoryFs::new()
        .with_file("/p/src/a.js", "import './only-a';\n")
        .with_file("/p/src/b.js", "export const b = 1;\n")
        .with_file("/p/src/only-a.js", "export const v = 1;\n");
    let toml = "[entry]\na = \"./src/a.js\"\nb = \"./src/b.js\"\n";
    let pipeline = pipeline(&fs, toml);
    let (_, state) = pipeline.build().unwrap();

    fs.insert("/p/src/only-a.js", "export const v = 2;\n");
    let (report, next) = pipeline
        .rebuild(&state, &[PathBuf::from("/p/src/only-a.js")])
        .unwrap();

    assert_eq!(report.changed, vec!["a.js"]);
    assert_eq!(state.manifest.get("b.js"), next.manifest.get("b.js"));
}

#[test]
fn failed_rebuild_keeps_previous_state() {
    let fs = project();
    let pipeline = pipeline(&fs, APP);
    let (_, state) = pipeline.build().unwrap();
    let manifest_before = fs.get(Path::new("/p/dist/manifest.json"));

    fs.insert("/p/src/util.js", "import './gone';\n");
    let result = pipeline.rebuild(&state, &[PathBuf::from("/p/src/util.js")]);

    assert!(result.is_err());
    assert_eq!(fs.get(Path::new("/p/dist/manifest.json")), manifest_before);
    assert_eq!(state.graph.len(), 3);
}

#[test]
fn rebuild_with_unknown_files_changes_nothing() {
    let fs = project();
    let pipeline = pipeline(&fs, APP);
    let (_, state) = pipeline.build().unwrap();

    let (report, next) = pipeline
        .rebuild(&state, &[PathBuf::from("/p/README.md")])
        .unwrap();
    assert!(report.changed.is_empty());
    assert!(report.written.iter().all(|p| p == "manifest.json"), "{:?}", report.written);
    assert_eq!(state.manifest, next.manifest);
}

#[test]
fn copy_patterns_are_emitted_and_listed() {
    let fs = project().with_file("/p/static/robots.txt", "User-agent: *\n");
    let toml = format!("{APP}[[copy]]\nfrom = \"static\"\nto = \"static\"\n");
    let (_, state) = pipeline(&fs, &toml).build().unwrap();

    assert_eq!(state.manifest.get("static/robots.txt"), Some("static/robots.txt"));
    assert_eq!(
        fs.get(Path::new("/p/dist/static/robots.txt")),
        Some(b"User-agent: *\n".to_vec())
    );
}

#[test]
fn public_path_prefixes_manifest_values() {
    let fs = project();
    let toml = format!("{APP}[output]\npublic_path = \"/assets/\"\n");
    let (_, state) = pipeline(&fs, &toml).build().unwrap();
    assert!(state.manifest.get("app.js").unwrap().starts_with("/assets/js/app."));
}

#[test]
fn development_mode_names_without_hash() {
    let fs = project();
    let pipeline = Pipeline::standard(options(APP, Mode::Development), Arc::new(fs.clone())).unwrap();
    let (report, state) = pipeline.build().unwrap();

    assert_eq!(report.mode, Mode::Development);
    assert_eq!(state.manifest.get("app.js"), Some("js/app.js"));
    assert_eq!(state.manifest.get("app.css"), Some("css/app.css"));
}

#[test]
fn development_scripts_carry_line_source_maps() {
    let fs = project();
    let pipeline = Pipeline::standard(options(APP, Mode::Development), Arc::new(fs.clone())).unwrap();
    let (_, state) = pipeline.build().unwrap();
    assert_eq!(state.manifest.get("app.js.map"), Some("js/app.js.map"));

    let script = String::from_utf8(fs.get(Path::new("/p/dist/js/app.js")).unwrap()).unwrap();
    assert!(script.ends_with("\n//# sourceMappingURL=app.js.map\n"), "{script}");

    let map = fs.get(Path::new("/p/dist/js/app.js.map")).unwrap();
    let map: serde_json::Value = serde_json::from_slice(&map).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "app.js");
    assert_eq!(map["sources"], serde_json::json!(["src/util.js", "src/main.js"]));

    // one segment per body line, none for the runtime or wrappers
    let mappings = map["mappings"].as_str().unwrap();
    let mapped: Vec<usize> = mappings
        .split(';')
        .enumerate()
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(line, _)| line)
        .collect();
    let lines: Vec<&str> = script.lines().collect();
    let util_body = lines.iter().position(|l| l.starts_with("Object.defineProperty(exports")).unwrap();
    assert_eq!(mapped[0], util_body);
    assert!(mapped.iter().all(|&line| !lines[line].starts_with("__sheaf.")));
}

#[test]
fn minified_scripts_are_not_mapped() {
    let fs = project();
    let toml = format!("{APP}[modes.production]\nsource_maps = true\n");
    let (report, _) = pipeline(&fs, &toml).build().unwrap();

    assert!(!manifest_names(&report).iter().any(|name| name.ends_with(".map")));
    let app = report.assets.iter().find(|a| a.logical_name == "app.js").unwrap();
    let script = String::from_utf8(fs.get(&Path::new("/p/dist").join(&app.path)).unwrap()).unwrap();
    assert!(!script.contains("sourceMappingURL"));
}

#[test]
fn prepare_output_cleans_but_keeps_lock() {
    let fs = project()
        .with_file("/p/dist/stale.js", "old")
        .with_file(format!("/p/dist/{}", LOCK_FILE), "");
    let pipeline = pipeline(&fs, APP);

    assert_eq!(pipeline.prepare_output().unwrap(), 1);
    assert!(fs.get(Path::new("/p/dist/stale.js")).is_none());
    assert!(fs.get(&PathBuf::from(format!("/p/dist/{}", LOCK_FILE))).is_some());
}

#[test]
fn cancelled_build_stops() {
    let fs = project();
    let cancel = Arc::new(AtomicBool::new(true));
    let pipeline = pipeline(&fs, APP).with_cancel(cancel.clone());

    assert!(matches!(pipeline.build(), Err(SheafError::Cancelled)));

    cancel.store(false, Ordering::SeqCst);
    assert!(pipeline.build().is_ok());
}

#[test]
fn unknown_unit_in_rule_is_rejected_up_front() {
    let fs = project();
    let toml = format!("{APP}[[rules]]\ntest = '\\.js$'\nuse = [\"babel\"]\n");
    let result = Pipeline::standard(options(&toml, Mode::Production), Arc::new(fs));
    assert!(matches!(result, Err(SheafError::UnknownUnit(name)) if name == "babel"));
}

#[test]
fn resolve_matches_graph_resolution() {
    let fs = project();
    let pipeline = pipeline(&fs, APP);
    let from = ModuleId::new("/p/src/main.js");
    assert_eq!(pipeline.resolve("./util", &from).unwrap(), ModuleId::new("/p/src/util.js"));
    assert!(pipeline.resolve("./nope", &from).is_err());
}
