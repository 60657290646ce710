//! Scenario: a two-page site with a shared helper and a lazy route
//!
//! Steps:
//! 1. Build with default split groups
//! 2. The shared helper lands in one shared chunk, the lazy route in its own
//! 3. Changing the lazy route leaves both entry bundles untouched
//!
//! Success Criteria:
//! - Every module is emitted exactly once
//! - Entry files do not change when only an async chunk's content changes

use crate::common::*;

#[test]
fn scenario_shared_and_async_chunks() {
    let env = split_env().build();

    // Step 1
    let result = env.run(&["build"]);
    assert!(result.success, "{}", result.combined_output());

    // Step 2
    let manifest = env.manifest("dist");
    let mut names: Vec<&str> = manifest.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["admin.js", "home.js", "lazy.js", "lib.js"]);

    let lib = env.emitted("dist", "lib.js");
    let home = env.emitted("dist", "home.js");
    let admin = env.emitted("dist", "admin.js");
    assert!(lib.contains("src/shared.js"));
    assert!(!home.contains("'#' + n"), "shared code duplicated into home");
    assert!(!admin.contains("'#' + n"), "shared code duplicated into admin");
    assert!(env.emitted("dist", "lazy.js").contains("return 42"));

    // Step 3
    env.write_file("src/lazy.js", "export function run() { return 43; }\n");
    let result = env.run(&["build"]);
    assert!(result.success, "{}", result.combined_output());

    let after = env.manifest("dist");
    assert_ne!(manifest["lazy.js"], after["lazy.js"]);
    assert_eq!(manifest["admin.js"], after["admin.js"]);
    assert_eq!(manifest["lib.js"], after["lib.js"]);
}

#[test]
fn scenario_shared_group_threshold() {
    // Raising min_roots above the entry count keeps the helper in each entry
    let env = split_env()
        .with_config(
            "[entry]\nhome = \"./src/home.js\"\nadmin = \"./src/admin.js\"\n\n\
             [[split.groups]]\nname = \"lib\"\nmin_roots = 3\n",
        )
        .build();

    let result = env.run(&["build"]);
    assert!(result.success, "{}", result.combined_output());
    assert!(!env.manifest("dist").contains_key("lib.js"));
}
