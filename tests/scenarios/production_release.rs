//! Scenario: preparing a production release
//!
//! Journey: a developer iterates in development mode, then ships.
//!
//! Steps:
//! 1. Development build: readable names, module comments, NODE_ENV = development
//! 2. Production build into a CDN prefix with gzip siblings
//! 3. Server-side code reads the manifest to find hashed files
//!
//! Success Criteria:
//! - Manifest values carry the public path; files on disk do not
//! - Every script and stylesheet has a `.gz` sibling
//! - Defines are substituted per mode

use crate::common::*;

const CONFIG: &str = r#"[entry]
app = "./src/main.js"

[output]
public_path = "https://cdn.example.com/"

[modes.production]
compress = true
"#;

const MAIN: &str = "import './styles.css';\nif (process.env.NODE_ENV !== 'production') { console.log('debug'); }\n";

#[test]
fn scenario_dev_then_production() {
    let env = TestEnv::builder()
        .with_config(CONFIG)
        .with_file("src/main.js", MAIN)
        .with_file("src/styles.css", "body {\n  margin: 0;\n}\n")
        .build();

    // Step 1
    let result = env.run(&["build", "--mode", "development"]);
    assert!(result.success, "{}", result.combined_output());
    let manifest = env.manifest("dist");
    assert_eq!(manifest["app.js"], "https://cdn.example.com/js/app.js");
    let dev_js = env.read_file("dist/js/app.js");
    assert!(dev_js.contains("\"development\""));
    assert!(dev_js.contains("src/main.js"));
    assert!(!env.project_path("dist/js/app.js.gz").exists());

    // Step 2
    let result = env.run(&["build"]);
    assert!(result.success, "{}", result.combined_output());
    let manifest = env.manifest("dist");
    let js_url = &manifest["app.js"];
    let css_url = &manifest["app.css"];
    assert!(js_url.starts_with("https://cdn.example.com/js/app."), "{js_url}");

    // Step 3
    let js_path = js_url.trim_start_matches("https://cdn.example.com/");
    let css_path = css_url.trim_start_matches("https://cdn.example.com/");
    let prod_js = env.read_file(&format!("dist/{js_path}"));
    assert!(prod_js.contains("\"production\""));
    assert!(!prod_js.contains("process.env.NODE_ENV"));
    assert!(env.project_path(&format!("dist/{js_path}.gz")).is_file());
    assert!(env.project_path(&format!("dist/{css_path}.gz")).is_file());
    assert!(!env.project_path("dist/js/app.js").exists(), "clean removes dev output");
}
