//! `sheaf build` end to end against a temp project.

mod common;

use common::*;

#[test]
fn build_emits_hashed_files_and_manifest() {
    let env = app_env().build();
    let result = env.run(&["build"]);

    assert!(result.success, "{}", result.combined_output());
    assert_emitted!(env, "dist", "app.js");
    assert_emitted!(env, "dist", "app.css");

    let manifest = env.manifest("dist");
    let js = &manifest["app.js"];
    assert!(js.starts_with("js/app.") && js.ends_with(".js"), "{js}");
    assert_ne!(js, "js/app.js", "production names carry a content hash");
    assert!(env.emitted("dist", "app.css").contains("color"));
}

#[test]
fn build_output_is_deterministic() {
    let first = app_env().build();
    let second = app_env().build();
    assert!(first.run(&["build"]).success);
    assert!(second.run(&["build"]).success);

    let files = list_all_files(&first.project_path("dist"));
    assert_eq!(files, list_all_files(&second.project_path("dist")));
    for file in files.iter().filter(|f| !f.ends_with(".sheaf.lock")) {
        assert_eq!(
            first.read_file(&format!("dist/{file}")),
            second.read_file(&format!("dist/{file}")),
            "{file} differs between identical builds"
        );
    }
}

#[test]
fn development_mode_skips_hashes() {
    let env = app_env().build();
    let result = env.run(&["build", "--mode", "development"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(env.manifest("dist")["app.js"], "js/app.js");
    assert!(env.emitted("dist", "app.js").contains("src/util.js"));
}

#[test]
fn sheaf_mode_env_applies_without_flag() {
    let env = app_env().build();
    let result = env.run_with_env(&["build"], &[("SHEAF_MODE", "dev")]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(env.manifest("dist")["app.js"], "js/app.js");
}

#[test]
fn missing_import_fails_with_every_error_and_writes_nothing() {
    let env = TestEnv::builder()
        .with_config(APP_CONFIG)
        .with_file("src/main.js", "import './nope';\nimport './also-missing';\n")
        .build();
    let result = env.run(&["build"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert_output_contains!(result, "Build failed with 2 errors");
    assert_output_contains!(result, "cannot resolve './nope'");
    assert_output_contains!(result, "cannot resolve './also-missing'");
    assert!(!env.project_path("dist/manifest.json").exists());
}

#[test]
fn json_mode_emits_start_and_complete_events() {
    let env = app_env().build();
    let result = env.run(&["--json", "build"]);

    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    assert_eq!(events[0]["event"], "build_started");
    assert_eq!(events[0]["mode"], "production");

    let complete = result.event("build_complete").expect("build_complete event");
    assert_eq!(complete["command"], "build");
    assert_eq!(complete["modules"], 3);
    assert_eq!(complete["assets"].as_array().unwrap().len(), 2);
}

#[test]
fn json_mode_reports_failures_as_build_failed() {
    let env = TestEnv::builder()
        .with_config(APP_CONFIG)
        .with_file("src/main.js", "import './nope';\n")
        .build();
    let result = env.run(&["--json", "build"]);

    assert!(!result.success);
    let failed = result.event("build_failed").expect("build_failed event");
    assert_eq!(failed["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn unknown_config_key_warns_but_builds() {
    let env = app_env()
        .with_config("[entry]\napp = \"./src/main.js\"\n\n[output]\npubic_path = \"/x/\"\n")
        .build();
    let result = env.run(&["build"]);

    assert!(result.success, "{}", result.combined_output());
    assert_output_contains!(result, "pubic_path");
    assert_output_contains!(result, "did you mean 'public_path'?");
}

#[test]
fn invalid_config_value_fails_before_building() {
    let env = app_env().with_config("mode = 3\n").build();
    let result = env.run(&["build"]);

    assert!(!result.success);
    assert_output_contains!(result, "invalid config");
    assert!(!env.project_path("dist").exists());
}

#[test]
fn explicit_config_and_root_flags() {
    let env = TestEnv::builder()
        .with_file("web/src/main.js", "console.log('web');\n")
        .with_file(
            "configs/web.toml",
            "[entry]\nsite = \"./src/main.js\"\n\n[output]\npath = \"public\"\n",
        )
        .build();
    let result = env.run(&["build", "--root", "web", "--config", "configs/web.toml"]);

    assert!(result.success, "{}", result.combined_output());
    assert_emitted!(env, "web/public", "site.js");
}

#[test]
fn clean_removes_stale_files_before_build() {
    let env = app_env()
        .with_file("dist/old.txt", "stale")
        .build();
    assert!(env.run(&["build"]).success);
    assert!(!env.project_path("dist/old.txt").exists());
}

#[test]
fn clean_false_keeps_existing_files() {
    let env = app_env()
        .with_config("[entry]\napp = \"./src/main.js\"\n\n[output]\nclean = false\n")
        .with_file("dist/old.txt", "stale")
        .build();
    assert!(env.run(&["build"]).success);
    assert!(env.project_path("dist/old.txt").exists());
}

#[test]
fn copy_patterns_land_in_manifest() {
    let env = app_env()
        .with_config("[entry]\napp = \"./src/main.js\"\n\n[[copy]]\nfrom = \"static\"\nto = \"static\"\n")
        .with_file("static/robots.txt", "User-agent: *\n")
        .build();
    let result = env.run(&["build"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(env.manifest("dist")["static/robots.txt"], "static/robots.txt");
    assert_eq!(env.read_file("dist/static/robots.txt"), "User-agent: *\n");
}

#[test]
fn missing_root_is_an_error() {
    let env = app_env().build();
    let result = env.run(&["build", "--root", "does-not-exist"]);

    assert!(!result.success);
    assert_output_contains!(result, "project root not found");
}
