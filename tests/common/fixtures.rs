//! Small projects reused across tests.

/// Single entry importing a helper and a stylesheet
pub const APP_CONFIG: &str = r#"[entry]
app = "./src/main.js"
"#;

pub const MAIN_JS: &str = "import { greet } from './util';\nimport './styles.css';\ngreet('world');\n";
pub const UTIL_JS: &str = "export function greet(name) { return 'hello ' + name; }\n";
pub const STYLES_CSS: &str = "body { color: red; }\n";

/// Two entries sharing one module, with a lazy route in the first
pub const SPLIT_CONFIG: &str = r#"[entry]
home = "./src/home.js"
admin = "./src/admin.js"
"#;

pub const HOME_JS: &str = "import { fmt } from './shared';\nimport('./lazy').then(m => m.run());\nfmt(1);\n";
pub const ADMIN_JS: &str = "import { fmt } from './shared';\nfmt(2);\n";
pub const SHARED_JS: &str = "export const fmt = n => '#' + n;\n";
pub const LAZY_JS: &str = "export function run() { return 42; }\n";

pub fn app_env() -> super::TestEnvBuilder {
    super::TestEnv::builder()
        .with_config(APP_CONFIG)
        .with_file("src/main.js", MAIN_JS)
        .with_file("src/util.js", UTIL_JS)
        .with_file("src/styles.css", STYLES_CSS)
}

pub fn split_env() -> super::TestEnvBuilder {
    super::TestEnv::builder()
        .with_config(SPLIT_CONFIG)
        .with_file("src/home.js", HOME_JS)
        .with_file("src/admin.js", ADMIN_JS)
        .with_file("src/shared.js", SHARED_JS)
        .with_file("src/lazy.js", LAZY_JS)
}
