//! Test environment builder for isolated Sheaf runs.
//!
//! Provides `TestEnv` - a temp project directory with an isolated config
//! home, plus helpers to run the `sheaf` binary against it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a Sheaf CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON, one value per line
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON ({e}): {l}"))
            })
            .collect()
    }

    /// First event with the given name
    pub fn event(&self, name: &str) -> Option<serde_json::Value> {
        self.events().into_iter().find(|e| e["event"] == name)
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory used as the user config home
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Run sheaf from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run sheaf from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = self.command();
        cmd.args(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("Failed to execute sheaf");
        output_to_result(output)
    }

    /// A command for the sheaf binary with an isolated environment, for
    /// tests that need to spawn and talk to a long-running process.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(sheaf_bin());
        cmd.current_dir(self.project_root.path())
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("SHEAF_MODE")
            .env_remove("SHEAF_OUT_DIR")
            .env_remove("SHEAF_JOBS")
            .env_remove("SHEAF_LOG");
        cmd
    }

    /// Write a file to the project directory
    pub fn write_file(&self, relative_path: &str, content: &str) {
        write_file(self.project_root.path(), relative_path, content);
    }

    /// Read a file from the project directory
    pub fn read_file(&self, relative_path: &str) -> String {
        std::fs::read_to_string(self.project_path(relative_path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
    }

    /// Parsed `dist/manifest.json` (or the given output dir)
    pub fn manifest(&self, out_dir: &str) -> BTreeMap<String, String> {
        let raw = self.read_file(&format!("{}/manifest.json", out_dir));
        serde_json::from_str(&raw).expect("manifest is a flat JSON object")
    }

    /// Content of the file a manifest entry points at
    pub fn emitted(&self, out_dir: &str, logical: &str) -> String {
        let manifest = self.manifest(out_dir);
        let path = manifest
            .get(logical)
            .unwrap_or_else(|| panic!("'{}' not in manifest: {:?}", logical, manifest));
        self.read_file(&format!("{}/{}", out_dir, path))
    }
}

fn write_file(root: &Path, relative_path: &str, content: &str) {
    let full_path = root.join(relative_path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(&full_path, content).expect("Failed to write file");
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn sheaf_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sheaf"))
}

/// Builder for TestEnv with fluent API
#[derive(Default)]
pub struct TestEnvBuilder {
    files: Vec<(String, String)>,
    config: Option<String>,
    user_config: Option<String>,
}

impl TestEnvBuilder {
    /// Add a source file to the project
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// Set `sheaf.toml` content
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    /// Set the user-level config (`$XDG_CONFIG_HOME/sheaf/config.toml`)
    pub fn with_user_config(mut self, toml: &str) -> Self {
        self.user_config = Some(toml.to_string());
        self
    }

    pub fn build(self) -> TestEnv {
        let project_root = TempDir::new().expect("Failed to create project temp dir");
        let home_dir = TempDir::new().expect("Failed to create home temp dir");

        for (path, content) in &self.files {
            write_file(project_root.path(), path, content);
        }
        if let Some(config) = &self.config {
            write_file(project_root.path(), "sheaf.toml", config);
        }
        if let Some(config) = &self.user_config {
            write_file(home_dir.path(), ".config/sheaf/config.toml", config);
        }

        TestEnv {
            project_root,
            home_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_writes_files_and_config() {
        let env = TestEnv::builder()
            .with_file("src/main.js", "console.log(1);\n")
            .with_config("[entry]\napp = \"./src/main.js\"\n")
            .build();

        assert!(env.project_path("src/main.js").is_file());
        assert!(env.project_path("sheaf.toml").is_file());
    }
}
