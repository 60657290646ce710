//! Assertion macros for integration and scenario tests.
//!
//! These macros print the output tree on failure to aid debugging.

use std::path::Path;

/// List all files under a directory recursively, relative to it
pub fn list_all_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(dir, dir, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, files);
        } else if let Ok(rel) = path.strip_prefix(root) {
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Assert that the manifest in `out_dir` lists `logical` and its file exists.
///
/// # Example
/// ```ignore
/// assert_emitted!(env, "dist", "app.js");
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($env:expr, $out:expr, $logical:expr) => {
        let manifest = $env.manifest($out);
        let path = manifest.get($logical).unwrap_or_else(|| {
            panic!(
                "Expected '{}' in manifest, found: {:?}\nFiles:\n  {}",
                $logical,
                manifest.keys().collect::<Vec<_>>(),
                $crate::common::list_all_files(&$env.project_path($out)).join("\n  ")
            )
        });
        assert!(
            $env.project_path(&format!("{}/{}", $out, path)).is_file(),
            "manifest points '{}' at missing file '{}'",
            $logical,
            path
        );
    };
}

/// Assert that stdout or stderr contains a substring.
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $needle:expr) => {
        let output = $result.combined_output();
        assert!(
            output.contains($needle),
            "Expected output to contain '{}'.\nOutput:\n{}",
            $needle,
            output
        );
    };
}
