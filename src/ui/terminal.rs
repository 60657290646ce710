//! What stderr and stdout can show
//!
//! Build reports are drawn with color and Unicode icons only when the
//! terminal supports them. CI logs get plain output unless color is forced.

use is_terminal::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub supports_color: bool,
    pub supports_unicode: bool,
    /// Running under a CI service; `color = "auto"` stays plain there
    pub is_ci: bool,
}

/// Inspect the current process environment.
pub fn detect_capabilities() -> TerminalCapabilities {
    capabilities_from(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
}

fn capabilities_from(env: impl Fn(&str) -> Option<String>, is_tty: bool) -> TerminalCapabilities {
    let dumb = env("TERM").is_some_and(|term| term.eq_ignore_ascii_case("dumb"));
    TerminalCapabilities {
        supports_color: is_tty && !dumb && env("NO_COLOR").is_none(),
        supports_unicode: !dumb && utf8_locale(&env),
        is_ci: CI_MARKERS.iter().any(|key| env(key).is_some()),
    }
}

const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "JENKINS_HOME",
    "BUILDKITE",
    "CIRCLECI",
    "TRAVIS",
    "TEAMCITY_VERSION",
];

/// The first locale variable that is set decides; none set means UTF-8.
fn utf8_locale(env: &impl Fn(&str) -> Option<String>) -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| env(key))
        .map(|locale| {
            let locale = locale.to_ascii_lowercase();
            locale.contains("utf-8") || locale.contains("utf8") || !matches!(locale.as_str(), "c" | "posix")
        })
        .unwrap_or(true)
}
