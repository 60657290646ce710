use std::collections::BTreeMap;

use sheaf::SheafError;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Build errors grouped by kind, resolution first.
#[derive(Debug, Clone)]
pub struct ErrorBlock {
    title: String,
    groups: BTreeMap<ErrorKind, Vec<String>>,
    fix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ErrorKind {
    Resolution,
    Transform,
    Emission,
    Config,
    Other,
}

impl ErrorKind {
    fn of(err: &SheafError) -> Self {
        match err {
            SheafError::Resolution(_) | SheafError::MissingEntry { .. } => ErrorKind::Resolution,
            SheafError::Transform(_) | SheafError::UnknownUnit(_) => ErrorKind::Transform,
            SheafError::Emission(_) | SheafError::PathEscape { .. } | SheafError::ChunkCycle { .. } => {
                ErrorKind::Emission
            }
            SheafError::InvalidConfig { .. } | SheafError::Pattern(_) => ErrorKind::Config,
            _ => ErrorKind::Other,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::Resolution => "Resolution",
            ErrorKind::Transform => "Transform",
            ErrorKind::Emission => "Emission",
            ErrorKind::Config => "Config",
            ErrorKind::Other => "Other",
        }
    }
}

impl ErrorBlock {
    pub fn from_error(err: &SheafError) -> Self {
        let mut groups: BTreeMap<ErrorKind, Vec<String>> = BTreeMap::new();
        let errors: Vec<&SheafError> = match err {
            SheafError::Build(batch) => batch.errors.iter().collect(),
            other => vec![other],
        };
        for e in &errors {
            groups.entry(ErrorKind::of(e)).or_default().push(e.to_string());
        }
        let noun = if errors.len() == 1 { "error" } else { "errors" };
        let fix = match err {
            SheafError::OutputLocked(_) => {
                Some("Stop the other sheaf process or wait for it to finish".to_string())
            }
            _ if groups.contains_key(&ErrorKind::Resolution) => {
                Some("Check import paths, `resolve.alias` and `resolve.extensions`".to_string())
            }
            _ => None,
        };
        Self {
            title: format!("Build failed with {} {}", errors.len(), noun),
            groups,
            fix,
        }
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut out = format!(
            "{} {}\n",
            Icon::Error.colored(supports_color, supports_unicode),
            ColoredText::error(self.title.as_str()).bold().render(supports_color)
        );

        let grouped = self.groups.len() > 1 || self.groups.values().any(|v| v.len() > 1);
        for (kind, messages) in &self.groups {
            if grouped {
                out.push_str(&format!(
                    "  {} ({})\n",
                    ColoredText::plain(kind.label()).bold().render(supports_color),
                    messages.len()
                ));
            }
            for message in messages {
                out.push_str(&format!("    - {}\n", message));
            }
        }

        if let Some(fix) = &self.fix {
            out.push_str(&format!(
                "  {} {}\n",
                Icon::Arrow.colored(supports_color, supports_unicode),
                fix
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheaf::error::{ResolutionError, TransformError};
    use sheaf::BuildFailure;

    #[test]
    fn groups_batch_by_kind() {
        let err = SheafError::Build(BuildFailure::new(vec![
            TransformError {
                unit: "json".to_string(),
                module: "src/data.json".to_string(),
                cause: "expected value".to_string(),
            }
            .into(),
            ResolutionError {
                specifier: "./missing".to_string(),
                importer: "src/main.js".to_string(),
            }
            .into(),
        ]));

        let rendered = ErrorBlock::from_error(&err).render(false, false);
        insta::assert_snapshot!(rendered.trim_end(), @r"
        [FAIL] Build failed with 2 errors
          Resolution (1)
            - cannot resolve './missing' from src/main.js
          Transform (1)
            - transform 'json' failed on src/data.json: expected value
          [>] Check import paths, `resolve.alias` and `resolve.extensions`
        ");
    }

    #[test]
    fn single_error_has_no_group_heading() {
        let err = SheafError::UnknownUnit("sass".to_string());
        let rendered = ErrorBlock::from_error(&err).render(false, true);
        assert!(rendered.starts_with("✗ Build failed with 1 error\n"));
        assert!(rendered.contains("    - unknown transform unit 'sass'"));
        assert!(!rendered.contains("Transform (1)"));
    }
}
