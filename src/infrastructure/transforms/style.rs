//! Stylesheet units
//!
//! `style-imports` turns `@import` rules and local `url()` references into
//! dependencies. Imported sheets are pulled into the graph and extracted on
//! their own, so the rule itself is dropped; `url()` targets are replaced by a
//! reference marker the emitter rewrites to the final relative URL.
//!
//! `style-extract` moves the finished stylesheet text into a side artifact and
//! leaves an empty module body.

use regex::{Captures, Regex};

use crate::domain::entities::{Dependency, ModuleContent, SideArtifact};
use crate::domain::ports::transform::reference_marker;
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;
use crate::error::SheafResult;

pub struct StyleImportsUnit {
    import: Regex,
    url: Regex,
}

impl StyleImportsUnit {
    pub fn new() -> SheafResult<Self> {
        Ok(Self {
            import: Regex::new(
                r#"(?m)^[ \t]*@import\s+(?:url\(\s*)?['"]?([^'")\s;]+)['"]?\s*\)?[^;\n]*;[ \t]*\r?\n?"#,
            )?,
            url: Regex::new(r#"url\(\s*(['"]?)([^'")]+)(['"]?)\s*\)"#)?,
        })
    }

    /// Rewritten text plus dependencies in source order.
    pub fn scan(&self, source: &str) -> (String, Vec<Dependency>) {
        let mut deps: Vec<Dependency> = Vec::new();
        let mut push = |spec: String| {
            let dep = Dependency::new(spec);
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        };

        let text = self
            .import
            .replace_all(source, |caps: &Captures<'_>| {
                let target = &caps[1];
                if is_external(target) {
                    return caps[0].to_string();
                }
                push(local_specifier(target));
                String::new()
            })
            .into_owned();

        let text = self
            .url
            .replace_all(&text, |caps: &Captures<'_>| {
                let target = caps[2].trim();
                if is_external(target) {
                    return caps[0].to_string();
                }
                let spec = local_specifier(target);
                let marker = reference_marker(&spec);
                push(spec);
                format!("url({}{}{})", &caps[1], marker, &caps[3])
            })
            .into_owned();

        (text, deps)
    }
}

/// Left untouched: data URIs, absolute URLs, protocol-relative and fragment refs.
fn is_external(target: &str) -> bool {
    target.starts_with("data:")
        || target.starts_with('#')
        || target.starts_with("//")
        || target.contains("://")
}

/// `~pkg/x` names a package; a bare `img/x.png` is relative to the sheet.
fn local_specifier(target: &str) -> String {
    if let Some(package) = target.strip_prefix('~') {
        return package.to_string();
    }
    if target.starts_with("./") || target.starts_with("../") || target.starts_with('/') {
        target.to_string()
    } else {
        format!("./{}", target)
    }
}

impl TransformUnit for StyleImportsUnit {
    fn name(&self) -> &str {
        "style-imports"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        module_type == ModuleType::Style
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let source = input.into_text()?;
        let (text, deps) = self.scan(&source);
        Ok(UnitOutput::text(text).with_dependencies(deps))
    }
}

pub struct StyleExtractUnit;

impl StyleExtractUnit {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StyleExtractUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformUnit for StyleExtractUnit {
    fn name(&self) -> &str {
        "style-extract"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        module_type == ModuleType::Style
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let text = input.into_text()?;
        let output = UnitOutput::text(String::new());
        if text.trim().is_empty() {
            return Ok(output);
        }
        Ok(output.with_artifact(SideArtifact::Stylesheet { text }))
    }
}
