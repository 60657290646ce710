//! `esm` unit: module-syntax interop
//!
//! Rewrites `import`/`export` statements into the `require`/`exports` form the
//! bundle runtime understands, turns `import("x")` into a split point, and
//! reports every `require` target as a dependency in source order.
//!
//! This is a line-level rewrite, not a parser. It covers the statement forms
//! real code uses at top level and leaves everything else alone.

use regex::{Captures, Regex};

use crate::domain::entities::{Dependency, ModuleContent};
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;
use crate::error::SheafResult;

const ES_MODULE_FLAG: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });\n";

pub struct EsmUnit {
    import_from: Regex,
    import_bare: Regex,
    export_from: Regex,
    export_default: Regex,
    export_decl: Regex,
    export_list: Regex,
    dynamic_import: Regex,
    require: Regex,
}

impl EsmUnit {
    pub fn new() -> SheafResult<Self> {
        Ok(Self {
            import_from: Regex::new(
                r#"(?m)^([ \t]*)import\s+([^'";]+?)\s+from\s+['"]([^'"]+)['"][ \t]*;?"#,
            )?,
            import_bare: Regex::new(r#"(?m)^([ \t]*)import\s+['"]([^'"]+)['"][ \t]*;?"#)?,
            export_from: Regex::new(
                r#"(?m)^([ \t]*)export\s+(\*\s+as\s+[\w$]+|\*|\{[^}]*\})\s+from\s+['"]([^'"]+)['"][ \t]*;?"#,
            )?,
            export_default: Regex::new(r"(?m)^([ \t]*)export\s+default\s+")?,
            export_decl: Regex::new(
                r"(?m)^([ \t]*)export\s+(const|let|var|function\*?|async\s+function\*?|class)\s+([\w$]+)",
            )?,
            export_list: Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}[ \t]*;?[ \t]*$")?,
            dynamic_import: Regex::new(r#"\bimport\(\s*(['"][^'"]+['"])\s*\)"#)?,
            require: Regex::new(r#"\brequire(\.async)?\(\s*['"]([^'"]+)['"]\s*\)"#)?,
        })
    }

    /// Rewrite module syntax into `require`/`exports` form.
    pub fn rewrite(&self, source: &str) -> String {
        let mut exported: Vec<(String, String)> = Vec::new();
        let mut has_exports = false;
        let mut temp = 0usize;

        let text = self
            .export_from
            .replace_all(source, |caps: &Captures<'_>| {
                has_exports = true;
                let indent = &caps[1];
                let spec = quote(&caps[3]);
                let clause = caps[2].trim();
                if clause == "*" {
                    format!(
                        "{indent}(function (m) {{ for (var k in m) if (k !== \"default\" && k !== \"__esModule\") exports[k] = m[k]; }})(require({spec}));"
                    )
                } else if let Some(ns) = clause.strip_prefix('*') {
                    let ns = ns.trim().trim_start_matches("as").trim();
                    format!("{indent}exports.{ns} = require({spec});")
                } else {
                    let assigns: Vec<String> = named_bindings(clause)
                        .into_iter()
                        .map(|(imported, local)| format!("exports.{} = m.{};", local, imported))
                        .collect();
                    format!("{indent}(function (m) {{ {} }})(require({spec}));", assigns.join(" "))
                }
            })
            .into_owned();

        let text = self
            .import_from
            .replace_all(&text, |caps: &Captures<'_>| {
                let indent = &caps[1];
                let spec = quote(&caps[3]);
                import_clause(indent, caps[2].trim(), &spec, &mut temp)
            })
            .into_owned();

        let text = self
            .import_bare
            .replace_all(&text, |caps: &Captures<'_>| {
                format!("{}require({});", &caps[1], quote(&caps[2]))
            })
            .into_owned();

        let text = self
            .export_list
            .replace_all(&text, |caps: &Captures<'_>| {
                has_exports = true;
                for (local, exported_as) in named_bindings(&caps[1]) {
                    exported.push((exported_as, local));
                }
                String::new()
            })
            .into_owned();

        let text = self
            .export_decl
            .replace_all(&text, |caps: &Captures<'_>| {
                has_exports = true;
                exported.push((caps[3].to_string(), caps[3].to_string()));
                format!("{}{} {}", &caps[1], &caps[2], &caps[3])
            })
            .into_owned();

        let text = self
            .export_default
            .replace_all(&text, |caps: &Captures<'_>| {
                has_exports = true;
                format!("{}exports.default = ", &caps[1])
            })
            .into_owned();

        let mut text = self
            .dynamic_import
            .replace_all(&text, "require.async($1)")
            .into_owned();

        if !exported.is_empty() {
            if !text.ends_with('\n') {
                text.push('\n');
            }
            for (name, local) in &exported {
                text.push_str(&format!("exports.{} = {};\n", name, local));
            }
        }
        if has_exports {
            text.insert_str(0, ES_MODULE_FLAG);
        }
        text
    }

    /// `require` targets in source order; `require.async` marks a split point.
    /// Calls inside comments are not dependencies.
    pub fn scan(&self, text: &str) -> Vec<Dependency> {
        let code = blank_comments(text);
        let mut deps: Vec<Dependency> = Vec::new();
        for caps in self.require.captures_iter(&code) {
            let dep = if caps.get(1).is_some() {
                Dependency::split_point(&caps[2])
            } else {
                Dependency::new(&caps[2])
            };
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
        deps
    }
}

impl TransformUnit for EsmUnit {
    fn name(&self) -> &str {
        "esm"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        matches!(module_type, ModuleType::Script | ModuleType::Template)
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let source = input.into_text()?;
        let text = self.rewrite(&source);
        let dependencies = self.scan(&text);
        Ok(UnitOutput::text(text).with_dependencies(dependencies))
    }
}

/// Replace `//` and `/* */` comments with spaces, keeping line breaks and
/// leaving string literals alone.
fn blank_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    if inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if inner == c || (inner == '\n' && c != '`') {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                out.push(' ');
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(' ');
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    out.push(if inner == '\n' { '\n' } else { ' ' });
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn quote(spec: &str) -> String {
    format!("\"{}\"", spec.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `{ a, b as c }` -> `[(a, a), (b, c)]`
fn named_bindings(clause: &str) -> Vec<(String, String)> {
    clause
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|binding| match binding.split_once(" as ") {
            Some((name, alias)) => (name.trim().to_string(), alias.trim().to_string()),
            None => (binding.to_string(), binding.to_string()),
        })
        .collect()
}

fn destructure(clause: &str) -> String {
    let parts: Vec<String> = named_bindings(clause)
        .into_iter()
        .map(|(name, local)| {
            if name == local {
                name
            } else {
                format!("{}: {}", name, local)
            }
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

fn import_clause(indent: &str, clause: &str, spec: &str, temp: &mut usize) -> String {
    if let Some(ns) = clause.strip_prefix('*') {
        let ns = ns.trim().trim_start_matches("as").trim();
        return format!("{indent}const {ns} = require({spec});");
    }
    if clause.starts_with('{') {
        return format!("{indent}const {} = require({spec});", destructure(clause));
    }
    match clause.split_once(',') {
        None => format!("{indent}const {clause} = __sheaf.interop(require({spec})).default;"),
        Some((default, rest)) => {
            *temp += 1;
            let module = format!("__sheaf_m{}", temp);
            let rest = rest.trim();
            let second = if let Some(ns) = rest.strip_prefix('*') {
                let ns = ns.trim().trim_start_matches("as").trim();
                format!("const {ns} = {module};")
            } else {
                format!("const {} = {module};", destructure(rest))
            };
            format!(
                "{indent}const {module} = require({spec}); const {} = __sheaf.interop({module}).default; {second}",
                default.trim()
            )
        }
    }
}
