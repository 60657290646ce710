//! `component` unit: single-file component splitting
//!
//! A component file holds one `<template>`, one `<script>` and any number of
//! `<style>` blocks. The script block becomes the module body with its
//! default export captured as `__component`; the template is attached to it as
//! a string and every style block becomes a stylesheet artifact.

use regex::Regex;

use crate::domain::entities::{ModuleContent, SideArtifact};
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;
use crate::error::SheafResult;

pub struct ComponentUnit {
    template: Regex,
    script: Regex,
    style: Regex,
    default_export: Regex,
}

/// The blocks of one component file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Blocks {
    pub template: Option<String>,
    pub script: Option<String>,
    pub styles: Vec<String>,
}

impl ComponentUnit {
    pub fn new() -> SheafResult<Self> {
        Ok(Self {
            // Greedy: templates nest <template> tags.
            template: Regex::new(r"(?s)<template(?:\s[^>]*)?>(.*)</template>")?,
            script: Regex::new(r"(?s)<script(?:\s[^>]*)?>(.*?)</script>")?,
            style: Regex::new(r"(?s)<style(?:\s[^>]*)?>(.*?)</style>")?,
            default_export: Regex::new(r"(?m)^([ \t]*)export\s+default\s+")?,
        })
    }

    pub fn blocks(&self, source: &str) -> Blocks {
        let inner = |re: &Regex| re.captures(source).map(|c| trim_block(&c[1]));
        Blocks {
            template: inner(&self.template),
            script: inner(&self.script),
            styles: self
                .style
                .captures_iter(source)
                .map(|c| trim_block(&c[1]))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Module body for the given blocks.
    pub fn assemble(&self, blocks: &Blocks) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        match blocks.script.as_deref() {
            Some(script) if self.default_export.is_match(script) => {
                out.push_str(&self.default_export.replacen(script, 1, "${1}const __component = "));
            }
            Some(script) => {
                out.push_str(script);
                out.push_str("\nconst __component = {};");
            }
            None => out.push_str("const __component = {};"),
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if let Some(template) = &blocks.template {
            out.push_str("__component.template = ");
            out.push_str(&serde_json::to_string(template)?);
            out.push_str(";\n");
        }
        out.push_str("export default __component;\n");
        Ok(out)
    }
}

fn trim_block(block: &str) -> String {
    block.trim_matches(|c| c == '\n' || c == '\r').to_string()
}

impl TransformUnit for ComponentUnit {
    fn name(&self) -> &str {
        "component"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        module_type == ModuleType::Template
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let source = input.into_text()?;
        let blocks = self.blocks(&source);
        let mut output = UnitOutput::text(self.assemble(&blocks)?);
        for text in blocks.styles {
            output = output.with_artifact(SideArtifact::Stylesheet { text });
        }
        Ok(output)
    }
}
