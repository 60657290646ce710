//! `define` unit: compile-time constant substitution

use regex::{Captures, Regex};

use crate::domain::entities::ModuleContent;
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;
use crate::error::SheafResult;

/// Replaces identifier chains (`__PROD__`, `process.env.NODE_ENV`) with the
/// literal text from the define table.
///
/// The longest defined prefix of a chain wins, so `process.env.NODE_ENV.length`
/// with `process.env.NODE_ENV` defined becomes `"production".length`. Member
/// accesses (`foo.__PROD__`) are left alone.
pub struct DefineUnit {
    chain: Regex,
}

impl DefineUnit {
    pub fn new() -> SheafResult<Self> {
        Ok(Self {
            chain: Regex::new(r"(^|[^\w$.])([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)")?,
        })
    }

    pub fn substitute(&self, text: &str, table: &std::collections::BTreeMap<String, String>) -> String {
        if table.is_empty() {
            return text.to_string();
        }
        self.chain
            .replace_all(text, |caps: &Captures<'_>| {
                let lead = &caps[1];
                let chain = &caps[2];
                match longest_defined(chain, table) {
                    Some((len, value)) => format!("{}{}{}", lead, value, &chain[len..]),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Longest key that equals `chain` or is followed by `.` in it.
fn longest_defined<'t>(
    chain: &str,
    table: &'t std::collections::BTreeMap<String, String>,
) -> Option<(usize, &'t str)> {
    let mut end = chain.len();
    loop {
        if let Some(value) = table.get(&chain[..end]) {
            return Some((end, value));
        }
        end = chain[..end].rfind('.')?;
    }
}

impl TransformUnit for DefineUnit {
    fn name(&self) -> &str {
        "define"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        matches!(module_type, ModuleType::Script | ModuleType::Template)
    }

    fn run(&self, input: ModuleContent, ctx: &TransformContext<'_>) -> UnitResult {
        let text = input.into_text()?;
        Ok(UnitOutput::text(self.substitute(&text, ctx.define)))
    }
}
