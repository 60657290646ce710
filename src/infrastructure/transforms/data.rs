//! `json` and `raw` units: data files as modules

use crate::domain::entities::ModuleContent;
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;

/// Parses the file and exports its value. Re-serializing keeps the body
/// canonical, so whitespace-only edits do not change the output.
pub struct JsonUnit;

impl TransformUnit for JsonUnit {
    fn name(&self) -> &str {
        "json"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        module_type == ModuleType::Raw
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let value: serde_json::Value = serde_json::from_slice(input.as_bytes())?;
        Ok(UnitOutput::text(format!(
            "module.exports = {};",
            serde_json::to_string(&value)?
        )))
    }
}

/// Exports the file content as a string.
pub struct RawUnit;

impl TransformUnit for RawUnit {
    fn name(&self) -> &str {
        "raw"
    }

    fn accepts(&self, _module_type: ModuleType) -> bool {
        true
    }

    fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
        let text = input.into_text()?;
        Ok(UnitOutput::text(format!(
            "module.exports = {};",
            serde_json::to_string(&text)?
        )))
    }
}
