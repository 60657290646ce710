//! Built-in transform units
//!
//! Each unit implements [`TransformUnit`](crate::domain::ports::TransformUnit).
//! [`builtin_registry`] registers all of them under the names rule `use`
//! lists refer to.

mod asset;
mod component;
mod data;
mod define;
mod esm;
mod style;

use std::sync::Arc;

use crate::domain::services::TransformRegistry;
use crate::error::SheafResult;

pub use asset::{data_uri, inline_decision, mime_type, AssetUnit};
pub use component::{Blocks, ComponentUnit};
pub use data::{JsonUnit, RawUnit};
pub use define::DefineUnit;
pub use esm::EsmUnit;
pub use style::{StyleExtractUnit, StyleImportsUnit};

/// Registry holding every built-in unit.
pub fn builtin_registry() -> SheafResult<TransformRegistry> {
    let mut registry = TransformRegistry::new();
    registry.register(Arc::new(EsmUnit::new()?))?;
    registry.register(Arc::new(DefineUnit::new()?))?;
    registry.register(Arc::new(ComponentUnit::new()?))?;
    registry.register(Arc::new(StyleImportsUnit::new()?))?;
    registry.register(Arc::new(StyleExtractUnit::new()))?;
    registry.register(Arc::new(AssetUnit::new()))?;
    registry.register(Arc::new(JsonUnit))?;
    registry.register(Arc::new(RawUnit))?;
    Ok(registry)
}
