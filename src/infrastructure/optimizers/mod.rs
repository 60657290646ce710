//! Built-in optimizers
//!
//! One optimizer per content type plus the gzip compressor. Which of them run
//! is decided by the resolved [`ModeProfile`].

mod compress;
mod image;
mod script;
mod style;

use std::sync::Arc;

use crate::config::ModeProfile;
use crate::domain::services::OptimizerSet;
use crate::error::SheafResult;

pub use compress::GzipCompressor;
pub use image::ImageOptimizer;
pub use script::ScriptMinifier;
pub use style::StyleMinifier;

/// Optimizer set for a build profile.
pub fn standard_optimizers(profile: &ModeProfile) -> SheafResult<OptimizerSet> {
    let mut set = OptimizerSet::new();
    if profile.minify_scripts {
        set.register(Arc::new(ScriptMinifier::new()))?;
    }
    if profile.minify_styles {
        set.register(Arc::new(StyleMinifier::new()))?;
    }
    if profile.optimize_images {
        set.register(Arc::new(ImageOptimizer::new()?))?;
    }
    if profile.compress {
        set.set_compressor(Arc::new(GzipCompressor::new()));
    }
    Ok(set)
}
