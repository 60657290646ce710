//! Copy patterns: files taken verbatim into the output

use tracing::{debug, warn};

use crate::config::CopyPattern;
use crate::domain::entities::{AssetKind, EmittedAsset};
use crate::domain::ports::FileSystem;
use crate::error::SheafResult;

/// Every file under each pattern's `from`, named `<to>/<relative path>`.
pub fn collect_copies(fs: &dyn FileSystem, patterns: &[CopyPattern]) -> SheafResult<Vec<EmittedAsset>> {
    let mut assets = Vec::new();
    for pattern in patterns {
        if !fs.is_dir(&pattern.from) {
            warn!(from = %pattern.from.display(), "copy source is not a directory, skipping");
            continue;
        }
        for file in fs.list_files(&pattern.from)? {
            let Ok(relative) = file.strip_prefix(&pattern.from) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let target = if pattern.to.is_empty() {
                relative
            } else {
                format!("{}/{}", pattern.to, relative)
            };
            let bytes = fs.read(&file)?;
            assets.push(EmittedAsset::new(target.clone(), target, AssetKind::Copy, bytes));
        }
    }
    debug!(files = assets.len(), "collected copy patterns");
    Ok(assets)
}
