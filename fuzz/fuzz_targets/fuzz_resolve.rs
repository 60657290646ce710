#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use sheaf::domain::services::{ResolveOptions, Resolver};
use sheaf::infrastructure::MemoryFs;
use sheaf::ModuleId;

fuzz_target!(|data: &[u8]| {
    if let Ok(specifier) = std::str::from_utf8(data) {
        let fs = MemoryFs::new()
            .with_file("/p/src/main.js", "")
            .with_file("/p/src/util.js", "")
            .with_file("/p/node_modules/pkg/package.json", "{\"main\": \"index.js\"}")
            .with_file("/p/node_modules/pkg/index.js", "");
        let resolver = Resolver::new(Arc::new(fs.clone()), ResolveOptions::default());
        if let Ok(id) = resolver.resolve(specifier, &ModuleId::new("/p/src/main.js")) {
            assert!(fs.get(id.path()).is_some());
        }
    }
});
