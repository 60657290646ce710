//! Property tests for specifier resolution.

use std::sync::Arc;

use proptest::prelude::*;

use sheaf::domain::services::{ResolveOptions, Resolver};
use sheaf::infrastructure::MemoryFs;
use sheaf::ModuleId;

fn project() -> MemoryFs {
    MemoryFs::new()
        .with_file("/p/src/main.js", "")
        .with_file("/p/src/util.js", "")
        .with_file("/p/src/lib/index.js", "")
        .with_file("/p/src/data.json", "{}")
        .with_file("/p/node_modules/pkg/package.json", "{\"main\": \"lib/entry.js\"}")
        .with_file("/p/node_modules/pkg/lib/entry.js", "")
}

fn resolver(fs: &MemoryFs) -> Resolver {
    Resolver::new(Arc::new(fs.clone()), ResolveOptions::default())
}

fn specifier() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,48}",
        proptest::string::string_regex("(\\./|\\.\\./|/)?[a-z./]{0,16}(\\?[a-z=]{0,6})?").unwrap(),
        Just("./util".to_string()),
        Just("./lib".to_string()),
        Just("pkg".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: resolution never panics, and a resolved module always names
    /// a file that exists.
    #[test]
    fn property_resolution_lands_on_files(request in specifier()) {
        let fs = project();
        let from = ModuleId::new("/p/src/main.js");

        if let Ok(id) = resolver(&fs).resolve(&request, &from) {
            prop_assert!(fs.get(id.path()).is_some(), "{} resolved to {}", request, id);
        }
    }

    /// PROPERTY: resolving the same specifier twice gives the same answer.
    #[test]
    fn property_resolution_is_deterministic(request in specifier()) {
        let fs = project();
        let from = ModuleId::new("/p/src/main.js");
        let resolver = resolver(&fs);

        let first = resolver.resolve(&request, &from).ok();
        let second = resolver.resolve(&request, &from).ok();
        prop_assert_eq!(first, second);
    }
}
