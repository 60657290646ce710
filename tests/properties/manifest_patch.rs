//! Property tests for manifest diffing and patching.

use std::collections::BTreeMap;

use proptest::prelude::*;

use sheaf::Manifest;

fn manifest() -> impl Strategy<Value = Manifest> {
    let name = proptest::string::string_regex("[a-d]{1,2}\\.(js|css)").unwrap();
    let path = proptest::string::string_regex("/[a-d]{1,2}\\.[0-9a-f]{2}").unwrap();
    proptest::collection::btree_map(name, path, 0..6).prop_map(|entries: BTreeMap<_, _>| {
        let mut manifest = Manifest::new();
        for (name, path) in entries {
            manifest.insert(name, path);
        }
        manifest
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: patching with the removed names reported by `changed_names`
    /// turns the previous manifest into the next one.
    #[test]
    fn property_patch_with_removals_reaches_next(prev in manifest(), next in manifest()) {
        let removed: Vec<String> = prev
            .changed_names(&next)
            .into_iter()
            .filter(|name| next.get(name).is_none())
            .collect();

        let mut patched = prev.clone();
        patched.patch(&next, &removed);

        prop_assert_eq!(patched, next);
    }

    /// PROPERTY: a manifest never differs from itself, and every name that
    /// differs between two manifests is reported exactly once.
    #[test]
    fn property_changed_names_are_sorted_and_complete(prev in manifest(), next in manifest()) {
        prop_assert!(prev.changed_names(&prev).is_empty());

        let changed = prev.changed_names(&next);
        let mut sorted = changed.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&changed, &sorted);

        for name in prev.names().chain(next.names()) {
            let differs = prev.get(name) != next.get(name);
            prop_assert_eq!(differs, changed.iter().any(|c| c == name), "name {}", name);
        }
    }

    /// PROPERTY: reading a manifest file never panics on arbitrary input.
    #[test]
    fn property_from_json_never_panics(s in ".{0,128}") {
        let _ = Manifest::from_json(&s);
    }
}
