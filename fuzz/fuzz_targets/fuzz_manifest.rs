#![no_main]

use libfuzzer_sys::fuzz_target;
use sheaf::Manifest;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(manifest) = Manifest::from_json(content) {
            // A parsed manifest always serializes and parses back to itself
            let json = manifest.to_json().expect("serialize");
            let again = Manifest::from_json(&json).expect("reparse");
            assert_eq!(manifest, again);
            assert!(manifest.changed_names(&again).is_empty());
        }
    }
});
