#![no_main]

use libfuzzer_sys::fuzz_target;
use sheaf::infrastructure::transforms::{EsmUnit, StyleImportsUnit};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Import lowering and scanning work on arbitrary text
        if let Ok(esm) = EsmUnit::new() {
            let lowered = esm.rewrite(source);
            let _ = esm.scan(&lowered);
        }
        if let Ok(style) = StyleImportsUnit::new() {
            let _ = style.scan(source);
        }
    }
});
