#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing with unknown-key tracking should never panic
        if let Ok((config, _warnings)) =
            sheaf::config::parse_with_warnings(content, Path::new("sheaf.toml"))
        {
            let _ = sheaf::BuildOptions::resolve(&config, Path::new("/p"), sheaf::Mode::Production);
        }
    }
});
