//! Property tests for `sheaf.toml` parsing.

use std::path::Path;

use proptest::prelude::*;

use sheaf::config::parse_with_warnings;

fn unknown_key() -> impl Strategy<Value = String> {
    // `zz` prefix keeps generated keys clear of every real config key
    proptest::string::string_regex("zz[a-z_]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing arbitrary text returns a result and never panics.
    #[test]
    fn property_parse_never_panics(s in ".{0,256}") {
        let _ = parse_with_warnings(&s, Path::new("sheaf.toml"));
    }

    /// PROPERTY: an unknown top-level key is a warning, not an error, and the
    /// warning points at the line the key was written on.
    #[test]
    fn property_unknown_keys_warn_with_line(key in unknown_key(), blank_lines in 0usize..5) {
        let content = format!(
            "{}{} = true\n[entry]\napp = \"./src/main.js\"\n",
            "\n".repeat(blank_lines),
            key
        );
        let (config, warnings) = parse_with_warnings(&content, Path::new("sheaf.toml")).unwrap();

        prop_assert_eq!(config.entry.len(), 1);
        prop_assert_eq!(warnings.len(), 1);
        prop_assert_eq!(&warnings[0].key, &key);
        prop_assert_eq!(warnings[0].line, Some(blank_lines + 1));
    }
}
