//! Property tests for the script and stylesheet minifiers.

use proptest::prelude::*;

use sheaf::domain::ports::Optimizer;
use sheaf::infrastructure::optimizers::{ScriptMinifier, StyleMinifier};

fn gap() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just(" "), Just("\n  "), Just(" /* note */ ")]
}

fn script_token() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[a-z_][a-z0-9_]{0,5}").unwrap(),
        proptest::string::string_regex("[0-9]{1,3}").unwrap(),
        proptest::string::string_regex("\"[a-z /]{0,6}\"").unwrap(),
        proptest::string::string_regex("'[a-z ]{0,6}'").unwrap(),
        prop_oneof![
            Just("="), Just("+"), Just("-"), Just("*"), Just("("), Just(")"),
            Just("{"), Just("}"), Just(";"), Just(","), Just(".")
        ]
        .prop_map(str::to_string),
    ]
}

/// Script text built from tokens separated by whitespace and comments.
fn script() -> impl Strategy<Value = String> {
    let line_comment = prop_oneof![gap(), Just("// note\n")];
    proptest::collection::vec((script_token(), line_comment), 0..24).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(token, sep)| format!("{}{}", token, sep))
            .collect()
    })
}

/// A stylesheet made of rules with optional trailing semicolons.
fn stylesheet() -> impl Strategy<Value = String> {
    let value = prop_oneof![
        proptest::string::string_regex("[a-z0-9#]{1,6}").unwrap(),
        Just("\"a b\"".to_string()),
    ];
    let decl = (
        proptest::string::string_regex("[a-z-]{1,8}").unwrap(),
        gap(),
        value,
        gap(),
    )
        .prop_map(|(prop, g1, value, g2)| format!("{}{}:{}{}{}", prop, g1, g1, value, g2));
    let rule = (
        proptest::string::string_regex("[a-z.#]{1,6}").unwrap(),
        gap(),
        proptest::collection::vec(decl, 0..4),
        any::<bool>(),
        gap(),
    )
        .prop_map(|(selector, g, decls, trailing, g2)| {
            let mut body = decls.join(";");
            if trailing && !body.is_empty() {
                body.push(';');
            }
            format!("{}{}{{{}{}}}{}", selector, g, g2, body, g2)
        });
    proptest::collection::vec(rule, 0..4).prop_map(|rules| rules.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: minifying a minified script changes nothing.
    #[test]
    fn property_script_minifier_is_idempotent(source in script()) {
        let minifier = ScriptMinifier::new();
        let once = minifier.optimize(source.as_bytes()).unwrap();
        let twice = minifier.optimize(&once).unwrap();
        prop_assert_eq!(String::from_utf8_lossy(&twice), String::from_utf8_lossy(&once));
    }

    /// PROPERTY: minifying a minified stylesheet changes nothing.
    #[test]
    fn property_style_minifier_is_idempotent(source in stylesheet()) {
        let minifier = StyleMinifier::new();
        let once = minifier.optimize(source.as_bytes()).unwrap();
        let twice = minifier.optimize(&once).unwrap();
        prop_assert_eq!(String::from_utf8_lossy(&twice), String::from_utf8_lossy(&once));
    }

    /// PROPERTY: the minifiers return errors instead of panicking on arbitrary text.
    #[test]
    fn property_minifiers_never_panic(s in ".{0,128}") {
        let _ = ScriptMinifier::new().optimize(s.as_bytes());
        let _ = StyleMinifier::new().optimize(s.as_bytes());
    }
}
