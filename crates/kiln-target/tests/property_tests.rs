//! Property tests for the import rewriter.

use kiln_target::{ImportRewriter, SpecifierKind, classify, find_static_imports};
use proptest::prelude::*;

fn specifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,10}",
        "@[a-z]{1,6}/[a-z]{1,8}",
        "(fs|path|http|crypto|stream/web|fs/promises|process)",
        "node:(fs|path|os|url|test|left-pad)",
        "npm:[a-z]{1,8}",
        "\\./[a-z]{1,8}\\.mjs",
        "\\.\\./[a-z]{1,8}",
        "/[a-z]{1,8}/[a-z]{1,8}\\.js",
        "https://[a-z]{1,8}\\.com/[a-z]{1,8}\\.ts",
    ]
}

fn statement_strategy() -> impl Strategy<Value = String> {
    (specifier_strategy(), 0..4usize, any::<bool>()).prop_map(|(specifier, form, double)| {
        let quote = if double { '"' } else { '\'' };
        match form {
            0 => format!("import x from {quote}{specifier}{quote};"),
            1 => format!("import {{ a, b as c }} from {quote}{specifier}{quote};"),
            2 => format!("import * as ns from {quote}{specifier}{quote};"),
            _ => format!("import {quote}{specifier}{quote};"),
        }
    })
}

fn chunk_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(statement_strategy(), 0..8)
        .prop_map(|statements| format!("{}\nexport default 1;\n", statements.join("\n")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// rewrite(rewrite(T).code) reports no change
    #[test]
    fn prop_rewrite_is_idempotent(code in chunk_strategy()) {
        let rewriter = ImportRewriter::new();
        if let Some(once) = rewriter.rewrite(&code, None).unwrap() {
            prop_assert!(rewriter.rewrite(&once.code, None).unwrap().is_none());
        }
    }

    /// After a rewrite no static import is bare or an unprefixed builtin.
    #[test]
    fn prop_rewritten_specifiers_carry_schemes(code in chunk_strategy()) {
        let output = ImportRewriter::new()
            .rewrite(&code, None)
            .unwrap()
            .map(|out| out.code)
            .unwrap_or(code);

        for import in find_static_imports(&output) {
            match classify(import.specifier) {
                SpecifierKind::Bare(_) => {
                    prop_assert!(false, "bare specifier left: {}", import.specifier)
                }
                SpecifierKind::PlatformBuiltin(_) => {
                    prop_assert!(import.specifier.starts_with("node:"));
                }
                _ => {}
            }
        }
    }

    /// Rewriting never changes the number of lines or the statement count.
    #[test]
    fn prop_rewrite_preserves_structure(code in chunk_strategy()) {
        if let Some(out) = ImportRewriter::new().rewrite(&code, Some("chunk.mjs")).unwrap() {
            prop_assert_eq!(out.code.lines().count(), code.lines().count());
            prop_assert_eq!(
                find_static_imports(&out.code).len(),
                find_static_imports(&code).len()
            );
            prop_assert!(out.map.is_some());
        }
    }
}
