//! Property-based tests for the reader
//!
//! These use proptest to generate random inputs and verify that:
//! 1. The scanner and parser never panic on arbitrary input
//! 2. Generated well-formed sources parse to the generated form count
//! 3. Rendering a parsed form and re-parsing it is the identity
//! 4. Whitespace and comments between tokens never change the AST

use proptest::prelude::*;
use sexpr_stream::{parse_str, Scanner};

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Arbitrary ASCII soup that might break the reader
fn arbitrary_source() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,300}").unwrap()
}

/// A single well-formed top-level form, rendered as source text
fn form() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        // Symbols
        "[a-z+*!?<=>-][a-z0-9+*!?<=>-]{0,6}",
        // Integers
        (0u32..100_000u32).prop_map(|n| n.to_string()),
        // Floats, including the half-written shapes
        (0u32..1000u32, 0u32..1000u32).prop_map(|(a, b)| format!("{}.{}", a, b)),
        (1u32..1000u32).prop_map(|n| format!("{}.", n)),
        (1u32..1000u32).prop_map(|n| format!(".{}", n)),
    ];
    leaf.prop_recursive(4, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5)
                .prop_map(|elements| format!("({})", elements.join(" "))),
            inner.prop_map(|e| format!("'{}", e)),
        ]
    })
}

/// Whitespace-or-comment filler that may legally separate two forms
fn filler() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just(" \t\n ".to_string()),
        Just(" ; a comment\n".to_string()),
        Just(" ;; another ;; comment\n\n".to_string()),
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn scanner_never_panics(source in arbitrary_source()) {
        let _ = Scanner::new(&source, "fuzz").scan_tokens();
    }

    #[test]
    fn parser_never_panics(source in arbitrary_source()) {
        let _ = parse_str(&source, "fuzz");
    }

    #[test]
    fn paren_soup_never_panics(source in r"['()\s;a-z0-9.]{0,200}") {
        let _ = parse_str(&source, "fuzz");
    }

    #[test]
    fn well_formed_sources_parse_to_the_generated_count(
        forms in prop::collection::vec(form(), 0..8)
    ) {
        let source = forms.join(" ");
        let parsed = parse_str(&source, "fuzz").unwrap();
        prop_assert_eq!(parsed.len(), forms.len());
    }

    #[test]
    fn render_then_reparse_is_identity(forms in prop::collection::vec(form(), 1..6)) {
        let source = forms.join(" ");
        let parsed = parse_str(&source, "fuzz").unwrap();
        let rendered = parsed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let reparsed = parse_str(&rendered, "fuzz").unwrap();
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn whitespace_and_comments_never_change_the_ast(
        forms in prop::collection::vec(form(), 1..6),
        fill in filler(),
    ) {
        let plain = forms.join(" ");
        let padded = format!("{}{}{}", fill, forms.join(&fill), fill);
        prop_assert_eq!(
            parse_str(&plain, "plain").unwrap(),
            parse_str(&padded, "padded").unwrap()
        );
    }

    #[test]
    fn errors_are_anchored_inside_the_source(source in arbitrary_source()) {
        if let Err(err) = parse_str(&source, "fuzz") {
            let coord = err.coordinate();
            prop_assert!(coord.line >= 1);
            // Rendering must never panic, whatever the position.
            let _ = err.to_string();
        }
    }
}
