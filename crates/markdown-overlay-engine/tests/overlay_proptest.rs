//! Property-based tests for the overlay builder
//!
//! These tests check the overlay contract over arbitrary input:
//! - The overlay's source lines are exactly the source split on `\n`
//! - Block indices only ever increase
//! - Building twice gives identical trees
//! - Arbitrary, even malformed, spans never break any of the above
//! - The scan offset stays within the source (checked by the builder's
//!   debug assertions)

use markdown_overlay_engine::output::OutputTree;
use markdown_overlay_engine::snapshot::{self, normalize};
use markdown_overlay_engine::{
    NodeKind, ParseOptions, ParsedNode, SourceText, parse_markdown, render_overlay,
};
use proptest::prelude::*;

/// Markdown-ish text: mostly syntax characters, line breaks and some
/// multi-byte characters.
fn markdown_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z #*>_`~|\\-\\[\\]()!$\n]{0,120}",
        "[a-zé😀 *\n]{0,60}",
        prop::collection::vec(
            prop_oneof![
                Just("# heading\n"),
                Just("text *em* **strong**\n"),
                Just("> quote\n"),
                Just("- item\n"),
                Just("  - nested\n"),
                Just("```\ncode\n```\n"),
                Just("<div>\n"),
                Just("\n"),
                Just("| a | b |\n|---|---|\n"),
                Just("$$\nx\n$$\n"),
                Just("tail"),
            ],
            0..12
        )
        .prop_map(|parts| parts.concat()),
    ]
}

/// A flat run of nodes with arbitrary, possibly invalid spans.
fn wild_tree_strategy() -> impl Strategy<Value = (String, ParsedNode)> {
    "[a-z\n]{0,40}".prop_flat_map(|source| {
        let limit = source.len() + 4;
        let spans = prop::collection::vec(
            (0..limit, 0..limit, prop::bool::ANY, prop::bool::ANY),
            0..8,
        );
        (Just(source), spans).prop_map(|(source, spans)| {
            let children = spans
                .into_iter()
                .map(|(start, end, code, spanned)| {
                    let kind = if code { NodeKind::Code } else { NodeKind::Paragraph };
                    let node = if spanned {
                        ParsedNode::new(kind, start..end)
                    } else {
                        ParsedNode::without_span(kind)
                    };
                    node.with_children(vec![ParsedNode::new(NodeKind::Text, start..end)])
                })
                .collect();
            let root = ParsedNode::new(NodeKind::Root, 0..source.len()).with_children(children);
            (source, root)
        })
    })
}

fn check_contract(source: &str, tree: &OutputTree) {
    snapshot::invariants(&SourceText::new(source), tree);

    assert_eq!(tree.source_lines(), source.split('\n').collect::<Vec<_>>());

    let indices: Vec<usize> = normalize(tree).blocks.iter().filter_map(|b| b.index).collect();
    assert!(
        indices.windows(2).all(|w| w[0] < w[1]),
        "block indices not increasing: {indices:?}"
    );
}

proptest! {
    #[test]
    fn parsed_markdown_round_trips(source in markdown_strategy()) {
        let root = parse_markdown(&source, &ParseOptions::default());
        let tree = render_overlay(&root, &SourceText::new(&source));
        check_contract(&source, &tree);
    }

    #[test]
    fn rendering_is_deterministic(source in markdown_strategy()) {
        let root = parse_markdown(&source, &ParseOptions::default());
        let text = SourceText::new(&source);
        prop_assert_eq!(render_overlay(&root, &text), render_overlay(&root, &text));
    }

    #[test]
    fn malformed_spans_never_break_the_contract((source, root) in wild_tree_strategy()) {
        let tree = render_overlay(&root, &SourceText::new(&source));
        check_contract(&source, &tree);
    }
}
