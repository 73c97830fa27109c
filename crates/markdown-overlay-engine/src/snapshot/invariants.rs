use crate::models::SourceText;
use crate::output::OutputTree;
use crate::output::classes::BLOCK_CLASS;

/// Validates overlay output invariants.
///
/// Asserts that:
/// - Every child of the root is a block container
/// - Every block holds at least one line
/// - Every line ends with the boundary marker
/// - Joining the lines' text with `\n`, except after joined lines,
///   reproduces the source exactly
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(source: &SourceText, tree: &OutputTree) {
    let blocks = tree.blocks();
    assert!(!blocks.is_empty(), "overlay has no blocks");

    for (i, &block) in blocks.iter().enumerate() {
        assert!(
            tree.has_class(block, BLOCK_CLASS),
            "root child {i} is not a block: {:?}",
            tree.element(block)
        );
        let lines = tree.lines(block);
        assert!(!lines.is_empty(), "block {i} has no lines");
        for (j, &line) in lines.iter().enumerate() {
            assert!(
                tree.ends_with_marker(line),
                "line {j} of block {i} does not end with the boundary marker"
            );
        }
    }

    let rebuilt = tree.source_text();
    let expected = source.to_string();
    assert!(
        rebuilt == expected,
        "overlay text differs from source\n  source:  {expected:?}\n  overlay: {rebuilt:?}"
    );
}
