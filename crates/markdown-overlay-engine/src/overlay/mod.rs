//! # Overlay Builder
//!
//! Re-projects a parsed tree plus its source text into a nested
//! block > line > inline element tree whose text runs, read in order, are
//! exactly the source.
//!
//! ## Responsibilities
//!
//! All four work on one [`OverlayBuilder`] during a single depth-first pass:
//!
//! - **`scanner`**: owns the scan offset; appends literal and delimiter text
//!   and splits it on line breaks
//! - **`stack`**: one frame per open parsed node; enters, recurses, closes
//! - **`classify`**: decides which element receives a closed node's classes
//! - **`segmenter`**: the current block container, the pending top-level
//!   line, and the trailing block
//!
//! ## Key Invariants
//!
//! - The scan offset never decreases and never exceeds the source length
//! - A node contributes only `[max(start, offset), end)`; empty means nothing
//! - Every finalized line ends with the boundary marker
//! - Joining every line's text with `\n` gives back the source, except
//!   after a joined line, which shares its source line with the next

mod classify;
mod scanner;
mod segmenter;
mod stack;


use crate::models::{ParsedNode, SourceText};
use crate::output::{NodeFactory, OutputTree, Tag};

/// Builds the overlay for `root` over `source` into `factory`, returning the
/// handle of the root container.
///
/// Never fails: nodes without a span, empty after clamping, or pointing
/// outside the source are skipped, and their text surfaces as delimiter text
/// of the surrounding gap.
pub fn build_overlay<F: NodeFactory>(
    factory: &mut F,
    root: &ParsedNode,
    source: &SourceText,
) -> F::Handle {
    let mut builder = OverlayBuilder::new(factory, source);
    let end = root.span.map_or(source.len(), |sp| sp.end.min(source.len()));
    builder.visit(&root.children, end);
    builder.finish()
}

/// Builds the overlay into a fresh in-memory [`OutputTree`].
pub fn render_overlay(root: &ParsedNode, source: &SourceText) -> OutputTree {
    let mut tree = OutputTree::new();
    let root = build_overlay(&mut tree, root, source);
    tree.set_root(root);
    tree
}

/// One open parsed node during the walk.
struct Frame<'a, H> {
    node: &'a ParsedNode,
    /// Element currently being filled; replaced on every line split.
    element: H,
    /// No line of this node has been finalized yet.
    fresh: bool,
}

/// Build state of a single overlay pass.
struct OverlayBuilder<'a, F: NodeFactory> {
    factory: &'a mut F,
    source: &'a SourceText,
    /// Bytes of `source` already represented in the output.
    offset: usize,
    stack: Vec<Frame<'a, F::Handle>>,
    root: F::Handle,
    block: F::Handle,
    /// Top-level line collecting text while no node is open.
    pending_line: Option<F::Handle>,
    /// The last block ended exactly at the end of the source.
    ended_at_eof: bool,
    blocks: usize,
}

impl<'a, F: NodeFactory> OverlayBuilder<'a, F> {
    fn new(factory: &'a mut F, source: &'a SourceText) -> Self {
        let root = factory.create_element(Tag::Div);
        let block = factory.create_element(Tag::Div);
        Self {
            factory,
            source,
            offset: 0,
            stack: Vec::new(),
            root,
            block,
            pending_line: None,
            ended_at_eof: false,
            blocks: 0,
        }
    }
}
