use serde::Serialize;

use crate::output::OutputTree;
use crate::output::classes::INDEX_ATTRIBUTE;

/// Block-and-line summary of an overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snap {
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSnap {
    /// Position among the parsed tree's top-level nodes; `None` for blocks
    /// made of text between nodes.
    pub index: Option<usize>,
    pub lines: Vec<LineSnap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSnap {
    /// Classes on the line element itself.
    pub classes: Vec<String>,
    /// Source text of the line, marker excluded.
    pub text: String,
}

pub fn normalize(tree: &OutputTree) -> Snap {
    let blocks = tree
        .blocks()
        .iter()
        .map(|&block| BlockSnap {
            index: tree
                .attribute(block, INDEX_ATTRIBUTE)
                .and_then(|v| v.parse().ok()),
            lines: tree
                .lines(block)
                .iter()
                .map(|&line| LineSnap {
                    classes: tree.classes(line).to_vec(),
                    text: tree.line_text(line),
                })
                .collect(),
        })
        .collect();
    Snap { blocks }
}
