use std::fmt::Write;

use super::tree::{NodeId, OutputNode, OutputTree};

/// Indented outline of the tree, one node per line.
///
/// Elements print as `tag.class.class [name=value]`, text runs as quoted
/// strings and boundary markers as `<marker>`.
pub fn dump(tree: &OutputTree) -> String {
    let mut out = String::new();
    dump_node(tree, tree.root(), 0, &mut out);
    out
}

fn dump_node(tree: &OutputTree, id: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match tree.node(id) {
        Some(OutputNode::Element(el)) => {
            out.push_str(&indent);
            out.push_str(el.tag.as_str());
            for class in &el.classes {
                out.push('.');
                out.push_str(class);
            }
            for (name, value) in &el.attributes {
                let _ = write!(out, " [{name}={value}]");
            }
            out.push('\n');
            for &child in &el.children {
                dump_node(tree, child, depth + 1, out);
            }
        }
        Some(OutputNode::Text(text)) => {
            let _ = writeln!(out, "{indent}{text:?}");
        }
        Some(OutputNode::Marker) => {
            let _ = writeln!(out, "{indent}<marker>");
        }
        None => {}
    }
}
