use std::fmt::Write;

use super::classes::BOUNDARY_MARKER;
use super::tree::{NodeId, OutputNode, OutputTree};

/// Serializes the tree as HTML markup, one element per output node.
pub fn to_html(tree: &OutputTree) -> String {
    let mut out = String::new();
    write_node(tree, tree.root(), &mut out);
    out
}

fn write_node(tree: &OutputTree, id: NodeId, out: &mut String) {
    match tree.node(id) {
        Some(OutputNode::Element(el)) => {
            let tag = el.tag.as_str();
            out.push('<');
            out.push_str(tag);
            if !el.classes.is_empty() {
                let classes = el.classes.join(" ");
                let _ = write!(
                    out,
                    " class=\"{}\"",
                    html_escape::encode_double_quoted_attribute(&classes)
                );
            }
            for (name, value) in &el.attributes {
                let _ = write!(
                    out,
                    " {}=\"{}\"",
                    name,
                    html_escape::encode_double_quoted_attribute(value)
                );
            }
            out.push('>');
            for &child in &el.children {
                write_node(tree, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
        Some(OutputNode::Text(text)) => out.push_str(&html_escape::encode_text(text)),
        Some(OutputNode::Marker) => out.push(BOUNDARY_MARKER),
        None => {}
    }
}
