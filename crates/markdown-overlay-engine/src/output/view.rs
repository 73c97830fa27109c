use std::collections::BTreeMap;

use serde::Serialize;

use super::tree::{NodeId, OutputNode, OutputTree};

/// Owned, serializable view of an element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementView {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<ChildView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChildView {
    Element(ElementView),
    Text { text: String },
    Marker,
}

/// Snapshot of the whole tree starting at its root.
pub fn to_view(tree: &OutputTree) -> Option<ElementView> {
    element_view(tree, tree.root())
}

fn element_view(tree: &OutputTree, id: NodeId) -> Option<ElementView> {
    let el = tree.element(id)?;
    let children = el
        .children
        .iter()
        .filter_map(|&child| match tree.node(child)? {
            OutputNode::Element(_) => element_view(tree, child).map(ChildView::Element),
            OutputNode::Text(text) => Some(ChildView::Text { text: text.clone() }),
            OutputNode::Marker => Some(ChildView::Marker),
        })
        .collect();
    Some(ElementView {
        tag: el.tag.as_str(),
        classes: el.classes.clone(),
        attributes: el.attributes.iter().cloned().collect(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{NodeFactory, Tag};

    #[test]
    fn serializes_tagged_children() {
        let mut tree = OutputTree::new();
        let root = tree.create_element(Tag::Div);
        let span = tree.create_element(Tag::Span);
        tree.add_class(span, "md-delimiter");
        tree.append_text(span, "#");
        tree.append_child(root, span);
        tree.append_marker(root);
        tree.set_root(root);

        let json = serde_json::to_value(to_view(&tree).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "div",
                "children": [
                    {
                        "kind": "element",
                        "tag": "span",
                        "classes": ["md-delimiter"],
                        "children": [{ "kind": "text", "text": "#" }]
                    },
                    { "kind": "marker" }
                ]
            })
        );
    }
}
