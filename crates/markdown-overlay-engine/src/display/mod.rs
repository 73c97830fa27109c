//! # Display Path Boundary
//!
//! Maps a parsed tree onto caller-supplied UI components for read-only
//! display. Unlike the overlay this path keeps no scan offset and makes no
//! text-fidelity promise: nodes the host cannot or may not render are
//! dropped and their children take their place.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{NodeKind, ParsedNode, SourceText};

/// Type name standing in for math nodes routed to a custom block.
pub const CUSTOM_BLOCK_TYPE: &str = "customBlock";

/// Host-side lookup of the component rendering each node type.
pub trait ComponentRegistry {
    type Component: Clone;

    fn component(&self, type_name: &str) -> Option<Self::Component>;

    /// Component for a math node whose `meta` names a custom block.
    fn custom_block(&self, meta: &str) -> Option<Self::Component>;
}

/// What the registry is asked for when displaying a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKey<'a> {
    Node(&'a str),
    CustomBlock(&'a str),
}

impl DisplayKey<'_> {
    /// Name checked against the [`Allowlist`].
    pub fn type_name(&self) -> &str {
        match self {
            DisplayKey::Node(name) => name,
            DisplayKey::CustomBlock(_) => CUSTOM_BLOCK_TYPE,
        }
    }
}

pub fn display_key(node: &ParsedNode) -> DisplayKey<'_> {
    match &node.kind {
        NodeKind::Math { meta: Some(meta) } if !meta.is_empty() => DisplayKey::CustomBlock(meta),
        kind => DisplayKey::Node(kind.name()),
    }
}

/// Tags the display may render, each with the attributes it may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow(mut self, tag: &str, attributes: &[&str]) -> Self {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .extend(attributes.iter().map(|a| a.to_string()));
        self
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.tags
            .get(tag)
            .is_some_and(|attributes| attributes.contains(attribute))
    }
}

/// A parsed node bound to the component that displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode<C> {
    pub component: C,
    pub type_name: String,
    pub attributes: Vec<(String, String)>,
    /// Source text of leaves; containers get theirs from `children`.
    pub value: Option<String>,
    pub children: Vec<ComponentNode<C>>,
}

/// Maps `node` to components. A kept node yields one entry; a dropped node
/// yields its mapped children in its place.
pub fn to_components<R: ComponentRegistry>(
    node: &ParsedNode,
    source: &SourceText,
    registry: &R,
    allowlist: &Allowlist,
) -> Vec<ComponentNode<R::Component>> {
    let children: Vec<_> = node
        .children
        .iter()
        .flat_map(|child| to_components(child, source, registry, allowlist))
        .collect();

    let key = display_key(node);
    let type_name = key.type_name();
    let component = if allowlist.allows_tag(type_name) {
        match key {
            DisplayKey::Node(name) => registry.component(name),
            DisplayKey::CustomBlock(meta) => registry.custom_block(meta),
        }
    } else {
        None
    };
    let Some(component) = component else {
        log::trace!("hoisting children of undisplayed {type_name}");
        return children;
    };

    let attributes = node_attributes(&node.kind)
        .into_iter()
        .filter(|(name, _)| allowlist.allows_attribute(type_name, name))
        .collect();
    let value = match node.span {
        Some(span) if node.children.is_empty() => Some(source.slice_span(span).into_owned()),
        _ => None,
    };

    vec![ComponentNode {
        component,
        type_name: type_name.to_string(),
        attributes,
        value,
        children,
    }]
}

fn node_attributes(kind: &NodeKind) -> Vec<(String, String)> {
    match kind {
        NodeKind::Heading { depth } => vec![("depth".to_string(), depth.to_string())],
        NodeKind::Math { meta: Some(meta) } => vec![("meta".to_string(), meta.clone())],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParseOptions, parse_markdown};
    use pretty_assertions::assert_eq;

    /// Components are just the names they were looked up by.
    struct Names;

    impl ComponentRegistry for Names {
        type Component = String;

        fn component(&self, type_name: &str) -> Option<String> {
            (type_name != "yaml").then(|| format!("<{type_name}>"))
        }

        fn custom_block(&self, meta: &str) -> Option<String> {
            Some(format!("<custom:{meta}>"))
        }
    }

    fn names(nodes: &[ComponentNode<String>]) -> Vec<&str> {
        nodes.iter().map(|n| n.component.as_str()).collect()
    }

    #[test]
    fn math_with_meta_routes_to_custom_block() {
        let node = ParsedNode::new(
            NodeKind::Math {
                meta: Some("chart".into()),
            },
            0..1,
        );
        assert_eq!(display_key(&node), DisplayKey::CustomBlock("chart"));
        assert_eq!(display_key(&node).type_name(), CUSTOM_BLOCK_TYPE);

        let plain = ParsedNode::new(NodeKind::Math { meta: Some(String::new()) }, 0..1);
        assert_eq!(display_key(&plain), DisplayKey::Node("math"));
    }

    #[test]
    fn maps_allowed_nodes_to_components() {
        let src = "# Hi\n\n```math plot\nx\n```\n";
        let root = parse_markdown(src, &ParseOptions::default());
        let allow = Allowlist::new()
            .allow("root", &[])
            .allow("heading", &["depth"])
            .allow("text", &[])
            .allow(CUSTOM_BLOCK_TYPE, &[]);

        let out = to_components(&root, &SourceText::new(src), &Names, &allow);

        assert_eq!(names(&out), vec!["<root>"]);
        let blocks = &out[0].children;
        assert_eq!(names(blocks), vec!["<heading>", "<custom:plot>"]);
        assert_eq!(
            blocks[0].attributes,
            vec![("depth".to_string(), "1".to_string())]
        );
        assert_eq!(blocks[0].children[0].value.as_deref(), Some("Hi"));
        assert!(blocks[1].attributes.is_empty(), "meta is not allowed");
        assert_eq!(blocks[1].value.as_deref(), Some("```math plot\nx\n```"));
    }

    #[test]
    fn children_of_dropped_nodes_are_hoisted() {
        let src = "*a* b";
        let root = parse_markdown(src, &ParseOptions::default());
        let allow = Allowlist::new().allow("text", &[]);

        let out = to_components(&root, &SourceText::new(src), &Names, &allow);

        assert_eq!(names(&out), vec!["<text>", "<text>"]);
        let values: Vec<_> = out.iter().filter_map(|n| n.value.as_deref()).collect();
        assert_eq!(values, vec!["a", " b"]);
    }

    #[test]
    fn registry_gaps_drop_nodes_too() {
        let src = "---\nk: v\n---\n";
        let root = parse_markdown(src, &ParseOptions::default());
        let allow = Allowlist::new().allow("root", &[]).allow("yaml", &[]);

        let out = to_components(&root, &SourceText::new(src), &Names, &allow);
        assert!(out[0].children.is_empty());
    }
}
