use super::classes::JOINED_CLASS;
use super::factory::{NodeFactory, Tag};

/// Index of a node in an [`OutputTree`] arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// A `div` or `span` with its classes, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<NodeId>,
    attached: bool,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            attached: false,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNode {
    Element(Element),
    /// A run of source text.
    Text(String),
    /// The zero-width caret anchor closing a line. Not source content.
    Marker,
}

/// In-memory arena of output nodes.
///
/// Nodes are addressed by [`NodeId`] and never removed. Replacing a frame's
/// element during a line split allocates a new entry; an element that has
/// been appended to a parent is never mutated again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputTree {
    nodes: Vec<OutputNode>,
    root: NodeId,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena entries, including text runs and markers.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&OutputNode> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0) {
            Some(OutputNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Contents of a text run.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0) {
            Some(OutputNode::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map_or(&[], |el| el.children.as_slice())
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        self.element(id).map_or(&[], |el| el.classes.as_slice())
    }

    /// Block containers, in document order.
    pub fn blocks(&self) -> &[NodeId] {
        self.children(self.root)
    }

    /// Line containers of a block.
    pub fn lines(&self, block: NodeId) -> &[NodeId] {
        self.children(block)
    }

    /// All lines of the document, in order.
    pub fn all_lines(&self) -> Vec<NodeId> {
        self.blocks()
            .iter()
            .flat_map(|&block| self.lines(block).iter().copied())
            .collect()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    /// Concatenated source text below `id`, markers excluded.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            match self.nodes.get(id.0) {
                Some(OutputNode::Text(text)) => out.push_str(text),
                Some(OutputNode::Element(el)) => pending.extend(el.children.iter().rev()),
                Some(OutputNode::Marker) | None => {}
            }
        }
    }

    /// Source text of one line, without its boundary marker.
    pub fn line_text(&self, line: NodeId) -> String {
        self.text_content(line)
    }

    /// Whether the last child of `line` is the boundary marker.
    pub fn ends_with_marker(&self, line: NodeId) -> bool {
        self.children(line)
            .last()
            .is_some_and(|&last| matches!(self.node(last), Some(OutputNode::Marker)))
    }

    /// Text of every source line, in order. A line marked as joined
    /// shares its source line with the next one.
    pub fn source_lines(&self) -> Vec<String> {
        let mut lines = vec![String::new()];
        for line in self.all_lines() {
            if let Some(current) = lines.last_mut() {
                current.push_str(&self.line_text(line));
            }
            if !self.has_class(line, JOINED_CLASS) {
                lines.push(String::new());
            }
        }
        if lines.len() > 1 {
            lines.pop();
        }
        lines
    }

    /// Rebuilds the source text: every source line, joined by the line
    /// breaks the lines were split on.
    pub fn source_text(&self) -> String {
        self.source_lines().join("\n")
    }

    fn push(&mut self, node: OutputNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn open_element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0) {
            Some(OutputNode::Element(el)) => {
                debug_assert!(!el.attached, "element {id:?} mutated after being appended");
                Some(el)
            }
            _ => None,
        }
    }

    fn append_leaf(&mut self, parent: NodeId, node: OutputNode) {
        let id = self.push(node);
        if let Some(el) = self.open_element_mut(parent) {
            el.children.push(id);
        }
    }
}

impl NodeFactory for OutputTree {
    type Handle = NodeId;

    fn create_element(&mut self, tag: Tag) -> NodeId {
        self.push(OutputNode::Element(Element::new(tag)))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(OutputNode::Element(el)) = self.nodes.get_mut(child.0) {
            el.attached = true;
        }
        if let Some(el) = self.open_element_mut(parent) {
            el.children.push(child);
        }
    }

    fn add_class(&mut self, element: NodeId, class: &str) {
        if let Some(el) = self.open_element_mut(element)
            && !el.has_class(class)
        {
            el.classes.push(class.to_string());
        }
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(el) = self.open_element_mut(element) {
            match el.attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn append_text(&mut self, element: NodeId, text: &str) {
        if !text.is_empty() {
            self.append_leaf(element, OutputNode::Text(text.to_string()));
        }
    }

    fn append_marker(&mut self, element: NodeId) {
        self.append_leaf(element, OutputNode::Marker);
    }
}
