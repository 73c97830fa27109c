use std::fmt;

use super::span::Span;

/// Node types of the parsed tree, named after their mdast counterparts.
///
/// The names double as the suffix of the class name the overlay attaches to
/// a node's output elements, so they must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading {
        /// 1 to 6
        depth: u8,
    },
    ThematicBreak,
    Blockquote,
    List,
    ListItem,
    Html,
    Code,
    Math {
        /// Routes display math to a custom block component when non-empty.
        meta: Option<String>,
    },
    Definition,
    FootnoteDefinition,
    Text,
    Emphasis,
    Strong,
    Delete,
    InlineCode,
    InlineMath,
    Break,
    Link,
    Image,
    LinkReference,
    ImageReference,
    FootnoteReference,
    Table,
    TableRow,
    TableCell,
    Yaml,
    /// Any type outside the fixed vocabulary, kept under its own name.
    Other(String),
}

impl NodeKind {
    /// Looks up a kind by its mdast type name. Unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "root" => Self::Root,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading { depth: 1 },
            "thematicBreak" => Self::ThematicBreak,
            "blockquote" => Self::Blockquote,
            "list" => Self::List,
            "listItem" => Self::ListItem,
            "html" => Self::Html,
            "code" => Self::Code,
            "math" => Self::Math { meta: None },
            "definition" => Self::Definition,
            "footnoteDefinition" => Self::FootnoteDefinition,
            "text" => Self::Text,
            "emphasis" => Self::Emphasis,
            "strong" => Self::Strong,
            "delete" => Self::Delete,
            "inlineCode" => Self::InlineCode,
            "inlineMath" => Self::InlineMath,
            "break" => Self::Break,
            "link" => Self::Link,
            "image" => Self::Image,
            "linkReference" => Self::LinkReference,
            "imageReference" => Self::ImageReference,
            "footnoteReference" => Self::FootnoteReference,
            "table" => Self::Table,
            "tableRow" => Self::TableRow,
            "tableCell" => Self::TableCell,
            "yaml" => Self::Yaml,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Paragraph => "paragraph",
            Self::Heading { .. } => "heading",
            Self::ThematicBreak => "thematicBreak",
            Self::Blockquote => "blockquote",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::Html => "html",
            Self::Code => "code",
            Self::Math { .. } => "math",
            Self::Definition => "definition",
            Self::FootnoteDefinition => "footnoteDefinition",
            Self::Text => "text",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Delete => "delete",
            Self::InlineCode => "inlineCode",
            Self::InlineMath => "inlineMath",
            Self::Break => "break",
            Self::Link => "link",
            Self::Image => "image",
            Self::LinkReference => "linkReference",
            Self::ImageReference => "imageReference",
            Self::FootnoteReference => "footnoteReference",
            Self::Table => "table",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::Yaml => "yaml",
            Self::Other(name) => name,
        }
    }

    /// Flow content shares one visual line with its container instead of
    /// opening a new nesting level.
    pub fn is_flow_content(&self) -> bool {
        matches!(
            self,
            Self::Blockquote | Self::ListItem | Self::FootnoteDefinition
        )
    }

    /// Verbatim types whose per-line elements get `first`/`last` markers.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Html | Self::Code | Self::Math { .. })
    }

    /// Types that carry children in the parsed tree.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Root
                | Self::Paragraph
                | Self::Heading { .. }
                | Self::Blockquote
                | Self::List
                | Self::ListItem
                | Self::FootnoteDefinition
                | Self::Emphasis
                | Self::Strong
                | Self::Delete
                | Self::Link
                | Self::LinkReference
                | Self::Table
                | Self::TableRow
                | Self::TableCell
        )
    }

    /// Types that occupy whole source lines.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading { .. }
                | Self::ThematicBreak
                | Self::Blockquote
                | Self::List
                | Self::ListItem
                | Self::Code
                | Self::Math { .. }
                | Self::Definition
                | Self::FootnoteDefinition
                | Self::Table
                | Self::TableRow
                | Self::Yaml
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading { depth } => write!(f, "heading({depth})"),
            other => f.write_str(other.name()),
        }
    }
}

/// A node of the externally parsed tree.
///
/// The parser owns this tree; the overlay only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNode {
    pub kind: NodeKind,
    /// Absent for synthetic nodes; such nodes contribute no output.
    pub span: Option<Span>,
    pub children: Vec<ParsedNode>,
}

impl ParsedNode {
    pub fn new(kind: NodeKind, span: impl Into<Span>) -> Self {
        Self {
            kind,
            span: Some(span.into()),
            children: Vec::new(),
        }
    }

    pub fn without_span(kind: NodeKind) -> Self {
        Self {
            kind,
            span: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ParsedNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether the overlay recurses into this node rather than emitting its
    /// source text as a single literal.
    pub fn walks_children(&self) -> bool {
        self.kind.is_container() || !self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ParsedNode::node_count).sum::<usize>()
    }
}
