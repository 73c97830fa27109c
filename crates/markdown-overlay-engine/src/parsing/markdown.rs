use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, MetadataBlockKind, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::models::{NodeKind, ParsedNode, Span};

/// Syntax extensions enabled on top of CommonMark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub math: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            math: true,
        }
    }
}

impl ParseOptions {
    fn to_pulldown(self) -> Options {
        let mut options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_MATH, self.math);
        options
    }
}

/// Parses `source` into a tree whose spans are byte ranges into `source`.
///
/// Block spans stop before the line break that ends them. Code, HTML, math,
/// images and front matter are leaves; everything inside them is raw text.
pub fn parse_markdown(source: &str, options: &ParseOptions) -> ParsedNode {
    let mut builder = TreeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, options.to_pulldown()).into_offset_iter() {
        builder.push(event, range);
    }
    builder.finish()
}

struct Open {
    kind: NodeKind,
    span: Span,
    children: Vec<ParsedNode>,
}

struct TreeBuilder<'s> {
    source: &'s str,
    /// `stack[0]` is the root and is only closed by `finish`.
    stack: Vec<Open>,
    /// Nesting depth inside a leaf whose inner events are discarded.
    skip: usize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: vec![Open {
                kind: NodeKind::Root,
                span: Span::new(0, source.len()),
                children: Vec::new(),
            }],
            skip: 0,
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        if self.skip > 0 {
            match event {
                Event::Start(_) => self.skip += 1,
                Event::End(_) => {
                    self.skip -= 1;
                    if self.skip == 0 {
                        self.close();
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => {
                let leaf = matches!(
                    tag,
                    Tag::CodeBlock(_) | Tag::HtmlBlock | Tag::Image { .. } | Tag::MetadataBlock(_)
                );
                let kind = tag_kind(&tag);
                let span = self.span_of(&kind, range);
                self.stack.push(Open {
                    kind,
                    span,
                    children: Vec::new(),
                });
                if leaf {
                    self.skip = 1;
                }
            }
            Event::End(_) => self.close(),
            Event::Text(_) | Event::SoftBreak => self.leaf(NodeKind::Text, range),
            Event::Code(_) => self.leaf(NodeKind::InlineCode, range),
            Event::InlineMath(_) => self.leaf(NodeKind::InlineMath, range),
            Event::DisplayMath(_) => self.leaf(NodeKind::Math { meta: None }, range),
            Event::Html(_) | Event::InlineHtml(_) => self.leaf(NodeKind::Html, range),
            Event::FootnoteReference(_) => self.leaf(NodeKind::FootnoteReference, range),
            Event::HardBreak => self.leaf(NodeKind::Break, range),
            Event::Rule => self.leaf(NodeKind::ThematicBreak, range),
            Event::TaskListMarker(_) => {
                self.leaf(NodeKind::Other("taskListMarker".to_string()), range)
            }
        }
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        let span = self.span_of(&kind, range);
        self.attach(ParsedNode {
            kind,
            span: Some(span),
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            log::warn!("unbalanced end event ignored");
            return;
        }
        if let Some(open) = self.stack.pop() {
            self.attach(ParsedNode {
                kind: open.kind,
                span: Some(open.span),
                children: open.children,
            });
        }
    }

    fn attach(&mut self, node: ParsedNode) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    /// Block ranges reported by the parser include the terminating line
    /// break; the overlay expects them to stop at the end of the line.
    fn span_of(&self, kind: &NodeKind, range: Range<usize>) -> Span {
        let Range { start, mut end } = range;
        if kind.is_block() || matches!(kind, NodeKind::Html) {
            let bytes = self.source.as_bytes();
            while end > start && matches!(bytes.get(end - 1), Some(b'\n' | b'\r')) {
                end -= 1;
            }
        }
        Span::new(start, end)
    }

    fn finish(mut self) -> ParsedNode {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop() {
            Some(root) => ParsedNode {
                kind: root.kind,
                span: Some(root.span),
                children: root.children,
            },
            None => ParsedNode::new(NodeKind::Root, 0..self.source.len()),
        }
    }
}

fn tag_kind(tag: &Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            depth: *level as u8,
        },
        Tag::BlockQuote(_) => NodeKind::Blockquote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => fenced_kind(info),
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::Code,
        Tag::HtmlBlock => NodeKind::Html,
        Tag::List(_) => NodeKind::List,
        Tag::Item => NodeKind::ListItem,
        Tag::FootnoteDefinition(_) => NodeKind::FootnoteDefinition,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Delete,
        Tag::Link { link_type, .. } if is_reference(*link_type) => NodeKind::LinkReference,
        Tag::Link { .. } => NodeKind::Link,
        Tag::Image { link_type, .. } if is_reference(*link_type) => NodeKind::ImageReference,
        Tag::Image { .. } => NodeKind::Image,
        Tag::MetadataBlock(MetadataBlockKind::YamlStyle) => NodeKind::Yaml,
        Tag::MetadataBlock(MetadataBlockKind::PlusesStyle) => NodeKind::Other("toml".to_string()),
        other => NodeKind::Other(variant_name(other)),
    }
}

/// A fence whose info string starts with `math` is display math; the rest of
/// the info string becomes its `meta`.
fn fenced_kind(info: &str) -> NodeKind {
    let info = info.trim();
    match info.strip_prefix("math") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            let meta = rest.trim();
            NodeKind::Math {
                meta: (!meta.is_empty()).then(|| meta.to_string()),
            }
        }
        _ => NodeKind::Code,
    }
}

fn is_reference(link_type: LinkType) -> bool {
    matches!(
        link_type,
        LinkType::Reference
            | LinkType::ReferenceUnknown
            | LinkType::Collapsed
            | LinkType::CollapsedUnknown
            | LinkType::Shortcut
            | LinkType::ShortcutUnknown
    )
}

/// `DefinitionListTitle` -> `definitionListTitle`
fn variant_name(tag: &Tag<'_>) -> String {
    let debug = format!("{tag:?}");
    let name: String = debug.chars().take_while(char::is_ascii_alphanumeric).collect();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => "unknown".to_string(),
    }
}
