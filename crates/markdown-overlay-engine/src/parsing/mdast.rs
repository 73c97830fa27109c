//! Reader for mdast trees serialized as JSON.
//!
//! Accepts the shape remark and its relatives produce: `type`, optional
//! `depth` and `meta`, `children`, and positions either as
//! `position.start.offset`/`position.end.offset` or a compact
//! `range: [start, end]`. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NodeKind, ParsedNode, SourceText, Span};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid mdast JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Offset {offset} is outside the source ({units} units)")]
    OffsetOutOfBounds { offset: usize, units: usize },
}

/// Unit the offsets of a serialized tree are counted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    /// Bytes of UTF-8, the engine's own unit.
    #[default]
    Utf8,
    /// UTF-16 code units, as produced by JavaScript parsers.
    Utf16,
    /// Unicode scalar values.
    Chars,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    depth: Option<u8>,
    meta: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
    position: Option<RawPosition>,
    range: Option<[usize; 2]>,
}

#[derive(Deserialize)]
struct RawPosition {
    start: RawPoint,
    end: RawPoint,
}

#[derive(Deserialize)]
struct RawPoint {
    offset: Option<usize>,
}

/// Parses `json` into a tree with byte spans into `source`.
pub fn from_json(
    json: &str,
    source: &SourceText,
    encoding: OffsetEncoding,
) -> Result<ParsedNode, ParseError> {
    let raw: RawNode = serde_json::from_str(json)?;
    let text = source.to_string();
    let offsets = OffsetMap::new(&text, encoding);
    convert(raw, &offsets)
}

fn convert(raw: RawNode, offsets: &OffsetMap) -> Result<ParsedNode, ParseError> {
    let kind = match NodeKind::from_name(&raw.kind) {
        NodeKind::Heading { .. } => NodeKind::Heading {
            depth: raw.depth.unwrap_or(1),
        },
        NodeKind::Math { .. } => NodeKind::Math { meta: raw.meta },
        kind => kind,
    };

    let range = match (raw.range, raw.position) {
        (Some([start, end]), _) => Some((start, end)),
        (None, Some(pos)) => pos.start.offset.zip(pos.end.offset),
        (None, None) => None,
    };
    let span = match range {
        Some((start, end)) => Some(Span::new(offsets.to_byte(start)?, offsets.to_byte(end)?)),
        None => None,
    };

    let children = raw
        .children
        .into_iter()
        .map(|child| convert(child, offsets))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedNode {
        kind,
        span,
        children,
    })
}

/// Byte offset of every unit boundary of the text.
enum OffsetMap {
    Bytes(usize),
    Table(Vec<usize>),
}

impl OffsetMap {
    fn new(text: &str, encoding: OffsetEncoding) -> Self {
        let width: fn(char) -> usize = match encoding {
            OffsetEncoding::Utf8 => return Self::Bytes(text.len()),
            OffsetEncoding::Utf16 => char::len_utf16,
            OffsetEncoding::Chars => |_| 1,
        };
        let mut table = Vec::with_capacity(text.len() + 1);
        for (byte, ch) in text.char_indices() {
            // The second half of a surrogate pair maps to the start of its char.
            for _ in 0..width(ch) {
                table.push(byte);
            }
        }
        table.push(text.len());
        Self::Table(table)
    }

    fn to_byte(&self, offset: usize) -> Result<usize, ParseError> {
        match self {
            Self::Bytes(len) if offset <= *len => Ok(offset),
            Self::Bytes(len) => Err(ParseError::OffsetOutOfBounds {
                offset,
                units: *len,
            }),
            Self::Table(table) => {
                table
                    .get(offset)
                    .copied()
                    .ok_or(ParseError::OffsetOutOfBounds {
                        offset,
                        units: table.len().saturating_sub(1),
                    })
            }
        }
    }
}
