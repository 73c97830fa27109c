use std::borrow::Cow;
use std::fmt;

use xi_rope::Rope;

use super::span::Span;

/// The immutable text a parsed tree was produced from.
///
/// Backed by an `xi_rope::Rope` so hosts that already keep their buffer in a
/// rope can hand it over without copying. All reads go through [`slice`],
/// which never panics: out-of-range, inverted and mid-codepoint requests
/// come back empty.
///
/// [`slice`]: SourceText::slice
#[derive(Clone)]
pub struct SourceText {
    rope: Rope,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
        }
    }

    pub fn from_rope(rope: Rope) -> Self {
        Self { rope }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    /// Extracts `[start, end)`, clamped to the document bounds.
    pub fn slice(&self, start: usize, end: usize) -> Cow<'_, str> {
        let len = self.rope.len();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end
            || !self.rope.is_codepoint_boundary(start)
            || !self.rope.is_codepoint_boundary(end)
        {
            return Cow::Borrowed("");
        }
        self.rope.slice_to_cow(start..end)
    }

    pub fn slice_span(&self, span: Span) -> Cow<'_, str> {
        self.slice(span.start, span.end)
    }

    /// Offset of the first `\n` at or after `offset`, or the document length
    /// when the rest of the text has no line break.
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.rope.len();
        let offset = offset.min(len);
        let next_line = self.rope.offset_of_line(self.rope.line_of_offset(offset) + 1);
        if next_line > offset && self.slice(next_line - 1, next_line) == "\n" {
            next_line - 1
        } else {
            len
        }
    }

    /// Zero-based line number and byte column of `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        (line, offset - self.rope.offset_of_line(line))
    }
}

impl Default for SourceText {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("len", &self.len())
            .finish()
    }
}
