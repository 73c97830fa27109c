//! # Parser Adapters
//!
//! The overlay consumes a parsed tree it does not produce. This module
//! provides the two ways the engine obtains one.
//!
//! ## Modules
//!
//! - **`markdown`**: Parses CommonMark (plus GFM extensions and math) with
//!   `pulldown-cmark` into an mdast-shaped [`ParsedNode`] tree
//! - **`mdast`**: Reads a tree serialized by a remark-style parser, converting
//!   its offsets to UTF-8 byte offsets
//!
//! [`ParsedNode`]: crate::models::ParsedNode

mod markdown;
pub mod mdast;

pub use markdown::{ParseOptions, parse_markdown};
pub use mdast::{OffsetEncoding, ParseError};
