pub mod display;
pub mod io;
pub mod models;
pub mod output;
pub mod overlay;
pub mod parsing;
pub mod snapshot;

// Re-export key types for easier usage
pub use io::*;
pub use models::{NodeKind, ParsedNode, SourceText, Span};
pub use output::{NodeFactory, OutputTree, Tag, dump, to_html, to_view};
pub use overlay::{build_overlay, render_overlay};
pub use parsing::{OffsetEncoding, ParseError, ParseOptions, parse_markdown};
