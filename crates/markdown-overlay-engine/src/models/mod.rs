pub mod node;
pub mod source;
pub mod span;

pub use node::{NodeKind, ParsedNode};
pub use source::SourceText;
pub use span::Span;
