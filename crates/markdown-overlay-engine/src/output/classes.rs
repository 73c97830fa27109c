//! Class-name conventions of the overlay output.

use crate::models::NodeKind;

/// Shared by every class name the overlay emits.
pub const CLASS_PREFIX: &str = "md-";

/// Appended at the end of every finalized line as a caret anchor.
pub const BOUNDARY_MARKER: char = '\u{200B}';

pub const BLOCK_CLASS: &str = "md-block";
pub const DELIMITER_CLASS: &str = "md-delimiter";
pub const FIRST_CLASS: &str = "md-first";
pub const LAST_CLASS: &str = "md-last";
/// On a line whose source line continues on the next overlay line.
pub const JOINED_CLASS: &str = "md-joined";

/// Name of the attribute carrying a block's position among its siblings.
pub const INDEX_ATTRIBUTE: &str = "index";

/// `md-<type>`
pub fn class_name(kind: &NodeKind) -> String {
    format!("{CLASS_PREFIX}{}", kind.name())
}

/// `md-heading<depth>` for headings, nothing for other kinds.
pub fn depth_class(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Heading { depth } => Some(format!("{CLASS_PREFIX}heading{depth}")),
        _ => None,
    }
}
