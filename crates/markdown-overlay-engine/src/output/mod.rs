//! # Output Tree
//!
//! The element surface the overlay builder writes to, and the in-memory
//! arena that implements it.
//!
//! ## Modules
//!
//! - **`factory`**: `NodeFactory` trait and `Tag`
//! - **`tree`**: `OutputTree` arena addressed by `NodeId`
//! - **`classes`**: class-name prefix, fixed classes, boundary marker
//! - **`html`**, **`view`**, **`dump`**: HTML, serde and debug renderings

pub mod classes;
pub mod dump;
pub mod factory;
pub mod html;
pub mod tree;
pub mod view;

pub use classes::{BOUNDARY_MARKER, CLASS_PREFIX};
pub use dump::dump;
pub use factory::{NodeFactory, Tag};
pub use html::to_html;
pub use tree::{Element, NodeId, OutputNode, OutputTree};
pub use view::{ChildView, ElementView, to_view};
