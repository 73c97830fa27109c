//! # Snapshot Testing Support
//!
//! Utilities for asserting on overlay output.
//!
//! ## Modules
//!
//! - **`normalize`**: Flattens an `OutputTree` into a stable, serializable
//!   `Snap` of blocks and lines
//! - **`invariants`**: Runtime checks of the overlay contract (block shape,
//!   line markers, exact text reconstruction)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{BlockSnap, LineSnap, Snap, normalize};
