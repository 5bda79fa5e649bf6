//! memo-editor-core: pure content-model logic for the note surface.
//!
//! This crate provides:
//! - `DocNode` trait and the `MarkupNode` tree - a closed node-kind model
//!   standing in for the live platform tree
//! - `protect`/`restore` - placeholder protection for embedded image markup
//! - `linkify` - bare-URL anchoring over protected plain text
//! - `extract` - the canonical flat-text form of a rendered tree
//! - `render` - the tree a linkified note displays as
//! - `capture_offset`/`restore_offset` - caret preservation across rewrites
//!
//! Everything here is platform-free and synchronous; the surface crate
//! drives it from whatever event loop hosts the editable region.

pub mod cursor;
pub mod extract;
pub mod linkify;
pub mod node;
pub mod placeholder;
pub mod render;

pub use cursor::{Caret, capture_offset, restore_offset};
pub use extract::extract;
pub use linkify::linkify;
pub use node::{DocNode, MarkupNode, NodeId, NodeKind};
pub use placeholder::{ProtectedText, protect, restore, token};
pub use render::render;
