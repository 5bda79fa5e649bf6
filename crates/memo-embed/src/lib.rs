//! memo-embed: resizable-image embedding for the note surface.
//!
//! Turns pasted or dropped image payloads into normalized, size-bounded
//! embedded images wrapped in a resize container, and owns the two pieces
//! of state the container needs as the document mutates: the pointer-drag
//! resize machine and the handler-binding registry.

pub mod container;
pub mod ingest;
pub mod registry;
pub mod resize;

pub use container::ImageBlock;
pub use ingest::{IngestSource, ingest};
pub use registry::BindingRegistry;
pub use resize::{ResizeEnded, ResizeMachine, ResizeState};
