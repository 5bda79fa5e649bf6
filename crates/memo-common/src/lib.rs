//! memo-common: shared types for the memo note surface.
//!
//! This crate holds what every other memo crate needs: the error taxonomy,
//! the collaborator ports (persistence and the preview surface), the
//! persisted record type, and the surface configuration. Implementations of
//! the ports live outside this workspace; the core only consumes them as
//! simple request/response operations.

pub mod config;
pub mod error;
pub mod ports;
pub mod record;

pub use config::SurfaceConfig;
pub use error::{EmbedError, MemoError, PreviewError, StoreError};
pub use ports::{NoteStore, PreviewPort};
pub use record::MemoEntry;
