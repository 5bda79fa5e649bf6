//! Persisted record types.

use serde::{Deserialize, Serialize};

/// One saved note revision, as stored by the persistence collaborator and
/// consumed by the history/archive/trash listings.
///
/// The surface only produces and consumes `content`; storage and lifecycle
/// of the record itself belong to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoEntry {
    pub id: u64,
    /// Canonical note text: plain characters, newline separators, and zero
    /// or more verbatim image-container fragments.
    pub content: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}
