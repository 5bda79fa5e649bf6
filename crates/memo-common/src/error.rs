//! Error types for the memo surface.
//!
//! The taxonomy follows the failure policy of the surface: persistence and
//! preview failures are recoverable and stay silent to the user (logged,
//! operation abandoned), embed failures are recoverable but user-visible,
//! and nothing in this workspace is fatal.

use miette::Diagnostic;

/// Main error type for memo operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum MemoError {
    /// Persistence collaborator failure (load/save/history).
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// Image ingestion failure.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    /// Preview surface failure.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Preview(#[from] PreviewError),
}

/// Errors from the persistence collaborator.
///
/// These never reach the user: the surface logs them and carries on with
/// stale state.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum StoreError {
    /// Could not read the stored note.
    #[error("failed to load note: {0}")]
    Load(String),

    /// Could not write the note.
    #[error("failed to save note: {0}")]
    Save(String),

    /// Could not append a history revision.
    #[error("failed to save note to history: {0}")]
    History(String),
}

/// Errors from image ingestion.
///
/// `TooLarge` and `Decode` are surfaced to the user as a blocking notice;
/// the operation aborts with nothing inserted.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EmbedError {
    /// Original file exceeds the limit for its ingestion source.
    #[error("image is {actual_bytes} bytes, over the {limit_bytes} byte limit")]
    TooLarge {
        actual_bytes: usize,
        limit_bytes: usize,
    },

    /// The bytes did not decode as an image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding the normalized image failed.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// The payload's MIME type is not an image type.
    #[error("not an image: {0}")]
    NotAnImage(String),
}

/// Errors from the full-screen preview surface.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum PreviewError {
    /// The preview surface could not be created.
    #[error("failed to open preview surface: {0}")]
    Open(String),

    /// Transmitting the image payload failed.
    #[error("failed to send preview payload: {0}")]
    Send(String),
}
