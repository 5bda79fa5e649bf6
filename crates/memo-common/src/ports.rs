//! Collaborator ports consumed by the surface.
//!
//! The surface treats persistence and the full-screen preview as opaque,
//! reliable request/response services. Failures are recoverable: the caller
//! logs them and degrades to "no visible change".

use crate::error::{PreviewError, StoreError};

/// Persistence collaborator for note text.
///
/// The surface calls `save_note_to_history` when the extracted text is
/// non-empty after trimming, `save_note` otherwise.
pub trait NoteStore {
    /// Fetch the persisted note text.
    fn load_note(&mut self) -> Result<String, StoreError>;

    /// Overwrite the persisted note text.
    fn save_note(&mut self, text: &str) -> Result<(), StoreError>;

    /// Persist a revision into the history listing.
    fn save_note_to_history(&mut self, text: &str) -> Result<(), StoreError>;
}

/// Full-screen image preview collaborator.
///
/// `open` starts surface creation; the payload must not be transmitted
/// until the surface has acknowledged readiness, so `show` is only called
/// by the session after it observes that acknowledgement.
pub trait PreviewPort {
    /// Begin creating the preview surface.
    fn open(&mut self) -> Result<(), PreviewError>;

    /// Transmit the image payload to a surface that reported ready.
    fn show(&mut self, payload: &str) -> Result<(), PreviewError>;
}
