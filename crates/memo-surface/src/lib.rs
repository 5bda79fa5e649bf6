//! memo-surface: the editable-surface orchestrator.
//!
//! Owns the rendered tree, the caret, image selection, and the three
//! debounce timers that serialize input bursts (save, linkify, rebind).
//! Everything is single-threaded and cooperative: the host event loop
//! forwards platform events into `EditorSession` and pumps `tick` with the
//! current time; the session talks to the persistence and preview
//! collaborators through the ports in `memo-common`.

pub mod debounce;
pub mod events;
pub mod session;

pub use debounce::Debounce;
pub use events::{ChangeKind, FilePayload, Notice};
pub use session::EditorSession;
