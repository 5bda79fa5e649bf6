//! Event and payload types crossing the surface boundary.

/// What kind of content change a notification reports. Resize and deletion
/// are content changes the save path must see, but they are not text edits
/// and the linkify path must skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Ordinary typing or platform-driven text mutation.
    TextEdit,
    /// An image container was inserted (paste/drop).
    ImageInserted,
    /// An image finished a resize drag.
    ImageResized,
    /// A selected image container was deleted.
    ImageDeleted,
}

impl ChangeKind {
    /// Whether the linkify path runs for this change.
    pub fn linkifies(self) -> bool {
        match self {
            ChangeKind::TextEdit | ChangeKind::ImageInserted => true,
            ChangeKind::ImageResized | ChangeKind::ImageDeleted => false,
        }
    }

    /// Whether this change can add nodes and therefore needs a rebind
    /// scan.
    pub fn adds_nodes(self) -> bool {
        matches!(self, ChangeKind::TextEdit | ChangeKind::ImageInserted)
    }
}

/// A file-like item from the clipboard or a drag-drop payload: MIME type,
/// plus the bytes (whose length is the size the limits apply to).
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// A blocking, user-visible warning. The session reports these to the
/// caller; how they are displayed is the host's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Original file size exceeded the paste/drop limit.
    ImageTooLarge { actual_bytes: usize, limit_bytes: usize },
    /// The payload could not be decoded or re-encoded as an image.
    ImageIngestFailed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::ImageTooLarge { limit_bytes, .. } => {
                write!(f, "image is over the {} MB limit", limit_bytes / (1024 * 1024))
            }
            Notice::ImageIngestFailed(reason) => write!(f, "image could not be used: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_routing() {
        assert!(ChangeKind::TextEdit.linkifies());
        assert!(ChangeKind::ImageInserted.linkifies());
        assert!(!ChangeKind::ImageResized.linkifies());
        assert!(!ChangeKind::ImageDeleted.linkifies());
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::ImageTooLarge {
            actual_bytes: 6 * 1024 * 1024,
            limit_bytes: 5 * 1024 * 1024,
        };
        assert_eq!(notice.to_string(), "image is over the 5 MB limit");
    }
}
