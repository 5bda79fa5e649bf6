//! Surface configuration.
//!
//! All tunables live in one struct that is loaded once at startup and
//! threaded into whichever component needs it. There are no module-level
//! caches or process-wide singletons.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Longest edge an embedded image may keep after normalization, in px.
    pub max_image_dimension: u32,
    /// JPEG re-encode quality for JPEG-like inputs (0-100).
    pub jpeg_quality: u8,
    /// Original-size limit for clipboard-pasted images, in bytes.
    pub paste_limit_bytes: usize,
    /// Original-size limit for dropped images, in bytes.
    pub drop_limit_bytes: usize,
    /// Narrowest width an image may be resized to, in px.
    pub min_image_width: u32,
    /// Quiet period before extracted text is persisted.
    pub save_debounce: Duration,
    /// Quiet period before the linkify rewrite runs.
    pub linkify_debounce: Duration,
    /// Quiet period before a handler-rebind scan runs.
    pub rebind_debounce: Duration,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 1600,
            jpeg_quality: 85,
            paste_limit_bytes: 5 * 1024 * 1024,
            drop_limit_bytes: 10 * 1024 * 1024,
            min_image_width: 50,
            save_debounce: Duration::from_millis(500),
            linkify_debounce: Duration::from_millis(2000),
            rebind_debounce: Duration::from_millis(200),
        }
    }
}
