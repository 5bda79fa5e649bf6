//! Placeholder protection for embedded image markup.
//!
//! Pattern-based text transforms (escaping, URL anchoring) must never see
//! the serialized image fragments mixed into note text. `protect` swaps
//! each fragment for a short sentinel-bracketed token, `restore` swaps them
//! back. Tokens use private-use code points that cannot occur in ordinary
//! note text, so the transforms in between can treat them as opaque
//! characters.

use std::sync::LazyLock;

use regex::Regex;
use smol_str::{SmolStr, format_smolstr};

/// Opening sentinel of a placeholder token.
pub const TOKEN_OPEN: char = '\u{FFF0}';
/// Closing sentinel of a placeholder token.
pub const TOKEN_CLOSE: char = '\u{FFF1}';

/// Opening tag of an image container. The close is found by depth
/// balancing, not by regex - containers nest generic elements.
static CONTAINER_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*class="[^"]*image-container[^"]*"[^>]*>"#)
        .expect("container open regex")
});

/// Standalone image tag, matched only after containers were consumed.
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]*>").expect("img tag regex"));

pub(crate) static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{TOKEN_OPEN}IMG_([0-9]+){TOKEN_CLOSE}")).expect("token regex")
});

/// Build the token for one fragment index.
pub fn token(index: usize) -> SmolStr {
    format_smolstr!("{TOKEN_OPEN}IMG_{index}{TOKEN_CLOSE}")
}

/// Text with its image fragments swapped out for tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    pub text: String,
    /// Fragment recorded at each token's index, in document order.
    pub fragments: Vec<String>,
}

/// Replace every well-formed image fragment with a placeholder token.
///
/// Containers are matched first (their inner `<img>` must not match as a
/// standalone image), then remaining bare image tags. Indices are dense,
/// zero-based, and each token restores exactly its own fragment. Malformed
/// (unbalanced) container markup is left in place untouched; the linkifier
/// downstream tolerates it as ordinary text.
pub fn protect(text: &str) -> ProtectedText {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut scan_from = 0;
    while let Some(m) = CONTAINER_OPEN.find_at(text, scan_from) {
        match find_balanced_close(text, m.end()) {
            Some(end) => {
                spans.push((m.start(), end));
                scan_from = end;
            }
            None => {
                // Unbalanced: leave it, keep scanning past the open tag.
                tracing::trace!(
                    target: "memo::placeholder",
                    at = m.start(),
                    "unbalanced image container left unprotected"
                );
                scan_from = m.end();
            }
        }
    }

    let mut fragments: Vec<String> = spans
        .iter()
        .map(|&(start, end)| text[start..end].to_owned())
        .collect();

    // Replace rightmost-first so earlier span offsets stay valid; the
    // index each token carries was already fixed in document order.
    let mut protected = text.to_owned();
    for (index, &(start, end)) in spans.iter().enumerate().rev() {
        protected.replace_range(start..end, &token(index));
    }

    // Remaining standalone image tags get the next indices, left to right.
    let protected = IMG_TAG
        .replace_all(&protected, |caps: &regex::Captures<'_>| {
            let index = fragments.len();
            fragments.push(caps[0].to_owned());
            token(index).to_string()
        })
        .into_owned();

    ProtectedText {
        text: protected,
        fragments,
    }
}

/// Substitute every token back to its recorded fragment.
///
/// Unknown indices restore to the empty string; this never fails.
pub fn restore(text: &str, fragments: &[String]) -> String {
    TOKEN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let index: usize = caps[1].parse().unwrap_or(usize::MAX);
            fragments.get(index).map(String::as_str).unwrap_or("")
        })
        .into_owned()
}

/// Find the end (exclusive) of the `</div>` matching an open tag that ends
/// at `from`, balancing nested generic containers inside.
fn find_balanced_close(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut pos = from;
    while depth > 0 && pos < bytes.len() {
        if matches_open_div(bytes, pos) {
            depth += 1;
        } else if bytes[pos..].starts_with(b"</div>") {
            depth -= 1;
            if depth == 0 {
                return Some(pos + "</div>".len());
            }
        }
        pos += 1;
    }
    None
}

fn matches_open_div(bytes: &[u8], pos: usize) -> bool {
    if !bytes[pos..].starts_with(b"<div") {
        return false;
    }
    matches!(bytes.get(pos + 4), Some(b' ' | b'\t' | b'\n' | b'>'))
}
