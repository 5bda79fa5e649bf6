//! Bare-URL anchoring over note text.
//!
//! `linkify` turns the canonical flat text into display HTML: lines joined
//! with `<br>`, everything HTML-escaped, bare URLs wrapped in anchors, and
//! embedded image fragments carried through untouched behind placeholder
//! tokens.

use std::sync::LazyLock;

use regex::Regex;

use crate::placeholder::{TOKEN_CLOSE, TOKEN_OPEN, protect, restore};

/// Greedy whitespace-delimited URL match. Trailing punctuation is part of
/// the match: `http://x.com.` links the final dot too.
pub(crate) static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://[^\s]+|www\.[^\s]+)").expect("url regex"));

/// A line that is exactly one placeholder token (modulo surrounding
/// whitespace): an image occupying its own line.
pub(crate) static TOKEN_ONLY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{TOKEN_OPEN}IMG_[0-9]+{TOKEN_CLOSE}$")).expect("token line regex")
});

/// A token whose literal angle-bracket wrapping got escaped. The sentinels
/// themselves survive escaping; only the brackets around a `<token>`
/// spelling need recovering.
static MANGLED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "&lt;{TOKEN_OPEN}IMG_([0-9]+){TOKEN_CLOSE}&gt;"
    ))
    .expect("mangled token regex")
});

/// Convert note text to display HTML.
///
/// Image fragments are protected first so escaping and URL scanning can
/// never corrupt them; they are restored verbatim at the end. Empty input
/// produces empty output with no dangling `<br>`.
pub fn linkify(text: &str) -> String {
    let protected = protect(text);

    let html: Vec<String> = protected
        .text
        .split('\n')
        .map(process_line)
        .collect();

    restore(&html.join("<br>"), &protected.fragments)
}

fn process_line(line: &str) -> String {
    // An image on its own line passes through unescaped and unscanned.
    if TOKEN_ONLY_LINE.is_match(line.trim()) {
        return line.to_owned();
    }

    let escaped = escape_html(line);
    let recovered = MANGLED_TOKEN.replace_all(&escaped, |caps: &regex::Captures<'_>| {
        format!("{TOKEN_OPEN}IMG_{}{TOKEN_CLOSE}", &caps[1])
    });

    URL.replace_all(&recovered, |caps: &regex::Captures<'_>| {
        let url = &caps[0];
        let href = if url.starts_with("www.") {
            format!("https://{url}")
        } else {
            url.to_owned()
        };
        format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{url}</a>"#)
    })
    .into_owned()
}

/// Escape the five reserved HTML characters. Ampersand goes first so the
/// other replacements are not double-escaped.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
