//! Rendering note text into the tree the surface displays.
//!
//! `render` is the structural counterpart of `linkify`: where `linkify`
//! emits the display HTML string, `render` builds the tree that HTML parses
//! into - text runs, anchors around URL matches, `LineBreak` nodes between
//! lines, and image nodes for the protected fragments. The linkify path
//! rewrites the surface with this tree, and `extract` walks it back to
//! note text.

use crate::linkify::{TOKEN_ONLY_LINE, URL};
use crate::node::MarkupNode;
use crate::placeholder::{TOKEN, protect};

/// Build the display tree for the given note text.
pub fn render(text: &str) -> Vec<MarkupNode> {
    let protected = protect(text);

    let mut nodes = Vec::new();
    for (i, line) in protected.text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(MarkupNode::line_break());
        }
        if TOKEN_ONLY_LINE.is_match(line.trim()) {
            push_image_line(line, &protected.fragments, &mut nodes);
        } else {
            push_mixed_line(line, &protected.fragments, &mut nodes);
        }
    }
    nodes
}

/// A line that is exactly one token: the image node, with any surrounding
/// whitespace kept as text the way the platform parser would keep it.
fn push_image_line(line: &str, fragments: &[String], nodes: &mut Vec<MarkupNode>) {
    let trimmed = line.trim();
    let lead = &line[..line.len() - line.trim_start().len()];
    let trail = &line[line.trim_end().len()..];

    if !lead.is_empty() {
        nodes.push(MarkupNode::text(lead));
    }
    if let Some(node) = fragment_node(trimmed, fragments) {
        nodes.push(node);
    }
    if !trail.is_empty() {
        nodes.push(MarkupNode::text(trail));
    }
}

/// Ordinary line: text runs with URL matches wrapped in anchors, inline
/// tokens expanded to their image nodes.
fn push_mixed_line(line: &str, fragments: &[String], nodes: &mut Vec<MarkupNode>) {
    let mut rest = 0;
    for m in TOKEN.find_iter(line) {
        push_text_run(&line[rest..m.start()], nodes);
        if let Some(node) = fragment_node(m.as_str(), fragments) {
            nodes.push(node);
        }
        rest = m.end();
    }
    push_text_run(&line[rest..], nodes);
}

fn push_text_run(text: &str, nodes: &mut Vec<MarkupNode>) {
    if text.is_empty() {
        return;
    }
    let mut rest = 0;
    for m in URL.find_iter(text) {
        if m.start() > rest {
            nodes.push(MarkupNode::text(&text[rest..m.start()]));
        }
        nodes.push(MarkupNode::inline(vec![MarkupNode::text(m.as_str())]));
        rest = m.end();
    }
    if rest < text.len() {
        nodes.push(MarkupNode::text(&text[rest..]));
    }
}

/// Image node for one token, dispatched on the fragment's own shape.
fn fragment_node(token_text: &str, fragments: &[String]) -> Option<MarkupNode> {
    let caps = TOKEN.captures(token_text)?;
    let index: usize = caps[1].parse().ok()?;
    let fragment = fragments.get(index)?;
    let is_bare_img = fragment
        .trim_start()
        .get(..4)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("<img"));
    if is_bare_img {
        Some(MarkupNode::standalone_image(fragment.clone()))
    } else {
        Some(MarkupNode::image_container(fragment.clone()))
    }
}
