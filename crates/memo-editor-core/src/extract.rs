//! Plain-text extraction: the inverse of rendering.
//!
//! Walks the rendered tree and produces the canonical flat note text,
//! preserving embedded image markup verbatim and converting block/line
//! structure to newlines.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{DocNode, NodeKind};

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline collapse regex"));

/// Extract the canonical note text from the editable surface's children.
///
/// Every image fragment in the tree appears exactly once in the output, in
/// document order, interleaved with the surrounding text. Runs of three or
/// more newlines collapse to two; leading and trailing newlines are
/// stripped.
pub fn extract<N: DocNode>(nodes: &[N]) -> String {
    let mut out = String::new();
    for node in nodes {
        extract_node(node, &mut out);
    }
    normalize_newlines(&out)
}

fn extract_node<N: DocNode>(node: &N, out: &mut String) {
    match node.kind() {
        NodeKind::Text => out.push_str(node.text_content()),
        NodeKind::ImageContainer => {
            // Verbatim markup, selected state stripped, own line. The
            // container's children are opaque - no recursion.
            out.push_str(&node.outer_markup());
            out.push('\n');
        }
        NodeKind::StandaloneImage => out.push_str(&node.outer_markup()),
        NodeKind::LineBreak => out.push('\n'),
        NodeKind::BlockContainer => {
            let mut inner = String::new();
            for child in node.children() {
                extract_node(child, &mut inner);
            }
            if !inner.is_empty() {
                inner.push('\n');
            }
            out.push_str(&inner);
        }
        NodeKind::Inline => {
            // Transparent: the element's own markup is discarded, children
            // extract by the ordinary rules.
            for child in node.children() {
                extract_node(child, out);
            }
        }
    }
}

fn normalize_newlines(text: &str) -> String {
    let collapsed = EXCESS_NEWLINES.replace_all(text, "\n\n");
    collapsed.trim_matches('\n').to_owned()
}
