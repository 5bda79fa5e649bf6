//! Caret preservation across content rewrites.
//!
//! Before the linkify path replaces the surface's tree, the caret position
//! is flattened to a character offset - the count of text-node characters
//! preceding it in document order. After the rewrite the offset is walked
//! back into the new tree. Image and line-break nodes contribute nothing
//! to the count; they only shape the walk.

use crate::node::{DocNode, NodeKind};

/// Address of the caret inside the tree: the child-index path to a node,
/// plus an offset. For text nodes the offset counts characters; for
/// element nodes it counts children preceding the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Caret {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Flatten a caret to its character offset from the start of the surface.
///
/// No caret (or a caret addressing a node that no longer exists) is
/// treated as offset 0 - a defensive no-op, never an error.
pub fn capture_offset<N: DocNode>(nodes: &[N], caret: Option<&Caret>) -> usize {
    let Some(caret) = caret else {
        return 0;
    };

    let mut acc = 0;
    let mut path = Vec::new();
    if capture_walk(nodes, caret, &mut path, &mut acc) {
        acc
    } else {
        tracing::trace!(target: "memo::cursor", ?caret, "caret path not found, capturing 0");
        0
    }
}

fn capture_walk<N: DocNode>(
    nodes: &[N],
    caret: &Caret,
    path: &mut Vec<usize>,
    acc: &mut usize,
) -> bool {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        let here = *path == caret.path;
        let found = match node.kind() {
            NodeKind::Text => {
                let len = node.text_content().chars().count();
                if here {
                    *acc += caret.offset.min(len);
                } else {
                    *acc += len;
                }
                here
            }
            _ => {
                if here {
                    // Element caret: count the text of the children the
                    // caret sits after.
                    for child in node.children().iter().take(caret.offset) {
                        *acc += subtree_text_len(child);
                    }
                    true
                } else {
                    capture_walk(node.children(), caret, path, acc)
                }
            }
        };
        path.pop();
        if found {
            return true;
        }
    }
    false
}

fn subtree_text_len<N: DocNode>(node: &N) -> usize {
    match node.kind() {
        NodeKind::Text => node.text_content().chars().count(),
        _ => node.children().iter().map(subtree_text_len).sum(),
    }
}

/// Walk a character offset back into a (possibly rewritten) tree.
///
/// Depth-first over text nodes, accumulating lengths; the first text node
/// whose cumulative length reaches the target wins, and the walk aborts
/// immediately. Returns `None` when the tree's flattened text is shorter
/// than the offset - placement silently fails and the caller leaves the
/// caret wherever the platform defaults it.
pub fn restore_offset<N: DocNode>(nodes: &[N], offset: usize) -> Option<Caret> {
    let mut acc = 0;
    let mut path = Vec::new();
    let placed = restore_walk(nodes, offset, &mut path, &mut acc);
    if placed.is_none() {
        tracing::trace!(
            target: "memo::cursor",
            offset,
            text_len = acc,
            "tree too short for caret offset, leaving caret unplaced"
        );
    }
    placed
}

fn restore_walk<N: DocNode>(
    nodes: &[N],
    offset: usize,
    path: &mut Vec<usize>,
    acc: &mut usize,
) -> Option<Caret> {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        if node.kind() == NodeKind::Text {
            let len = node.text_content().chars().count();
            if *acc + len >= offset {
                let caret = Caret::new(path.clone(), offset - *acc);
                path.pop();
                return Some(caret);
            }
            *acc += len;
        } else if let Some(caret) = restore_walk(node.children(), offset, path, acc) {
            path.pop();
            return Some(caret);
        }
        path.pop();
    }
    None
}
