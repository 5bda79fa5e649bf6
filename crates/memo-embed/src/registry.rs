//! Handler-binding registry for image containers.
//!
//! Containers need their resize handlers attached exactly once, and the
//! document mutates underneath us: rewrites replace nodes, pastes add
//! them. Instead of stashing a bound-flag on nodes, the registry maps
//! stable node identity to bound state; a rebind scan touches only
//! containers it has not seen. Scans are idempotent, so a scan racing a
//! reentrant mutation only costs a second harmless pass.

use std::collections::HashMap;

use memo_editor_core::{DocNode, MarkupNode, NodeId, NodeKind};

use crate::resize::ResizeMachine;

#[derive(Debug, Default)]
pub struct BindingRegistry {
    bound: HashMap<NodeId, ResizeMachine>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, id: NodeId) -> bool {
        self.bound.contains_key(&id)
    }

    /// Resize machine for a bound container.
    pub fn machine(&mut self, id: NodeId) -> Option<&mut ResizeMachine> {
        self.bound.get_mut(&id)
    }

    /// Walk the tree and bind every image container not yet bound.
    /// Returns the newly bound ids, for logging and tests.
    pub fn scan(&mut self, nodes: &[MarkupNode], min_width: f64) -> Vec<NodeId> {
        let mut newly_bound = Vec::new();
        self.scan_nodes(nodes, min_width, &mut newly_bound);
        if !newly_bound.is_empty() {
            tracing::debug!(
                target: "memo::embed",
                count = newly_bound.len(),
                "bound resize handlers"
            );
        }
        newly_bound
    }

    fn scan_nodes(&mut self, nodes: &[MarkupNode], min_width: f64, out: &mut Vec<NodeId>) {
        for node in nodes {
            if node.kind() == NodeKind::ImageContainer {
                if let Some(id) = node.id() {
                    self.bound.entry(id).or_insert_with(|| {
                        out.push(id);
                        ResizeMachine::new(min_width)
                    });
                }
                // Container internals are opaque; nothing to scan inside.
                continue;
            }
            self.scan_nodes(node.children(), min_width, out);
        }
    }

    /// Drop registrations for containers no longer present in the tree.
    pub fn prune(&mut self, nodes: &[MarkupNode]) {
        let mut present = Vec::new();
        collect_container_ids(nodes, &mut present);
        self.bound.retain(|id, _| present.contains(id));
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }
}

fn collect_container_ids(nodes: &[MarkupNode], out: &mut Vec<NodeId>) {
    for node in nodes {
        if node.kind() == NodeKind::ImageContainer {
            if let Some(id) = node.id() {
                out.push(id);
            }
            continue;
        }
        collect_container_ids(node.children(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = r#"<div class="image-container"><img src="a"></div>"#;

    #[test]
    fn test_scan_binds_each_container_once() {
        let tree = vec![
            MarkupNode::text("x"),
            MarkupNode::image_container(CONTAINER),
            MarkupNode::image_container(CONTAINER),
        ];
        let mut registry = BindingRegistry::new();
        let bound = registry.scan(&tree, 50.0);
        assert_eq!(bound.len(), 2);

        // Rescan after a "mutation burst": nothing new to bind.
        let bound_again = registry.scan(&tree, 50.0);
        assert!(bound_again.is_empty());
        assert_eq!(registry.bound_count(), 2);
    }

    #[test]
    fn test_scan_picks_up_added_containers_only() {
        let mut tree = vec![MarkupNode::image_container(CONTAINER)];
        let mut registry = BindingRegistry::new();
        registry.scan(&tree, 50.0);

        tree.push(MarkupNode::image_container(CONTAINER));
        let bound = registry.scan(&tree, 50.0);
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0], tree[1].id().unwrap());
    }

    #[test]
    fn test_scan_descends_into_blocks() {
        let tree = vec![MarkupNode::block(vec![MarkupNode::image_container(
            CONTAINER,
        )])];
        let mut registry = BindingRegistry::new();
        assert_eq!(registry.scan(&tree, 50.0).len(), 1);
    }

    #[test]
    fn test_prune_drops_removed_containers() {
        let tree = vec![
            MarkupNode::image_container(CONTAINER),
            MarkupNode::image_container(CONTAINER),
        ];
        let mut registry = BindingRegistry::new();
        registry.scan(&tree, 50.0);

        let shrunk = vec![tree[0].clone()];
        registry.prune(&shrunk);
        assert_eq!(registry.bound_count(), 1);
        assert!(registry.is_bound(shrunk[0].id().unwrap()));
    }

    #[test]
    fn test_machine_state_survives_rescans() {
        let tree = vec![MarkupNode::image_container(CONTAINER)];
        let id = tree[0].id().unwrap();
        let mut registry = BindingRegistry::new();
        registry.scan(&tree, 50.0);

        registry.machine(id).unwrap().pointer_down(10.0, 100.0);
        registry.scan(&tree, 50.0);
        assert!(registry.machine(id).unwrap().is_resizing());
    }
}
