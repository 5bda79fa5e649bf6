//! The editor session: one editable note surface and its collaborators.
//!
//! The host event loop feeds platform events in (change notifications,
//! paste/drop payloads, pointer events on image containers) and pumps
//! `tick` with the current time. The session routes changes through the
//! two debounced paths - a short one that persists extracted text, a long
//! one that linkifies and rewrites the tree while preserving the caret -
//! plus the rebind scan that keeps resize handlers attached as the tree
//! mutates.

use std::sync::LazyLock;

use regex::Regex;
use web_time::Instant;

use memo_common::{EmbedError, NoteStore, PreviewPort, SurfaceConfig};
use memo_editor_core::{
    Caret, DocNode, MarkupNode, NodeId, NodeKind, capture_offset, extract, linkify, render,
    restore_offset,
};
use memo_embed::{BindingRegistry, ImageBlock, IngestSource, ingest};

use crate::debounce::Debounce;
use crate::events::{ChangeKind, FilePayload, Notice};

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]*\bsrc="([^"]*)""#).expect("img src regex"));

pub struct EditorSession<S: NoteStore, P: PreviewPort> {
    store: S,
    preview: P,
    config: SurfaceConfig,

    tree: Vec<MarkupNode>,
    caret: Option<Caret>,
    selected: Option<NodeId>,
    registry: BindingRegistry,

    save: Debounce,
    link: Debounce,
    rebind: Debounce,

    /// Display HTML of the last linkify pass; the rewrite only happens
    /// when a new pass produces something different.
    display_html: String,
    /// Preview payload parked until the preview surface reports ready.
    pending_preview: Option<String>,
}

impl<S: NoteStore, P: PreviewPort> EditorSession<S, P> {
    pub fn new(store: S, preview: P, config: SurfaceConfig) -> Self {
        let save = Debounce::new(config.save_debounce);
        let link = Debounce::new(config.linkify_debounce);
        let rebind = Debounce::new(config.rebind_debounce);
        Self {
            store,
            preview,
            config,
            tree: Vec::new(),
            caret: None,
            selected: None,
            registry: BindingRegistry::new(),
            save,
            link,
            rebind,
            display_html: String::new(),
            pending_preview: None,
        }
    }

    /// Load the persisted note and render it. A failing load degrades to
    /// an empty surface; the failure is logged, not surfaced.
    pub fn load(&mut self) {
        let text = match self.store.load_note() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(target: "memo::surface", error = %e, "note load failed, starting empty");
                String::new()
            }
        };
        self.display_html = linkify(&text);
        self.tree = render(&text);
        self.caret = None;
        self.selected = None;
        self.registry.scan(&self.tree, self.min_width());
    }

    // --- change routing -------------------------------------------------

    /// A content change happened on the surface. Arms the save path
    /// always, the linkify path only for text edits, and the rebind path
    /// when nodes may have been added.
    pub fn notify_change(&mut self, kind: ChangeKind, now: Instant) {
        tracing::trace!(target: "memo::surface", ?kind, "change notification");
        self.save.arm(now);
        if kind.linkifies() {
            self.link.arm(now);
        }
        if kind.adds_nodes() {
            self.rebind.arm(now);
        }
    }

    /// Fire whichever debounced paths have reached their deadline.
    pub fn tick(&mut self, now: Instant) {
        if self.save.fire(now) {
            self.run_save();
        }
        if self.link.fire(now) {
            self.run_linkify(now);
        }
        if self.rebind.fire(now) {
            self.run_rebind();
        }
    }

    fn run_save(&mut self) {
        let text = extract(&self.tree);
        let result = if text.trim().is_empty() {
            self.store.save_note(&text)
        } else {
            self.store.save_note_to_history(&text)
        };
        if let Err(e) = result {
            // Fire-and-forget: the surface keeps its state, the user sees
            // nothing.
            tracing::warn!(target: "memo::surface", error = %e, "note save failed");
        }
    }

    fn run_linkify(&mut self, now: Instant) {
        let text = extract(&self.tree);
        let html = linkify(&text);
        if html == self.display_html {
            tracing::trace!(target: "memo::surface", "linkify pass produced no change");
            return;
        }

        let offset = capture_offset(&self.tree, self.caret.as_ref());
        self.tree = render(&text);
        self.caret = restore_offset(&self.tree, offset);
        self.display_html = html;
        // The rewrite replaced nodes wholesale; handlers need rebinding
        // once the burst settles.
        self.rebind.arm(now);
        tracing::debug!(target: "memo::surface", offset, "linkify rewrite applied");
    }

    fn run_rebind(&mut self) {
        self.registry.prune(&self.tree);
        self.registry.scan(&self.tree, self.min_width());
    }

    // --- paste / drop ---------------------------------------------------

    /// Clipboard paste: only the first image item is taken, and the paste
    /// size limit applies to its original byte length.
    pub fn paste(&mut self, items: &[FilePayload], now: Instant) -> Vec<Notice> {
        let Some(item) = items.iter().find(|i| i.is_image()) else {
            return Vec::new();
        };
        match ingest(&item.bytes, &item.mime, IngestSource::Paste, &self.config) {
            Ok(block) => {
                self.insert_image(block, now);
                Vec::new()
            }
            Err(e) => vec![notice_for(e)],
        }
    }

    /// Drag-drop: every image file is attempted; a failing file warns and
    /// the rest still insert.
    pub fn drop_files(&mut self, files: &[FilePayload], now: Instant) -> Vec<Notice> {
        let mut notices = Vec::new();
        for file in files.iter().filter(|f| f.is_image()) {
            match ingest(&file.bytes, &file.mime, IngestSource::Drop, &self.config) {
                Ok(block) => self.insert_image(block, now),
                Err(e) => notices.push(notice_for(e)),
            }
        }
        notices
    }

    /// Insert an image container at the caret and notify the change
    /// paths. With no caret the container goes at the end, as the
    /// platform surface does.
    pub fn insert_image(&mut self, block: ImageBlock, now: Instant) {
        let node = MarkupNode::image_container(block.into_markup());
        self.insert_node_at_caret(node);
        self.notify_change(ChangeKind::ImageInserted, now);
    }

    fn insert_node_at_caret(&mut self, node: MarkupNode) {
        let Some(caret) = self.caret.clone() else {
            self.tree.push(node);
            return;
        };
        let Some(&top) = caret.path.first() else {
            self.tree.push(node);
            self.caret = None;
            return;
        };
        if top >= self.tree.len() {
            self.tree.push(node);
            self.caret = None;
            return;
        }

        // Caret inside a top-level text node: split it around the
        // container.
        if caret.path.len() == 1 {
            if let MarkupNode::Text(_) = self.tree[top] {
                if let MarkupNode::Text(text) = self.tree.remove(top) {
                    let split = text
                        .char_indices()
                        .nth(caret.offset)
                        .map(|(b, _)| b)
                        .unwrap_or(text.len());
                    let (before, after) = text.split_at(split);
                    let mut at = top;
                    if !before.is_empty() {
                        self.tree.insert(at, MarkupNode::text(before));
                        at += 1;
                    }
                    self.tree.insert(at, node);
                    at += 1;
                    if after.is_empty() {
                        self.caret = None;
                    } else {
                        self.tree.insert(at, MarkupNode::text(after));
                        self.caret = Some(Caret::new(vec![at], 0));
                    }
                }
                return;
            }
        }

        // Nested or element caret: place the container after the caret's
        // top-level ancestor.
        let at = (top + 1).min(self.tree.len());
        self.tree.insert(at, node);
        self.caret = match self.tree.get(at + 1) {
            Some(MarkupNode::Text(_)) => Some(Caret::new(vec![at + 1], 0)),
            _ => None,
        };
    }

    // --- selection / deletion / resize ----------------------------------

    /// Single click: select the clicked container, clearing any previous
    /// selection; a click elsewhere clears it.
    pub fn click(&mut self, target: Option<NodeId>) {
        self.selected = target.filter(|&id| find_container(&self.tree, id));
    }

    /// Delete/Backspace with a selected container: remove it and notify
    /// the save path only.
    pub fn delete_selected(&mut self, now: Instant) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        if remove_by_id(&mut self.tree, id) {
            self.notify_change(ChangeKind::ImageDeleted, now);
            true
        } else {
            false
        }
    }

    pub fn resize_pointer_down(&mut self, id: NodeId, x: f64, current_width: f64) {
        if let Some(machine) = self.registry.machine(id) {
            machine.pointer_down(x, current_width);
        }
    }

    pub fn resize_pointer_move(&mut self, id: NodeId, x: f64, available_width: f64) -> Option<f64> {
        self.registry.machine(id)?.pointer_move(x, available_width)
    }

    pub fn resize_pointer_up(&mut self, id: NodeId, now: Instant) {
        if let Some(ended) = self.registry.machine(id).and_then(|m| m.pointer_up()) {
            let kind = if ended.skip_linkify {
                ChangeKind::ImageResized
            } else {
                ChangeKind::TextEdit
            };
            self.notify_change(kind, now);
        }
    }

    // --- preview --------------------------------------------------------

    /// Double click on a selected container: open the preview surface and
    /// park the payload. It is transmitted only on `preview_ready`, never
    /// on creation - the surface may not have finished initializing.
    pub fn preview_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(payload) = container_image_src(&self.tree, id) else {
            return;
        };
        self.pending_preview = Some(payload);
        if let Err(e) = self.preview.open() {
            tracing::warn!(target: "memo::surface", error = %e, "preview surface failed to open");
            self.pending_preview = None;
        }
    }

    /// The preview surface acknowledged it is fully initialized.
    pub fn preview_ready(&mut self) {
        let Some(payload) = self.pending_preview.take() else {
            return;
        };
        if let Err(e) = self.preview.show(&payload) {
            tracing::warn!(target: "memo::surface", error = %e, "preview payload send failed");
        }
    }

    // --- accessors ------------------------------------------------------

    pub fn tree(&self) -> &[MarkupNode] {
        &self.tree
    }

    /// Direct mutable access for the platform adapter that owns the
    /// editable region. Mutations must be followed by `notify_change`.
    pub fn tree_mut(&mut self) -> &mut Vec<MarkupNode> {
        &mut self.tree
    }

    pub fn caret(&self) -> Option<&Caret> {
        self.caret.as_ref()
    }

    pub fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn display_html(&self) -> &str {
        &self.display_html
    }

    pub fn bound_containers(&self) -> usize {
        self.registry.bound_count()
    }

    pub fn extract_text(&self) -> String {
        extract(&self.tree)
    }

    fn min_width(&self) -> f64 {
        f64::from(self.config.min_image_width)
    }
}

fn notice_for(err: EmbedError) -> Notice {
    match err {
        EmbedError::TooLarge {
            actual_bytes,
            limit_bytes,
        } => Notice::ImageTooLarge {
            actual_bytes,
            limit_bytes,
        },
        other => Notice::ImageIngestFailed(other.to_string()),
    }
}

fn find_container(nodes: &[MarkupNode], id: NodeId) -> bool {
    nodes.iter().any(|node| {
        (node.kind() == NodeKind::ImageContainer && node.id() == Some(id))
            || find_container(node.children(), id)
    })
}

fn remove_by_id(nodes: &mut Vec<MarkupNode>, id: NodeId) -> bool {
    if let Some(index) = nodes.iter().position(|n| n.id() == Some(id)) {
        nodes.remove(index);
        return true;
    }
    for node in nodes.iter_mut() {
        if let MarkupNode::Element(el) = node {
            if remove_by_id(&mut el.children, id) {
                return true;
            }
        }
    }
    false
}

/// Pull the image payload (the `src` data URL) out of a container's
/// fragment.
fn container_image_src(nodes: &[MarkupNode], id: NodeId) -> Option<String> {
    fn find(nodes: &[MarkupNode], id: NodeId) -> Option<String> {
        for node in nodes {
            if node.kind() == NodeKind::ImageContainer && node.id() == Some(id) {
                return Some(node.outer_markup());
            }
            if let Some(found) = find(node.children(), id) {
                return Some(found);
            }
        }
        None
    }
    let markup = find(nodes, id)?;
    IMG_SRC
        .captures(&markup)
        .map(|caps| caps[1].to_owned())
}
