//! End-to-end flows over the public surface: typing, bursts, image
//! paste/drop, resize, and the preview handshake, driven the way a host
//! event loop drives the session.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use web_time::Instant;

use memo_common::{NoteStore, PreviewError, PreviewPort, StoreError, SurfaceConfig};
use memo_editor_core::{Caret, DocNode, MarkupNode, NodeKind, capture_offset};
use memo_surface::{ChangeKind, EditorSession, FilePayload};

#[derive(Default)]
struct StoreLog {
    note: String,
    saves: Vec<String>,
    history: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<StoreLog>>);

impl NoteStore for SharedStore {
    fn load_note(&mut self) -> Result<String, StoreError> {
        Ok(self.0.borrow().note.clone())
    }

    fn save_note(&mut self, text: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().saves.push(text.to_owned());
        Ok(())
    }

    fn save_note_to_history(&mut self, text: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().history.push(text.to_owned());
        Ok(())
    }
}

#[derive(Default)]
struct PreviewLog {
    opened: u32,
    shown: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedPreview(Rc<RefCell<PreviewLog>>);

impl PreviewPort for SharedPreview {
    fn open(&mut self) -> Result<(), PreviewError> {
        self.0.borrow_mut().opened += 1;
        Ok(())
    }

    fn show(&mut self, payload: &str) -> Result<(), PreviewError> {
        self.0.borrow_mut().shown.push(payload.to_owned());
        Ok(())
    }
}

struct Harness {
    session: EditorSession<SharedStore, SharedPreview>,
    store: SharedStore,
    preview: SharedPreview,
    now: Instant,
}

impl Harness {
    fn with_note(note: &str) -> Self {
        let store = SharedStore::default();
        store.0.borrow_mut().note = note.to_owned();
        let preview = SharedPreview::default();
        let mut session = EditorSession::new(
            store.clone(),
            preview.clone(),
            SurfaceConfig::default(),
        );
        session.load();
        Harness {
            session,
            store,
            preview,
            now: Instant::now(),
        }
    }

    /// Advance the clock and pump the session, the way the host loop does.
    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.session.tick(self.now);
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgba([30, 60, 90, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode test png");
    buf
}

#[test]
fn typing_burst_saves_once_and_linkifies_with_caret_kept() {
    let mut h = Harness::with_note("");

    // Simulate a typing burst ending with a bare URL, caret at the end.
    let text = "check www.example.com";
    *h.session.tree_mut() = vec![MarkupNode::text(text)];
    h.session
        .set_caret(Some(Caret::new(vec![0], text.chars().count())));
    for _ in 0..4 {
        h.session.notify_change(ChangeKind::TextEdit, h.now);
        h.advance(100);
    }

    // Nothing fired inside the burst.
    assert!(h.store.0.borrow().history.is_empty());

    // Save window (500ms) elapses first.
    h.advance(500);
    assert_eq!(h.store.0.borrow().history, vec![text.to_owned()]);

    // Linkify window (2s) turns the URL into an anchor and rewrites the
    // tree; the caret keeps its character position.
    h.advance(1500);
    assert!(h
        .session
        .display_html()
        .contains(r#"<a href="https://www.example.com""#));
    assert!(h.session.tree().len() > 1);
    let offset = capture_offset(h.session.tree(), h.session.caret());
    assert_eq!(offset, text.chars().count());

    // A second pass over unchanged content rewrites nothing.
    let tree_before = h.session.tree().to_vec();
    h.session.notify_change(ChangeKind::TextEdit, h.now);
    h.advance(2000);
    assert_eq!(h.session.tree(), &tree_before[..]);
}

#[test]
fn oversize_paste_rejected_but_drop_accepts_same_payload() {
    let mut h = Harness::with_note("");
    let bytes = png_bytes(8, 8);

    // Shrink the paste limit under the payload; drop stays permissive.
    let mut session = EditorSession::new(
        SharedStore::default(),
        SharedPreview::default(),
        SurfaceConfig {
            paste_limit_bytes: bytes.len() - 1,
            ..SurfaceConfig::default()
        },
    );
    session.load();

    let items = vec![FilePayload::new("image/png", bytes.clone())];
    let notices = session.paste(&items, h.now);
    assert_eq!(notices.len(), 1);
    assert!(session.tree().is_empty(), "nothing inserted on rejection");

    let notices = session.drop_files(&items, h.now);
    assert!(notices.is_empty());
    assert_eq!(session.tree().len(), 1);
    assert_eq!(session.tree()[0].kind(), NodeKind::ImageContainer);
}

#[test]
fn paste_takes_first_image_item_only() {
    let mut h = Harness::with_note("");
    let items = vec![
        FilePayload::new("text/plain", b"ignored".to_vec()),
        FilePayload::new("image/png", png_bytes(4, 4)),
        FilePayload::new("image/png", png_bytes(6, 6)),
    ];
    let notices = h.session.paste(&items, h.now);
    assert!(notices.is_empty());
    assert_eq!(h.session.tree().len(), 1);
}

#[test]
fn drop_inserts_every_image_and_reports_failures_per_file() {
    let mut h = Harness::with_note("");
    let files = vec![
        FilePayload::new("image/png", png_bytes(4, 4)),
        FilePayload::new("image/png", b"broken".to_vec()),
        FilePayload::new("image/png", png_bytes(6, 6)),
    ];
    let notices = h.session.drop_files(&files, h.now);
    assert_eq!(notices.len(), 1);
    let containers = h
        .session
        .tree()
        .iter()
        .filter(|n| n.kind() == NodeKind::ImageContainer)
        .count();
    assert_eq!(containers, 2);
}

#[test]
fn pasted_gif_keeps_its_bytes() {
    let mut h = Harness::with_note("");
    let bytes = b"GIF89a-animation".to_vec();
    let items = vec![FilePayload::new("image/gif", bytes)];
    assert!(h.session.paste(&items, h.now).is_empty());
    assert!(h.session.tree()[0]
        .outer_markup()
        .contains("data:image/gif;base64,"));
}

#[test]
fn resize_drag_clamps_and_skips_linkify() {
    let mut h = Harness::with_note("");
    let items = vec![FilePayload::new("image/png", png_bytes(8, 8))];
    h.session.paste(&items, h.now);

    // Let the insertion's save/linkify/rebind bursts settle; the linkify
    // rewrite replaces the node, so bind and take the id afterwards.
    h.advance(3000);
    h.advance(300);
    assert_eq!(h.session.bound_containers(), 1);
    let id = h.session.tree()[0].id().expect("container id");

    // Drag 60px right from a 100px image inside a 120px region.
    h.session.resize_pointer_down(id, 10.0, 100.0);
    let width = h.session.resize_pointer_move(id, 70.0, 120.0);
    assert_eq!(width, Some(120.0));

    // Drag far left: clamped to the minimum width.
    let width = h.session.resize_pointer_move(id, -300.0, 120.0);
    assert_eq!(width, Some(50.0));

    // Ending the drag saves but never re-enters the linkify path.
    let html_before = h.session.display_html().to_owned();
    h.session.resize_pointer_up(id, h.now);
    h.advance(5000);
    assert_eq!(h.session.display_html(), html_before);
    assert!(h.store.0.borrow().history.len() >= 2);
}

#[test]
fn preview_handshake_delivers_payload_after_ready() {
    let mut h = Harness::with_note("");
    let items = vec![FilePayload::new("image/png", png_bytes(8, 8))];
    h.session.paste(&items, h.now);
    let id = h.session.tree()[0].id().expect("container id");

    h.session.click(Some(id));
    h.session.preview_selected();
    assert_eq!(h.preview.0.borrow().opened, 1);
    assert!(h.preview.0.borrow().shown.is_empty());

    h.session.preview_ready();
    let shown = h.preview.0.borrow().shown.clone();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].starts_with("data:image/png;base64,"));
}

#[test]
fn empty_note_saves_through_plain_save() {
    let mut h = Harness::with_note("   \n  ");
    h.session.notify_change(ChangeKind::TextEdit, h.now);
    h.advance(500);
    let log = h.store.0.borrow();
    assert_eq!(log.saves.len(), 1);
    assert!(log.history.is_empty());
}

#[test]
fn persisted_note_with_image_survives_reload() {
    // Simulate a persisted note containing a container fragment, as the
    // linkify pass would have saved it.
    let mut h = Harness::with_note("");
    let items = vec![FilePayload::new("image/png", png_bytes(8, 8))];
    h.session.paste(&items, h.now);
    h.advance(3000); // save + linkify settle
    let saved = h.store.0.borrow().history.last().cloned().expect("saved");

    let mut reloaded = Harness::with_note(&saved);
    assert_eq!(reloaded.session.extract_text(), saved);
    let containers = reloaded
        .session
        .tree()
        .iter()
        .filter(|n| n.kind() == NodeKind::ImageContainer)
        .count();
    assert_eq!(containers, 1);
}
