//! The node model for the editable surface.
//!
//! The live platform tree (a browser DOM, a native view hierarchy) is never
//! touched directly. Extraction and cursor logic dispatch on a closed set
//! of node kinds behind the `DocNode` capability trait; `MarkupNode` is the
//! concrete tree the surface owns.

use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;
use std::sync::LazyLock;

/// The closed set of node kinds the content model distinguishes.
///
/// Rules are applied in this priority order during extraction: an image
/// container is never treated as a generic block even though the platform
/// element underneath is the same generic container type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Character data.
    Text,
    /// Composite wrapper around an embedded image plus its resize handle.
    ImageContainer,
    /// A bare image element outside any container.
    StandaloneImage,
    /// Explicit line break.
    LineBreak,
    /// Generic block-level container.
    BlockContainer,
    /// Any other element (anchor etc.) - markup is transparent.
    Inline,
}

/// Capability interface over one node of the rendered tree.
///
/// Implemented by `MarkupNode` for the in-memory tree; a platform adapter
/// implements it over live nodes without the core knowing.
pub trait DocNode: Sized {
    fn kind(&self) -> NodeKind;

    /// Character content. Empty for element nodes.
    fn text_content(&self) -> &str;

    fn children(&self) -> &[Self];

    /// Serialized outer markup of an image node, with the transient
    /// `selected` class stripped. Empty for non-image nodes.
    fn outer_markup(&self) -> String;
}

/// Stable identity for an element node, used by the handler-binding
/// registry instead of stashing bookkeeping flags on the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        NodeId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Concrete tagged-variant tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element(ElementNode),
}

/// An element node: kind tag, identity, children, and (for image kinds)
/// the verbatim serialized fragment.
#[derive(Debug, Clone, Eq)]
pub struct ElementNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Verbatim markup for `ImageContainer`/`StandaloneImage` nodes.
    pub fragment: Option<String>,
    pub children: Vec<MarkupNode>,
}

// Identity is not part of structural equality: two renders of the same
// note compare equal even though their nodes carry fresh ids.
impl PartialEq for ElementNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.fragment == other.fragment
            && self.children == other.children
    }
}

impl MarkupNode {
    pub fn text(content: impl Into<String>) -> Self {
        MarkupNode::Text(content.into())
    }

    pub fn line_break() -> Self {
        Self::element(NodeKind::LineBreak, None, Vec::new())
    }

    pub fn block(children: Vec<MarkupNode>) -> Self {
        Self::element(NodeKind::BlockContainer, None, children)
    }

    pub fn inline(children: Vec<MarkupNode>) -> Self {
        Self::element(NodeKind::Inline, None, children)
    }

    /// Wrap a serialized image-container fragment. The fragment is kept
    /// byte-verbatim; `selected` stripping happens on `outer_markup`.
    pub fn image_container(fragment: impl Into<String>) -> Self {
        Self::element(NodeKind::ImageContainer, Some(fragment.into()), Vec::new())
    }

    pub fn standalone_image(fragment: impl Into<String>) -> Self {
        Self::element(NodeKind::StandaloneImage, Some(fragment.into()), Vec::new())
    }

    fn element(kind: NodeKind, fragment: Option<String>, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element(ElementNode {
            id: NodeId::next(),
            kind,
            fragment,
            children,
        })
    }

    /// Identity of this node, if it is an element.
    pub fn id(&self) -> Option<NodeId> {
        match self {
            MarkupNode::Text(_) => None,
            MarkupNode::Element(el) => Some(el.id),
        }
    }
}

impl DocNode for MarkupNode {
    fn kind(&self) -> NodeKind {
        match self {
            MarkupNode::Text(_) => NodeKind::Text,
            MarkupNode::Element(el) => el.kind,
        }
    }

    fn text_content(&self) -> &str {
        match self {
            MarkupNode::Text(s) => s,
            MarkupNode::Element(_) => "",
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            MarkupNode::Text(_) => &[],
            MarkupNode::Element(el) => &el.children,
        }
    }

    fn outer_markup(&self) -> String {
        match self {
            MarkupNode::Element(el) => match &el.fragment {
                Some(fragment) => strip_selected_class(fragment),
                None => String::new(),
            },
            MarkupNode::Text(_) => String::new(),
        }
    }
}

/// Remove the transient `selected` token from class attributes.
///
/// Selection is view state, not content: a container serialized while
/// selected must extract identically to an unselected one.
pub fn strip_selected_class(markup: &str) -> String {
    static CLASS_ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"class="([^"]*)""#).expect("class attr regex"));

    CLASS_ATTR
        .replace_all(markup, |caps: &regex::Captures<'_>| {
            let classes: Vec<&str> = caps[1]
                .split_whitespace()
                .filter(|c| *c != "selected")
                .collect();
            format!("class=\"{}\"", classes.join(" "))
        })
        .into_owned()
}
