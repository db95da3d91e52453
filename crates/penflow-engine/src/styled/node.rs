use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::style::Style;

/// Element tag in the styled tree.
///
/// `Root` and `Fragment` are real variants rather than magic tag strings:
/// `Root` marks the document's top container, `Fragment` marks a transient
/// container whose children the caller splices into the parent (produced by
/// structural rewrites like wrapping a sub-range of a text node). A
/// `Fragment` never survives in a document at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Root,
    Fragment,
    Named(String),
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Tag::Named(name.into())
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, Tag::Named(n) if n == name)
    }
}

/// A node in the nested styled-text representation: either raw text or an
/// element applying a tag to its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyledNode {
    Text(String),
    Element(StyledElement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledElement {
    pub tag: Tag,
    pub children: Vec<StyledNode>,
}

impl StyledNode {
    pub fn text(content: impl Into<String>) -> Self {
        StyledNode::Text(content.into())
    }

    pub fn element(tag: Tag, children: Vec<StyledNode>) -> Self {
        StyledNode::Element(StyledElement { tag, children })
    }

    /// Total text length of this subtree in bytes.
    pub fn len(&self) -> usize {
        match self {
            StyledNode::Text(s) => s.len(),
            StyledNode::Element(el) => el.children.iter().map(StyledNode::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated text of every leaf.
    pub fn to_text(&self) -> String {
        fn collect(node: &StyledNode, out: &mut String) {
            match node {
                StyledNode::Text(s) => out.push_str(s),
                StyledNode::Element(el) => {
                    for child in &el.children {
                        collect(child, out);
                    }
                }
            }
        }
        let mut out = String::with_capacity(self.len());
        collect(self, &mut out);
        out
    }
}

/// An independent decoration tree composited over the base content at
/// flatten time. Higher `priority` wins on conflicting attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayLayer {
    pub id: String,
    pub root: StyledNode,
    pub priority: i32,
}

/// The tree-shaped document: base content (a `Root` element), overlay layers,
/// and the tag → style table both are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledDocument {
    pub content: StyledNode,
    pub overlays: Vec<OverlayLayer>,
    pub styles: BTreeMap<String, Style>,
}

impl StyledDocument {
    pub fn new(children: Vec<StyledNode>, styles: BTreeMap<String, Style>) -> Self {
        Self {
            content: StyledNode::element(Tag::Root, children),
            overlays: Vec::new(),
            styles,
        }
    }

    pub fn from_text(text: impl Into<String>, styles: BTreeMap<String, Style>) -> Self {
        Self::new(vec![StyledNode::text(text)], styles)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn text(&self) -> String {
        self.content.to_text()
    }

    /// New document with the overlay added, replacing any existing layer with
    /// the same id.
    pub fn with_overlay(&self, layer: OverlayLayer) -> Self {
        let mut next = self.clone();
        next.overlays.retain(|o| o.id != layer.id);
        next.overlays.push(layer);
        next
    }

    /// New document with the overlay of the given id removed; unknown ids are
    /// a no-op.
    pub fn without_overlay(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.overlays.retain(|o| o.id != id);
        next
    }
}
