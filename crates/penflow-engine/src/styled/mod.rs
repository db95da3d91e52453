//! Tree-shaped styled document, the alternate representation used where
//! nested or overlapping decoration layers (lint, spellcheck) are composed
//! over the same text.
//!
//! Structurally independent of the block model: the two meet only at the
//! flat-segment surface renderers consume.

pub mod flatten;
pub mod node;
pub mod ops;

pub use node::{OverlayLayer, StyledDocument, StyledElement, StyledNode, Tag};
pub use ops::{
    delete_range_from_node, extract_range, insert_text_into_node, merge_adjacent_text_nodes,
    unwrap_tag_in_node, wrap_range_in_node,
};
