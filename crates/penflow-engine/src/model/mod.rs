//! The block data model: style segments, blocks, and the block document.

pub mod block;
pub mod document;
pub mod style;

pub use block::{Block, BlockId, BlockType, IdGen, ParseBlockTypeError, SeqIds, UuidIds};
pub use document::{BlockDocument, default_style_definitions};
pub use style::{Style, StyleAttr, StyleSegment};
