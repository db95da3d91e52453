//! Edit operations over the block model.
//!
//! Everything here is a pure transform: operations take a block or document
//! by reference and return a new value, never mutating their input. Bad
//! input (reversed ranges, offsets past the end or off a `char` boundary) is
//! a defensive no-op returning the input unchanged, so callers cannot
//! corrupt a document with a bad range.
//!
//! - `block_ops`: insert/delete/split/merge within one block, reclassifying
//!   that block's style segments
//! - `document_ops`: global-offset edits across block boundaries, including
//!   newline-driven block splitting and cross-block deletion stitching
//! - `offsets`: global offset ↔ (block index, local offset) conversion and
//!   the local→global segment projection

pub mod block_ops;
pub mod document_ops;
pub mod offsets;

pub use block_ops::{delete_range_in_block, insert_text_in_block, merge_blocks, split_block};
pub use offsets::{BlockAddress, global_offset_of, locate_offset, to_global_segments};

use crate::model::block::BlockId;

/// A global offset resolved into caret coordinates for the owning block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointDescription {
    /// The block containing this point
    pub block_id: BlockId,
    /// Index of that block in the document
    pub block_index: usize,
    /// Byte offset within the block's content
    pub local_offset: usize,
    /// Line number within the block's content (0-based)
    pub local_line: usize,
    /// Column within the line (0-based)
    pub local_col: usize,
}
