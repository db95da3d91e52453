use crate::model::document::BlockDocument;
use crate::model::style::{StyleSegment, merge_segment_layers};

/// A global offset resolved to its owning block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAddress {
    pub block_index: usize,
    pub local_offset: usize,
}

/// Resolves a global offset to a (block index, local offset) pair.
///
/// Each block owns the offsets `[start, start + len]` inclusive; the
/// inter-block newline itself resolves to the end of the earlier block.
/// Offsets beyond the document clamp to the end of the last block.
pub fn locate_offset(doc: &BlockDocument, global_offset: usize) -> BlockAddress {
    let mut start = 0;
    for (index, block) in doc.blocks.iter().enumerate() {
        if global_offset <= start + block.len() {
            return BlockAddress {
                block_index: index,
                local_offset: global_offset - start,
            };
        }
        start += block.len() + 1;
    }

    let last = doc.blocks.len().saturating_sub(1);
    BlockAddress {
        block_index: last,
        local_offset: doc.blocks.last().map(|b| b.len()).unwrap_or(0),
    }
}

/// The global offset of a (block index, local offset) pair. Out-of-range
/// indices clamp to the document end.
pub fn global_offset_of(doc: &BlockDocument, block_index: usize, local_offset: usize) -> usize {
    let mut start = 0;
    for (index, block) in doc.blocks.iter().enumerate() {
        if index == block_index {
            return start + local_offset.min(block.len());
        }
        start += block.len() + 1;
    }
    doc.len()
}

/// Projects every block's local style segments to global offsets, returning
/// a sorted, non-overlapping, coalesced list: the flat interface surface a
/// renderer consumes.
pub fn to_global_segments(doc: &BlockDocument) -> Vec<StyleSegment> {
    let mut layers: Vec<(StyleSegment, i32)> = Vec::new();
    let mut start = 0;
    for block in &doc.blocks {
        for seg in &block.styles {
            layers.push((seg.shifted_right(start), 0));
        }
        start += block.len() + 1;
    }
    merge_segment_layers(&layers)
}
