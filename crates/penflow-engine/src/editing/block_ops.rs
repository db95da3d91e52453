use crate::model::block::{Block, IdGen};
use crate::model::style::StyleSegment;

/// Splices `text` into the block's content at `offset`, reclassifying style
/// segments around the insertion point:
///
/// - segments ending at or before `offset` are untouched
/// - segments starting at or after `offset` shift right by `text.len()`
/// - segments straddling `offset` extend their `end` only, so the inserted
///   text inherits the straddling style
///
/// Empty text, an offset past the end, or an offset off a `char` boundary is
/// a no-op returning the block unchanged.
pub fn insert_text_in_block(block: &Block, offset: usize, text: &str) -> Block {
    if text.is_empty() || offset > block.content.len() || !block.content.is_char_boundary(offset) {
        return block.clone();
    }

    let mut content = String::with_capacity(block.content.len() + text.len());
    content.push_str(&block.content[..offset]);
    content.push_str(text);
    content.push_str(&block.content[offset..]);

    let inserted = text.len();
    let styles = block
        .styles
        .iter()
        .map(|seg| {
            if seg.end <= offset {
                seg.clone()
            } else if seg.start >= offset {
                seg.shifted_right(inserted)
            } else {
                StyleSegment::new(seg.start, seg.end + inserted, seg.style.clone())
            }
        })
        .collect();

    Block {
        id: block.id,
        block_type: block.block_type,
        content,
        styles,
    }
}

/// Removes `[start, end)` from the block's content, dropping or trimming
/// style segments that touched the deleted range.
///
/// Invalid ranges (`start >= end`, `end` past the content, offsets off
/// `char` boundaries) are a no-op returning the block unchanged.
pub fn delete_range_in_block(block: &Block, start: usize, end: usize) -> Block {
    if start >= end
        || end > block.content.len()
        || !block.content.is_char_boundary(start)
        || !block.content.is_char_boundary(end)
    {
        return block.clone();
    }

    let mut content = String::with_capacity(block.content.len() - (end - start));
    content.push_str(&block.content[..start]);
    content.push_str(&block.content[end..]);

    let removed = end - start;
    let styles = block
        .styles
        .iter()
        .filter_map(|seg| {
            if seg.end <= start {
                // Wholly before the deletion
                Some(seg.clone())
            } else if seg.start >= end {
                // Wholly after: shift left
                Some(seg.shifted_left(removed))
            } else if seg.start >= start && seg.end <= end {
                // Wholly inside: dropped
                None
            } else if seg.start < start && seg.end <= end {
                // Straddles the deletion start: truncate
                Some(StyleSegment::new(seg.start, start, seg.style.clone()))
            } else if seg.start >= start {
                // Straddles the deletion end: left edge snaps to the cut
                Some(StyleSegment::new(start, seg.end - removed, seg.style.clone()))
            } else {
                // Spans the whole deleted range: shrink
                Some(StyleSegment::new(seg.start, seg.end - removed, seg.style.clone()))
            }
        })
        .collect();

    Block {
        id: block.id,
        block_type: block.block_type,
        content,
        styles,
    }
}

/// Splits a block in two at `offset`. `before` keeps the original id, `after`
/// gets a fresh one from `ids`; both keep the block type.
///
/// Every segment lands on one side of the cut; a segment straddling the cut
/// is divided so no styled range is lost. Offsets past the end clamp; offsets
/// off a `char` boundary snap back to the previous boundary.
pub fn split_block(block: &Block, offset: usize, ids: &dyn IdGen) -> (Block, Block) {
    let mut offset = offset.min(block.content.len());
    while !block.content.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut before_styles = Vec::new();
    let mut after_styles = Vec::new();
    for seg in &block.styles {
        if seg.end <= offset {
            before_styles.push(seg.clone());
        } else if seg.start >= offset {
            after_styles.push(seg.shifted_left(offset));
        } else {
            before_styles.push(StyleSegment::new(seg.start, offset, seg.style.clone()));
            after_styles.push(StyleSegment::new(0, seg.end - offset, seg.style.clone()));
        }
    }

    let before = Block {
        id: block.id,
        block_type: block.block_type,
        content: block.content[..offset].to_string(),
        styles: before_styles,
    };
    let after = Block {
        id: ids.fresh(),
        block_type: block.block_type,
        content: block.content[offset..].to_string(),
        styles: after_styles,
    };
    (before, after)
}

/// Concatenates two blocks. The result keeps `first`'s id and type;
/// `second`'s segments shift right by `first`'s content length.
///
/// Two segments that abut exactly at the join with the same style fuse back
/// into one, so splitting and re-merging reproduces the original block.
pub fn merge_blocks(first: &Block, second: &Block) -> Block {
    let junction = first.content.len();

    let mut content = String::with_capacity(junction + second.content.len());
    content.push_str(&first.content);
    content.push_str(&second.content);

    let mut styles = first.styles.clone();
    for seg in &second.styles {
        let shifted = seg.shifted_right(junction);
        match styles
            .iter_mut()
            .find(|s| s.end == junction && shifted.start == junction && s.style == shifted.style)
        {
            Some(abutting) => abutting.end = shifted.end,
            None => styles.push(shifted),
        }
    }

    Block {
        id: first.id,
        block_type: first.block_type,
        content,
        styles,
    }
}
