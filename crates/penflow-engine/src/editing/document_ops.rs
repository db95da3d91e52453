use crate::editing::PointDescription;
use crate::editing::block_ops::{delete_range_in_block, insert_text_in_block, merge_blocks, split_block};
use crate::editing::offsets::locate_offset;
use crate::model::block::{Block, BlockType, IdGen};
use crate::model::document::BlockDocument;

impl BlockDocument {
    /// Inserts `text` at a global offset, returning the successor document.
    ///
    /// Text without newlines delegates to the block-local insert. Text with
    /// newlines splits the target block at the insertion point: the first
    /// inserted line joins the `before` half, the last line heads the
    /// `after` half (styles re-based), and interior lines become fresh
    /// unstyled paragraphs.
    pub fn insert_text(&self, at: usize, text: &str, ids: &dyn IdGen) -> BlockDocument {
        if text.is_empty() {
            return self.clone();
        }

        let addr = locate_offset(self, at);
        let target = &self.blocks[addr.block_index];
        if !target.content.is_char_boundary(addr.local_offset) {
            return self.clone();
        }

        let mut blocks = self.blocks.clone();
        if !text.contains('\n') {
            blocks[addr.block_index] = insert_text_in_block(target, addr.local_offset, text);
            return self.with_blocks(blocks);
        }

        let (before, after) = split_block(target, addr.local_offset, ids);
        let lines: Vec<&str> = text.split('\n').collect();
        let first = lines[0];
        let last = lines[lines.len() - 1];

        let mut replacement = Vec::with_capacity(lines.len());
        replacement.push(insert_text_in_block(&before, before.len(), first));
        for interior in &lines[1..lines.len() - 1] {
            replacement.push(Block::new(ids.fresh(), BlockType::Paragraph, *interior));
        }
        replacement.push(insert_text_in_block(&after, 0, last));

        blocks.splice(addr.block_index..=addr.block_index, replacement);
        self.with_blocks(blocks)
    }

    /// Deletes the global range `[start, end)`, returning the successor
    /// document.
    ///
    /// A range within one block delegates to the block-local delete. A range
    /// crossing blocks truncates the start block, truncates the end block,
    /// stitches the remainders into one block (keeping the start block's
    /// identity), and drops every fully-interior block. A deletion covering
    /// the whole document leaves a single empty paragraph rather than an
    /// empty document.
    pub fn delete_range(&self, start: usize, end: usize, ids: &dyn IdGen) -> BlockDocument {
        let end = end.min(self.len());
        if start >= end {
            return self.clone();
        }
        if start == 0 && end == self.len() {
            return self.with_blocks(vec![Block::empty_paragraph(ids)]);
        }

        let from = locate_offset(self, start);
        let to = locate_offset(self, end);
        let start_block = &self.blocks[from.block_index];
        let end_block = &self.blocks[to.block_index];
        if !start_block.content.is_char_boundary(from.local_offset)
            || !end_block.content.is_char_boundary(to.local_offset)
        {
            return self.clone();
        }

        let mut blocks = self.blocks.clone();
        if from.block_index == to.block_index {
            blocks[from.block_index] =
                delete_range_in_block(start_block, from.local_offset, to.local_offset);
            return self.with_blocks(blocks);
        }

        let kept_prefix = delete_range_in_block(start_block, from.local_offset, start_block.len());
        let kept_suffix = delete_range_in_block(end_block, 0, to.local_offset);
        let stitched = merge_blocks(&kept_prefix, &kept_suffix);

        blocks.splice(from.block_index..=to.block_index, [stitched]);
        self.with_blocks(blocks)
    }

    /// Replaces the global range `[start, end)` with `text`: a delete
    /// followed by an insert at the same start offset.
    pub fn replace_range(
        &self,
        start: usize,
        end: usize,
        text: &str,
        ids: &dyn IdGen,
    ) -> BlockDocument {
        self.delete_range(start, end, ids).insert_text(start, text, ids)
    }

    /// Resolves a global offset into caret coordinates: owning block plus the
    /// (line, column) position within that block's content.
    pub fn describe_point(&self, global_offset: usize) -> PointDescription {
        let addr = locate_offset(self, global_offset);
        let block = &self.blocks[addr.block_index];
        let (local_line, local_col) = byte_to_point_in_text(&block.content, addr.local_offset);

        PointDescription {
            block_id: block.id,
            block_index: addr.block_index,
            local_offset: addr.local_offset,
            local_line,
            local_col,
        }
    }
}

/// Converts a byte offset to a (row, column) position within `text`.
/// Offsets past the end clamp to the final position.
fn byte_to_point_in_text(text: &str, byte_offset: usize) -> (usize, usize) {
    let offset = byte_offset.min(text.len());
    let before = &text.as_bytes()[..offset];

    let row = before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    (row, offset - line_start)
}
