//! Markdown conversion for the block model.
//!
//! Parsing is two-phase: line-prefix classification decides each line's block
//! type (with a fence state machine accumulating raw code lines verbatim),
//! then inline delimiter extraction turns each non-code line's text into
//! de-delimited content plus style segments. Serialization is the reverse:
//! per-type prefixes plus delimiter re-insertion driven by the document's
//! symbolic style definitions.
//!
//! The conversion is lossy-but-reversible: color and font-size styling drop
//! on the way out, and a second round trip changes nothing further.

pub mod blocks;
pub mod inline;
pub mod serialize;

pub use blocks::{detect_block_type, is_fence_line};
pub use inline::{InlineLimits, parse_inline, parse_inline_with_limits};
pub use serialize::to_markdown;

use crate::model::block::{Block, BlockType, IdGen};
use crate::model::document::BlockDocument;

/// Parses Markdown text into a block document.
///
/// Every input line becomes one block, except fenced code: lines between
/// fences accumulate verbatim (no inline parsing) into a single code block.
/// An unclosed fence at end of input still yields its accumulated block.
pub fn parse_markdown(text: &str, ids: &dyn IdGen) -> BlockDocument {
    let mut blocks = Vec::new();
    let mut fence: Option<Vec<&str>> = None;

    for line in text.lines() {
        if let Some(buffer) = fence.as_mut() {
            if is_fence_line(line) {
                blocks.push(Block::new(ids.fresh(), BlockType::CodeBlock, buffer.join("\n")));
                fence = None;
            } else {
                buffer.push(line);
            }
            continue;
        }
        if is_fence_line(line) {
            fence = Some(Vec::new());
            continue;
        }

        let (block_type, rest) = detect_block_type(line);
        let (content, styles) = parse_inline(rest);
        blocks.push(Block::new(ids.fresh(), block_type, content).with_styles(styles));
    }

    if let Some(buffer) = fence {
        blocks.push(Block::new(ids.fresh(), BlockType::CodeBlock, buffer.join("\n")));
    }

    BlockDocument::new(blocks, ids)
}
