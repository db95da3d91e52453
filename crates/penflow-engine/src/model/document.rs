use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::config::BlockTypeStyle;
use crate::model::block::{Block, BlockId, BlockType, IdGen};
use crate::model::style::Style;

/// The document: an ordered, non-empty sequence of blocks.
///
/// Global document text is the blocks' contents joined by a single newline,
/// so global length is the sum of content lengths plus one separator per
/// inter-block gap.
///
/// Documents are immutable values: every edit operation returns a new
/// `BlockDocument` and never mutates its input. `version` is bumped by the
/// edit pipeline on every mutation so read-only clients can detect change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    pub blocks: Vec<Block>,
    /// Symbolic style tags ("bold", "italic", ...) mapped to the style record
    /// they stand for. Used to recover tags from raw style comparisons when
    /// serializing to Markdown.
    pub style_definitions: BTreeMap<String, Style>,
    /// Optional per-type visual overrides consumed by the layout builder.
    pub block_type_styles: BTreeMap<BlockType, BlockTypeStyle>,
    pub version: u64,
}

/// The symbolic tags every document knows about by default.
pub fn default_style_definitions() -> BTreeMap<String, Style> {
    BTreeMap::from([
        ("bold".to_string(), Style::bold()),
        ("italic".to_string(), Style::italic()),
        ("code".to_string(), Style::code()),
        ("strikethrough".to_string(), Style::strikethrough()),
        ("underline".to_string(), Style::underline()),
    ])
}

impl BlockDocument {
    /// Create a document from blocks, substituting a single empty paragraph
    /// when `blocks` is empty (documents are never block-less).
    pub fn new(blocks: Vec<Block>, ids: &dyn IdGen) -> Self {
        let blocks = if blocks.is_empty() {
            vec![Block::empty_paragraph(ids)]
        } else {
            blocks
        };
        Self {
            blocks,
            style_definitions: default_style_definitions(),
            block_type_styles: BTreeMap::new(),
            version: 0,
        }
    }

    /// Single empty paragraph, version zero.
    pub fn empty(ids: &dyn IdGen) -> Self {
        Self::new(Vec::new(), ids)
    }

    /// Parse a Markdown document.
    pub fn from_markdown(text: &str, ids: &dyn IdGen) -> Self {
        crate::markdown::parse_markdown(text, ids)
    }

    /// Parse a Markdown document from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8], ids: &dyn IdGen) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_markdown(text, ids))
    }

    /// Serialize back to Markdown.
    pub fn to_markdown(&self) -> String {
        crate::markdown::to_markdown(self)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Global document length: content lengths plus one newline separator per
    /// inter-block gap.
    pub fn len(&self) -> usize {
        let content: usize = self.blocks.iter().map(Block::len).sum();
        content + self.blocks.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].is_empty()
    }

    /// The joined global text.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&block.content);
        }
        out
    }

    pub fn block_by_id(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Same document with the blocks replaced and the version bumped.
    /// The successor value every edit operation returns.
    pub(crate) fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            style_definitions: self.style_definitions.clone(),
            block_type_styles: self.block_type_styles.clone(),
            version: self.version + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::SeqIds;

    fn doc_of(contents: &[&str], ids: &dyn IdGen) -> BlockDocument {
        let blocks = contents
            .iter()
            .map(|c| Block::new(ids.fresh(), BlockType::Paragraph, *c))
            .collect();
        BlockDocument::new(blocks, ids)
    }

    #[test]
    fn test_empty_document_has_one_blank_paragraph() {
        let ids = SeqIds::new();
        let doc = BlockDocument::empty(&ids);

        assert_eq!(doc.block_count(), 1);
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn test_length_counts_inter_block_newlines() {
        let ids = SeqIds::new();
        let doc = doc_of(&["Line 1", "Line 2", "Line 3"], &ids);

        // 3 * 6 content bytes + 2 separators
        assert_eq!(doc.len(), 20);
        assert_eq!(doc.text(), "Line 1\nLine 2\nLine 3");
    }

    #[test]
    fn test_length_matches_text_length() {
        let ids = SeqIds::new();
        for contents in [&["a"][..], &["a", ""][..], &["", "", ""][..], &["ab", "c"][..]] {
            let doc = doc_of(contents, &ids);
            assert_eq!(doc.len(), doc.text().len(), "contents: {contents:?}");
        }
    }

    #[test]
    fn test_with_blocks_bumps_version_and_keeps_definitions() {
        let ids = SeqIds::new();
        let doc = doc_of(&["hello"], &ids);
        let next = doc.with_blocks(doc.blocks.clone());

        assert_eq!(next.version, doc.version + 1);
        assert_eq!(next.style_definitions, doc.style_definitions);
        // The original is untouched
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn test_default_definitions_cover_markdown_tags() {
        let defs = default_style_definitions();
        for tag in ["bold", "italic", "code", "strikethrough", "underline"] {
            assert!(defs.contains_key(tag), "missing definition for {tag}");
        }
    }
}
