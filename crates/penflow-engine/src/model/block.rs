use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::style::StyleSegment;

/// Process-unique opaque identifier for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Injected capability for generating fresh block ids.
///
/// Edit operations that create blocks (split, multi-line insert, parse) take
/// an `&dyn IdGen` so id generation is swappable and deterministic in tests.
pub trait IdGen {
    fn fresh(&self) -> BlockId;
}

/// Production id source: random UUID v4 per block.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGen for UuidIds {
    fn fresh(&self) -> BlockId {
        BlockId(Uuid::new_v4())
    }
}

/// Deterministic id source for tests: a simple incrementing counter.
#[derive(Debug, Default)]
pub struct SeqIds {
    next: AtomicU64,
}

impl SeqIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SeqIds {
    fn fresh(&self) -> BlockId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        BlockId(Uuid::from_u128(n as u128))
    }
}

/// Block type tag, determining prefix syntax in Markdown and visual weighting
/// in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Blockquote,
    CodeBlock,
}

impl BlockType {
    /// The kebab-case tag used in serialized form and in type-style maps.
    pub fn as_tag(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading-1",
            BlockType::Heading2 => "heading-2",
            BlockType::Heading3 => "heading-3",
            BlockType::BulletList => "bullet-list",
            BlockType::NumberedList => "numbered-list",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletList | BlockType::NumberedList)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Error returned when a block type tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type tag: {tag:?}")]
pub struct ParseBlockTypeError {
    pub tag: String,
}

impl FromStr for BlockType {
    type Err = ParseBlockTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(BlockType::Paragraph),
            "heading-1" => Ok(BlockType::Heading1),
            "heading-2" => Ok(BlockType::Heading2),
            "heading-3" => Ok(BlockType::Heading3),
            "bullet-list" => Ok(BlockType::BulletList),
            "numbered-list" => Ok(BlockType::NumberedList),
            "blockquote" => Ok(BlockType::Blockquote),
            "code-block" => Ok(BlockType::CodeBlock),
            other => Err(ParseBlockTypeError {
                tag: other.to_string(),
            }),
        }
    }
}

/// One independently addressable unit of document content.
///
/// `content` is the block's raw text with no Markdown delimiters; `styles`
/// are ranges scoped to `content`. Invariant: every segment's `end` is at
/// most `content.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    pub content: String,
    pub styles: Vec<StyleSegment>,
}

impl Block {
    pub fn new(id: BlockId, block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            id,
            block_type,
            content: content.into(),
            styles: Vec::new(),
        }
    }

    pub fn with_styles(mut self, styles: Vec<StyleSegment>) -> Self {
        self.styles = styles;
        self
    }

    /// Fresh empty paragraph, the substitute used when an edit would
    /// otherwise leave a document with no blocks.
    pub fn empty_paragraph(ids: &dyn IdGen) -> Self {
        Self::new(ids.fresh(), BlockType::Paragraph, "")
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
