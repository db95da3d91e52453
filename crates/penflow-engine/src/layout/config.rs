use serde::{Deserialize, Serialize};

use crate::model::block::BlockType;
use crate::model::document::BlockDocument;

/// Geometry supplied by the embedding surface, consumed read-only by the
/// layout builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub padding_left: f32,
    pub padding_top: f32,
    pub base_line_height: f32,
    /// Prefer word boundaries when wrapping; character wrap otherwise.
    pub word_wrap: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding_left: 0.0,
            padding_top: 0.0,
            base_line_height: 21.0,
            word_wrap: true,
        }
    }
}

/// Per-block-type visual weighting. A document can override these through
/// `BlockDocument::block_type_styles`; everything else falls back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTypeStyle {
    pub font_size_multiplier: f32,
    pub indentation: f32,
    pub left_border: Option<f32>,
    pub background_color: Option<String>,
}

impl Default for BlockTypeStyle {
    fn default() -> Self {
        Self {
            font_size_multiplier: 1.0,
            indentation: 0.0,
            left_border: None,
            background_color: None,
        }
    }
}

/// Built-in visual weighting per block type.
pub fn default_block_type_style(block_type: BlockType) -> BlockTypeStyle {
    match block_type {
        BlockType::Heading1 => BlockTypeStyle {
            font_size_multiplier: 1.5,
            ..BlockTypeStyle::default()
        },
        BlockType::Heading2 => BlockTypeStyle {
            font_size_multiplier: 1.4,
            ..BlockTypeStyle::default()
        },
        BlockType::Heading3 => BlockTypeStyle {
            font_size_multiplier: 1.3,
            ..BlockTypeStyle::default()
        },
        BlockType::BulletList | BlockType::NumberedList => BlockTypeStyle {
            indentation: 24.0,
            ..BlockTypeStyle::default()
        },
        BlockType::Blockquote => BlockTypeStyle {
            indentation: 12.0,
            left_border: Some(3.0),
            ..BlockTypeStyle::default()
        },
        BlockType::CodeBlock => BlockTypeStyle {
            background_color: Some("#f5f5f5".to_string()),
            ..BlockTypeStyle::default()
        },
        BlockType::Paragraph => BlockTypeStyle::default(),
    }
}

/// A block type's effective style: the document override when present,
/// otherwise the built-in default.
pub(crate) fn resolve_block_type_style(doc: &BlockDocument, block_type: BlockType) -> BlockTypeStyle {
    doc.block_type_styles
        .get(&block_type)
        .cloned()
        .unwrap_or_else(|| default_block_type_style(block_type))
}

/// How the wrap width is derived. The layout index is built once per
/// (document, width, wrap-mode) triple and rebuilt wholesale when any of the
/// three changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WrapMode {
    /// No soft wrapping: one visual line per logical line.
    None,
    /// Fixed column count, measured in representative characters.
    Columns(usize),
    /// Container width minus horizontal padding.
    Container { width: f32 },
}
