pub mod editing;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod styled;

// Re-export key types for easier usage
pub use editing::{BlockAddress, PointDescription, locate_offset, to_global_segments};
pub use layout::{
    LayoutOptions, WrapLayoutIndex, WrapMode, build_unwrapped_layout_index, build_wrap_layout_index,
};
pub use markdown::{InlineLimits, parse_inline, parse_markdown, to_markdown};
pub use model::{
    Block, BlockDocument, BlockId, BlockType, IdGen, SeqIds, Style, StyleAttr, StyleSegment, UuidIds,
};
pub use styled::{OverlayLayer, StyledDocument, StyledNode, Tag};
