//! Soft line-wrapping and the visual-line index.
//!
//! The wrap calculator is a pure break-point search over a caller-supplied
//! measurement function; the index applies it block-by-block to answer
//! "which visual line is at pixel Y" and to convert between logical
//! (block, offset) and visual (row, column) coordinates in sub-linear time.

pub mod config;
pub mod index;
pub mod wrap;

pub use config::{BlockTypeStyle, LayoutOptions, WrapMode, default_block_type_style};
pub use index::{VisualLine, WrapLayoutIndex, build_unwrapped_layout_index, build_wrap_layout_index};
pub use wrap::{WrapPoint, calculate_line_wrap_points, find_wrap_position, is_word_break_point};
