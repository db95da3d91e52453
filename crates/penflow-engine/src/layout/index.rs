use crate::layout::config::{LayoutOptions, WrapMode, resolve_block_type_style};
use crate::layout::wrap::calculate_line_wrap_points;
use crate::model::document::BlockDocument;

/// Character used to measure one column when wrapping at a fixed column
/// count.
const REPRESENTATIVE_CHAR: char = 'x';

/// One rendered row: a contiguous slice of one block's content with its
/// vertical placement.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLine {
    pub visual_index: usize,
    /// Index of the owning block (the logical line).
    pub logical_line_index: usize,
    /// Slice of the block's content covered by this row, in byte offsets.
    pub start_offset: usize,
    pub end_offset: usize,
    pub y: f32,
    pub height: f32,
    /// True when this row starts at a soft wrap (a continuation row).
    pub is_soft_wrapped: bool,
    /// Position of this row among the owning block's rows.
    pub wrap_index: usize,
}

/// Per-document table of visual lines.
///
/// A derived, disposable cache: built once per (document, width, wrap-mode)
/// triple and rebuilt wholesale when any of the three changes. The two side
/// tables give O(1) logical→visual-start lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapLayoutIndex {
    pub visual_lines: Vec<VisualLine>,
    pub total_height: f32,
    /// Per block: index of its first visual line.
    pub logical_to_visual_start: Vec<usize>,
    /// Per block: how many visual lines it occupies.
    pub visual_lines_per_logical: Vec<usize>,
}

/// Builds the layout index, wrapping each block at the effective width.
///
/// The measurement function is called with arbitrary substrings and must be
/// a pure function of its input; it is expected to return 0 for "".
pub fn build_wrap_layout_index(
    doc: &BlockDocument,
    options: &LayoutOptions,
    wrap_mode: WrapMode,
    measure: &dyn Fn(&str) -> f32,
) -> WrapLayoutIndex {
    let max_width = match wrap_mode {
        WrapMode::None => return build_unwrapped_layout_index(doc, options),
        WrapMode::Columns(columns) => {
            measure(&REPRESENTATIVE_CHAR.to_string().repeat(columns))
        }
        WrapMode::Container { width } => (width - 2.0 * options.padding_left).max(0.0),
    };

    build_index_with(doc, options, |line| {
        calculate_line_wrap_points(line, max_width, options.word_wrap, measure)
            .into_iter()
            .map(|p| p.offset)
            .collect()
    })
}

/// Fast path for disabled wrapping: a trivial 1:1 logical-to-visual mapping
/// that never touches the wrap calculator or the measurement function.
pub fn build_unwrapped_layout_index(doc: &BlockDocument, options: &LayoutOptions) -> WrapLayoutIndex {
    build_index_with(doc, options, |_line| Vec::new())
}

fn build_index_with(
    doc: &BlockDocument,
    options: &LayoutOptions,
    wrap_points: impl Fn(&str) -> Vec<usize>,
) -> WrapLayoutIndex {
    let mut index = WrapLayoutIndex {
        visual_lines: Vec::new(),
        total_height: 0.0,
        logical_to_visual_start: Vec::with_capacity(doc.blocks.len()),
        visual_lines_per_logical: Vec::with_capacity(doc.blocks.len()),
    };
    let mut y = options.padding_top;

    for (block_index, block) in doc.blocks.iter().enumerate() {
        let type_style = resolve_block_type_style(doc, block.block_type);
        let height = options.base_line_height * type_style.font_size_multiplier;

        index.logical_to_visual_start.push(index.visual_lines.len());
        let mut wrap_index = 0;

        // Hard lines inside a block (code blocks carry embedded newlines)
        // each wrap independently.
        let mut hard_start = 0;
        for hard_line in block.content.split('\n') {
            let mut segment_start = 0;
            for (segment_index, segment_end) in wrap_points(hard_line)
                .into_iter()
                .chain([hard_line.len()])
                .enumerate()
            {
                index.visual_lines.push(VisualLine {
                    visual_index: index.visual_lines.len(),
                    logical_line_index: block_index,
                    start_offset: hard_start + segment_start,
                    end_offset: hard_start + segment_end,
                    y,
                    height,
                    is_soft_wrapped: segment_index > 0,
                    wrap_index,
                });
                y += height;
                wrap_index += 1;
                segment_start = segment_end;
            }
            hard_start += hard_line.len() + 1;
        }

        index.visual_lines_per_logical.push(wrap_index);
    }

    index.total_height = y;
    index
}

impl WrapLayoutIndex {
    /// The visual line at vertical position `y`: 0 for anything at or above
    /// the top, the last line for anything at or below the bottom, binary
    /// search in between.
    pub fn find_visual_line_at_y(&self, y: f32) -> usize {
        if self.visual_lines.is_empty() {
            return 0;
        }
        let last = self.visual_lines.len() - 1;
        if y <= 0.0 {
            return 0;
        }
        if y >= self.total_height {
            return last;
        }
        let idx = self.visual_lines.partition_point(|line| line.y <= y);
        idx.saturating_sub(1).min(last)
    }

    /// Converts a (block index, local offset) pair to a (visual line index,
    /// in-row column) pair, scanning only the owning block's rows.
    pub fn logical_to_visual(&self, block_index: usize, local_offset: usize) -> Option<(usize, usize)> {
        let start = *self.logical_to_visual_start.get(block_index)?;
        let count = *self.visual_lines_per_logical.get(block_index)?;
        let rows = &self.visual_lines[start..start + count];

        for (i, row) in rows.iter().enumerate() {
            if local_offset <= row.end_offset || i == count - 1 {
                let clamped = local_offset.clamp(row.start_offset, row.end_offset);
                return Some((start + i, clamped - row.start_offset));
            }
        }
        None
    }

    /// Converts a (visual line index, in-row column) pair back to a
    /// (block index, local offset) pair. Columns past the row clamp to its
    /// end.
    pub fn visual_to_logical(&self, visual_index: usize, column: usize) -> Option<(usize, usize)> {
        let row = self.visual_lines.get(visual_index)?;
        let width = row.end_offset - row.start_offset;
        Some((row.logical_line_index, row.start_offset + column.min(width)))
    }
}
