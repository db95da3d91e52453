use std::collections::BTreeMap;

use crate::model::block::{Block, BlockType};
use crate::model::document::BlockDocument;
use crate::model::style::Style;

/// Symbolic tags in nesting order, outermost first. Code nests innermost so
/// its delimiters never contain other live delimiters.
const NESTING_ORDER: &[&str] = &["bold", "italic", "strikethrough", "underline", "code"];

fn delimiters_for(tag: &str) -> Option<(&'static str, &'static str)> {
    match tag {
        "bold" => Some(("**", "**")),
        "italic" => Some(("*", "*")),
        "strikethrough" => Some(("~~", "~~")),
        // Underline has no Markdown form; fall back to inline markup
        "underline" => Some(("<u>", "</u>")),
        "code" => Some(("`", "`")),
        _ => None,
    }
}

/// Serializes a document back to Markdown.
///
/// Inline styles are recovered by comparing each segment's raw style against
/// the document's symbolic definitions; attributes with no Markdown form
/// (color, font size) are silently dropped. Numbered items are renumbered
/// from 1 per consecutive run.
pub fn to_markdown(doc: &BlockDocument) -> String {
    let mut out = String::new();
    let mut numbered_run = 0;

    for (index, block) in doc.blocks.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        numbered_run = match block.block_type {
            BlockType::NumberedList => numbered_run + 1,
            _ => 0,
        };

        match block.block_type {
            BlockType::Paragraph => out.push_str(&inline_markdown(block, &doc.style_definitions)),
            BlockType::Heading1 => {
                out.push_str("# ");
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::Heading2 => {
                out.push_str("## ");
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::Heading3 => {
                out.push_str("### ");
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::BulletList => {
                out.push_str("- ");
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::NumberedList => {
                out.push_str(&format!("{numbered_run}. "));
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::Blockquote => {
                out.push_str("> ");
                out.push_str(&inline_markdown(block, &doc.style_definitions));
            }
            BlockType::CodeBlock => {
                out.push_str("```\n");
                out.push_str(&block.content);
                out.push_str("\n```");
            }
        }
    }
    out
}

/// Recovers the per-tag coverage intervals for a block: a tag covers a range
/// when some segment's style carries all of that tag's attributes.
fn tag_intervals(block: &Block, definitions: &BTreeMap<String, Style>) -> Vec<(usize, Vec<(usize, usize)>)> {
    let mut per_tag = Vec::new();
    for (order, tag) in NESTING_ORDER.iter().enumerate() {
        let Some(definition) = definitions.get(*tag) else {
            continue;
        };
        let mut intervals: Vec<(usize, usize)> = block
            .styles
            .iter()
            .filter(|seg| !seg.is_empty() && seg.end <= block.content.len())
            .filter(|seg| seg.style.contains(definition))
            .map(|seg| (seg.start, seg.end))
            .collect();
        if intervals.is_empty() {
            continue;
        }
        intervals.sort_unstable();
        // Union overlapping or abutting intervals of the same tag
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        per_tag.push((order, merged));
    }
    per_tag
}

/// Emits a block's content with style delimiters re-inserted.
///
/// Walks the boundary positions of all recovered tag intervals; at each
/// boundary closing delimiters are emitted before opening ones, and the open
/// stack is kept in the fixed nesting order so overlapping styles serialize
/// to syntactically valid nested delimiters.
fn inline_markdown(block: &Block, definitions: &BTreeMap<String, Style>) -> String {
    let content = &block.content;
    let per_tag = tag_intervals(block, definitions);
    if per_tag.is_empty() {
        return escape_markdown(content);
    }

    let mut boundaries: Vec<usize> = vec![0, content.len()];
    for (_, intervals) in &per_tag {
        for &(start, end) in intervals {
            boundaries.push(start);
            boundaries.push(end);
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let covers = |order: usize, lo: usize, hi: usize| -> bool {
        per_tag
            .iter()
            .find(|(o, _)| *o == order)
            .is_some_and(|(_, intervals)| {
                intervals.iter().any(|&(s, e)| s <= lo && e >= hi)
            })
    };

    let mut out = String::with_capacity(content.len() * 2);
    let mut stack: Vec<usize> = Vec::new();

    for window in boundaries.windows(2) {
        let (lo, hi) = (window[0], window[1]);
        if lo >= hi {
            continue;
        }

        // Desired open tags for this interval, outermost-first
        let desired: Vec<usize> = (0..NESTING_ORDER.len())
            .filter(|order| covers(*order, lo, hi))
            .collect();

        // Close down to the common prefix, then open the rest
        let keep = stack
            .iter()
            .zip(desired.iter())
            .take_while(|(a, b)| a == b)
            .count();
        while stack.len() > keep {
            if let Some(order) = stack.pop()
                && let Some((_, close)) = delimiters_for(NESTING_ORDER[order])
            {
                out.push_str(close);
            }
        }
        for order in &desired[keep..] {
            if let Some((open, _)) = delimiters_for(NESTING_ORDER[*order]) {
                out.push_str(open);
            }
            stack.push(*order);
        }

        let raw = stack.iter().any(|order| NESTING_ORDER[*order] == "code");
        if raw {
            out.push_str(&content[lo..hi]);
        } else {
            out.push_str(&escape_markdown(&content[lo..hi]));
        }
    }

    while let Some(order) = stack.pop() {
        if let Some((_, close)) = delimiters_for(NESTING_ORDER[order]) {
            out.push_str(close);
        }
    }
    out
}

/// Backslash-escapes characters the inline parser treats as delimiters.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '~' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
