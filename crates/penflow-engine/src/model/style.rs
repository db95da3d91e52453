use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presentation attribute keys a style can carry.
///
/// The set is closed so styles stay comparable; values are free-form strings
/// ("bold", "#ff0000", "1.25", a font family name, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleAttr {
    FontWeight,
    FontStyle,
    TextDecoration,
    FontFamily,
    FontSize,
    Color,
}

/// An open map of presentation attributes.
///
/// Backed by a `BTreeMap` so two styles with the same attributes compare and
/// hash identically regardless of construction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Style {
    attrs: BTreeMap<StyleAttr, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, attr: StyleAttr, value: impl Into<String>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }

    pub fn bold() -> Self {
        Self::new().with(StyleAttr::FontWeight, "bold")
    }

    pub fn italic() -> Self {
        Self::new().with(StyleAttr::FontStyle, "italic")
    }

    pub fn code() -> Self {
        Self::new().with(StyleAttr::FontFamily, "monospace")
    }

    pub fn strikethrough() -> Self {
        Self::new().with(StyleAttr::TextDecoration, "line-through")
    }

    pub fn underline() -> Self {
        Self::new().with(StyleAttr::TextDecoration, "underline")
    }

    pub fn get(&self, attr: StyleAttr) -> Option<&str> {
        self.attrs.get(&attr).map(String::as_str)
    }

    pub fn set(&mut self, attr: StyleAttr, value: impl Into<String>) {
        self.attrs.insert(attr, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleAttr, &str)> {
        self.attrs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// True when every attribute of `other` is present here with the same value.
    pub fn contains(&self, other: &Style) -> bool {
        other
            .attrs
            .iter()
            .all(|(k, v)| self.attrs.get(k) == Some(v))
    }

    /// Returns a new style with `over`'s attributes layered on top of this one.
    ///
    /// On attribute collision `over` wins.
    pub fn merged_with(&self, over: &Style) -> Style {
        let mut attrs = self.attrs.clone();
        for (k, v) in &over.attrs {
            attrs.insert(*k, v.clone());
        }
        Style { attrs }
    }
}

/// A half-open range `[start, end)` over a block's content, with the style
/// applied to that range.
///
/// Offsets are byte offsets into the block's UTF-8 content and always fall on
/// `char` boundaries. Segments may overlap at rest; overlap is resolved when
/// flattening for a renderer, not forbidden in the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSegment {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl StyleSegment {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Segment moved right by `amount`.
    pub fn shifted_right(&self, amount: usize) -> Self {
        Self::new(self.start + amount, self.end + amount, self.style.clone())
    }

    /// Segment moved left by `amount` (saturating at zero).
    pub fn shifted_left(&self, amount: usize) -> Self {
        Self::new(
            self.start.saturating_sub(amount),
            self.end.saturating_sub(amount),
            self.style.clone(),
        )
    }
}

/// Collapses possibly-overlapping segments into a sorted, non-overlapping,
/// coalesced list.
///
/// Each input carries a priority; at every sub-interval the covering segments'
/// attributes are unioned with higher priority winning on collision. Equal
/// priorities resolve by input order (later wins). Sub-intervals that end up
/// with no attributes are omitted, and adjacent sub-intervals with identical
/// merged styles are coalesced into one segment.
pub(crate) fn merge_segment_layers(layers: &[(StyleSegment, i32)]) -> Vec<StyleSegment> {
    let mut boundaries: Vec<usize> = Vec::with_capacity(layers.len() * 2);
    for (seg, _) in layers {
        if !seg.is_empty() {
            boundaries.push(seg.start);
            boundaries.push(seg.end);
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut out: Vec<StyleSegment> = Vec::new();
    for window in boundaries.windows(2) {
        let (lo, hi) = (window[0], window[1]);

        // Covering segments in ascending priority, stable by input order, so
        // that later merges override earlier ones.
        let mut covering: Vec<&(StyleSegment, i32)> = layers
            .iter()
            .filter(|(seg, _)| seg.start <= lo && seg.end >= hi && !seg.is_empty())
            .collect();
        covering.sort_by_key(|(_, priority)| *priority);

        let mut merged = Style::new();
        for (seg, _) in covering {
            merged = merged.merged_with(&seg.style);
        }
        if merged.is_empty() {
            continue;
        }

        match out.last_mut() {
            Some(prev) if prev.end == lo && prev.style == merged => prev.end = hi,
            _ => out.push(StyleSegment::new(lo, hi, merged)),
        }
    }
    out
}
