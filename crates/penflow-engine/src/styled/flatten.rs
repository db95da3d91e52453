use std::collections::BTreeMap;

use crate::model::style::{Style, StyleSegment, merge_segment_layers};
use crate::styled::node::{StyledDocument, StyledNode, Tag};

/// Walks one decoration tree, emitting a styled segment per leaf that sits
/// under at least one named tag. Nested tags merge inward: a child's
/// attributes override its ancestors' on collision within the same tree.
fn collect_leaf_segments(
    node: &StyledNode,
    styles: &BTreeMap<String, Style>,
    inherited: &Style,
    offset: &mut usize,
    priority: i32,
    out: &mut Vec<(StyleSegment, i32)>,
) {
    match node {
        StyledNode::Text(s) => {
            if !s.is_empty() && !inherited.is_empty() {
                out.push((
                    StyleSegment::new(*offset, *offset + s.len(), inherited.clone()),
                    priority,
                ));
            }
            *offset += s.len();
        }
        StyledNode::Element(el) => {
            let effective = match &el.tag {
                Tag::Named(name) => match styles.get(name) {
                    Some(style) => inherited.merged_with(style),
                    None => inherited.clone(),
                },
                Tag::Root | Tag::Fragment => inherited.clone(),
            };
            for child in &el.children {
                collect_leaf_segments(child, styles, &effective, offset, priority, out);
            }
        }
    }
}

impl StyledDocument {
    /// Flattens base content and overlays into a sorted, non-overlapping,
    /// coalesced segment list, the sole surface a renderer consumes.
    ///
    /// Content contributes at priority 0; each overlay at its declared
    /// priority. At every sub-interval between segment boundaries the
    /// covering attributes are unioned, higher priority winning on
    /// collision, then identically-styled neighbors are coalesced.
    pub fn to_flat_segments(&self) -> Vec<StyleSegment> {
        let mut layers: Vec<(StyleSegment, i32)> = Vec::new();

        let mut offset = 0;
        collect_leaf_segments(
            &self.content,
            &self.styles,
            &Style::new(),
            &mut offset,
            0,
            &mut layers,
        );

        for overlay in &self.overlays {
            let mut offset = 0;
            collect_leaf_segments(
                &overlay.root,
                &self.styles,
                &Style::new(),
                &mut offset,
                overlay.priority,
                &mut layers,
            );
        }

        merge_segment_layers(&layers)
    }
}
