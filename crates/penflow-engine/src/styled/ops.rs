use crate::styled::node::{StyledDocument, StyledElement, StyledNode, Tag};

/// Inserts `text` at `offset` within the subtree.
///
/// Recursion descends into the child whose accumulated-length range contains
/// the offset; a tie at a child boundary goes to the earlier child, so
/// trailing insertion lands inside the final child rather than outside it.
/// Offsets past the subtree or off a `char` boundary are a no-op.
pub fn insert_text_into_node(node: &StyledNode, offset: usize, text: &str) -> StyledNode {
    if text.is_empty() || offset > node.len() {
        return node.clone();
    }

    match node {
        StyledNode::Text(s) => {
            if !s.is_char_boundary(offset) {
                return node.clone();
            }
            let mut out = String::with_capacity(s.len() + text.len());
            out.push_str(&s[..offset]);
            out.push_str(text);
            out.push_str(&s[offset..]);
            StyledNode::Text(out)
        }
        StyledNode::Element(el) => {
            if el.children.is_empty() {
                return StyledNode::element(el.tag.clone(), vec![StyledNode::text(text)]);
            }
            let mut children = Vec::with_capacity(el.children.len());
            let mut acc = 0;
            let mut inserted = false;
            for child in &el.children {
                let child_len = child.len();
                if !inserted && offset <= acc + child_len {
                    children.push(insert_text_into_node(child, offset - acc, text));
                    inserted = true;
                } else {
                    children.push(child.clone());
                }
                acc += child_len;
            }
            StyledNode::element(el.tag.clone(), children)
        }
    }
}

/// Deletes `[start, end)` from the subtree.
///
/// Returns `None` when the node becomes empty (emptied elements disappear
/// rather than lingering as zero-length wrappers); adjacent text nodes
/// produced by the recursion are merged to avoid fragmenting the
/// representation. Degenerate ranges are a no-op.
pub fn delete_range_from_node(node: &StyledNode, start: usize, end: usize) -> Option<StyledNode> {
    let end = end.min(node.len());
    if start >= end {
        return Some(node.clone());
    }

    match node {
        StyledNode::Text(s) => {
            if !s.is_char_boundary(start) || !s.is_char_boundary(end) {
                return Some(node.clone());
            }
            let mut out = String::with_capacity(s.len() - (end - start));
            out.push_str(&s[..start]);
            out.push_str(&s[end..]);
            if out.is_empty() {
                None
            } else {
                Some(StyledNode::Text(out))
            }
        }
        StyledNode::Element(el) => {
            let mut children = Vec::with_capacity(el.children.len());
            let mut acc = 0;
            for child in &el.children {
                let child_len = child.len();
                let overlaps = start < acc + child_len && end > acc;
                if overlaps {
                    let local_start = start.saturating_sub(acc);
                    let local_end = (end - acc).min(child_len);
                    if let Some(kept) = delete_range_from_node(child, local_start, local_end) {
                        children.push(kept);
                    }
                } else {
                    children.push(child.clone());
                }
                acc += child_len;
            }
            let children = merge_adjacent_text_nodes(children);
            if children.is_empty() && !matches!(el.tag, Tag::Root) {
                None
            } else {
                Some(StyledNode::element(el.tag.clone(), children))
            }
        }
    }
}

/// Fuses runs of consecutive `Text` nodes into single nodes.
pub fn merge_adjacent_text_nodes(children: Vec<StyledNode>) -> Vec<StyledNode> {
    let mut out: Vec<StyledNode> = Vec::with_capacity(children.len());
    for child in children {
        match (out.last_mut(), &child) {
            (Some(StyledNode::Text(prev)), StyledNode::Text(next)) => prev.push_str(next),
            _ => out.push(child),
        }
    }
    out
}

/// Applies `tag` to `[start, end)` of the subtree.
///
/// A tag landing on a sub-range of a text node splits it into up to three
/// siblings (before / tagged middle / after) returned inside a `Fragment`
/// element; parents splice fragment children into their own child list, so
/// the rewrite composes through recursion without nesting single-child
/// wrappers. Degenerate ranges are a no-op.
pub fn wrap_range_in_node(node: &StyledNode, start: usize, end: usize, tag: &str) -> StyledNode {
    let end = end.min(node.len());
    if start >= end {
        return node.clone();
    }

    match node {
        StyledNode::Text(s) => {
            if !s.is_char_boundary(start) || !s.is_char_boundary(end) {
                return node.clone();
            }
            let mut parts = Vec::with_capacity(3);
            if start > 0 {
                parts.push(StyledNode::text(&s[..start]));
            }
            parts.push(StyledNode::element(
                Tag::named(tag),
                vec![StyledNode::text(&s[start..end])],
            ));
            if end < s.len() {
                parts.push(StyledNode::text(&s[end..]));
            }
            StyledNode::element(Tag::Fragment, parts)
        }
        StyledNode::Element(el) => {
            let mut children = Vec::with_capacity(el.children.len());
            let mut acc = 0;
            for child in &el.children {
                let child_len = child.len();
                let overlaps = start < acc + child_len && end > acc;
                if overlaps {
                    let local_start = start.saturating_sub(acc);
                    let local_end = (end - acc).min(child_len);
                    let rewritten = wrap_range_in_node(child, local_start, local_end, tag);
                    match rewritten {
                        StyledNode::Element(StyledElement {
                            tag: Tag::Fragment,
                            children: parts,
                        }) => children.extend(parts),
                        other => children.push(other),
                    }
                } else {
                    children.push(child.clone());
                }
                acc += child_len;
            }
            StyledNode::element(el.tag.clone(), children)
        }
    }
}

/// Removes every element with the given tag from the subtree, splicing its
/// children into the parent. The node itself, if tagged, comes back as a
/// `Fragment` for the caller to splice.
pub fn unwrap_tag_in_node(node: &StyledNode, tag: &str) -> StyledNode {
    match node {
        StyledNode::Text(_) => node.clone(),
        StyledNode::Element(el) => {
            let mut children = Vec::with_capacity(el.children.len());
            for child in &el.children {
                let rewritten = unwrap_tag_in_node(child, tag);
                match rewritten {
                    StyledNode::Element(StyledElement {
                        tag: Tag::Fragment,
                        children: parts,
                    }) => children.extend(parts),
                    other => children.push(other),
                }
            }
            let children = merge_adjacent_text_nodes(children);
            if el.tag.is_named(tag) {
                StyledNode::element(Tag::Fragment, children)
            } else {
                StyledNode::element(el.tag.clone(), children)
            }
        }
    }
}

/// Returns the subtree covering `[start, end)` without mutating the source;
/// used for copy-style operations. `None` when the range selects nothing.
pub fn extract_range(node: &StyledNode, start: usize, end: usize) -> Option<StyledNode> {
    let end = end.min(node.len());
    if start >= end {
        return None;
    }

    match node {
        StyledNode::Text(s) => {
            if !s.is_char_boundary(start) || !s.is_char_boundary(end) {
                return None;
            }
            Some(StyledNode::text(&s[start..end]))
        }
        StyledNode::Element(el) => {
            let mut children = Vec::new();
            let mut acc = 0;
            for child in &el.children {
                let child_len = child.len();
                let overlaps = start < acc + child_len && end > acc;
                if overlaps {
                    let local_start = start.saturating_sub(acc);
                    let local_end = (end - acc).min(child_len);
                    if let Some(extracted) = extract_range(child, local_start, local_end) {
                        children.push(extracted);
                    }
                }
                acc += child_len;
            }
            if children.is_empty() {
                None
            } else {
                Some(StyledNode::element(el.tag.clone(), children))
            }
        }
    }
}

impl StyledDocument {
    /// New document with `text` inserted at `offset`.
    pub fn insert_text(&self, offset: usize, text: &str) -> StyledDocument {
        let mut next = self.clone();
        next.content = insert_text_into_node(&self.content, offset, text);
        next
    }

    /// New document with `[start, end)` deleted. The root always survives,
    /// even when emptied.
    pub fn delete_range(&self, start: usize, end: usize) -> StyledDocument {
        let mut next = self.clone();
        next.content = delete_range_from_node(&self.content, start, end)
            .unwrap_or_else(|| StyledNode::element(Tag::Root, Vec::new()));
        next
    }

    /// New document with `tag` applied to `[start, end)`.
    pub fn wrap_range(&self, start: usize, end: usize, tag: &str) -> StyledDocument {
        let mut next = self.clone();
        next.content = wrap_range_in_node(&self.content, start, end, tag);
        next
    }

    /// New document with every `tag` element removed (children spliced up).
    pub fn unwrap_tag(&self, tag: &str) -> StyledDocument {
        let mut next = self.clone();
        next.content = unwrap_tag_in_node(&self.content, tag);
        next
    }

    /// The subtree covering `[start, end)`, if any.
    pub fn extract_range(&self, start: usize, end: usize) -> Option<StyledNode> {
        extract_range(&self.content, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc(children: Vec<StyledNode>) -> StyledDocument {
        StyledDocument::new(children, BTreeMap::new())
    }

    // ============ insert_text_into_node tests ============

    #[test]
    fn test_insert_descends_to_owning_child() {
        let d = doc(vec![
            StyledNode::text("ab"),
            StyledNode::element(Tag::named("bold"), vec![StyledNode::text("cd")]),
        ]);

        let result = d.insert_text(3, "X");

        assert_eq!(result.text(), "abcXd");
        // The insertion landed inside the bold element, not beside it
        match &result.content {
            StyledNode::Element(root) => match &root.children[1] {
                StyledNode::Element(el) => {
                    assert_eq!(el.children, vec![StyledNode::text("cXd")]);
                }
                other => panic!("expected element, got {other:?}"),
            },
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_boundary_tie_favors_earlier_child() {
        let d = doc(vec![StyledNode::text("ab"), StyledNode::text("cd")]);

        let result = d.insert_text(2, "X");

        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children[0], StyledNode::text("abX"));
                assert_eq!(root.children[1], StyledNode::text("cd"));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_trailing_appends_to_last_child() {
        let d = doc(vec![
            StyledNode::element(Tag::named("em"), vec![StyledNode::text("tail")]),
        ]);

        let result = d.insert_text(4, "!");

        assert_eq!(result.text(), "tail!");
        match &result.content {
            StyledNode::Element(root) => {
                assert!(matches!(root.children[0], StyledNode::Element(_)));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_past_end_is_noop() {
        let d = doc(vec![StyledNode::text("ab")]);
        assert_eq!(d.insert_text(99, "X"), d);
    }

    // ============ delete_range_from_node tests ============

    #[test]
    fn test_delete_within_leaf() {
        let d = doc(vec![StyledNode::text("abcdef")]);

        let result = d.delete_range(2, 4);

        assert_eq!(result.text(), "abef");
    }

    #[test]
    fn test_delete_removes_emptied_element() {
        let d = doc(vec![
            StyledNode::text("ab"),
            StyledNode::element(Tag::named("bold"), vec![StyledNode::text("cd")]),
            StyledNode::text("ef"),
        ]);

        let result = d.delete_range(2, 4);

        assert_eq!(result.text(), "abef");
        // The emptied element is gone and the flanking text nodes fused
        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children, vec![StyledNode::text("abef")]);
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_across_element_boundary() {
        let d = doc(vec![
            StyledNode::text("abc"),
            StyledNode::element(Tag::named("bold"), vec![StyledNode::text("def")]),
        ]);

        let result = d.delete_range(2, 4);

        assert_eq!(result.text(), "abef");
        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children.len(), 2);
                assert_eq!(root.children[0], StyledNode::text("ab"));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_everything_keeps_empty_root() {
        let d = doc(vec![StyledNode::text("abc")]);

        let result = d.delete_range(0, 3);

        assert_eq!(result.len(), 0);
        assert!(matches!(
            &result.content,
            StyledNode::Element(el) if el.tag == Tag::Root && el.children.is_empty()
        ));
    }

    #[test]
    fn test_delete_degenerate_range_is_noop() {
        let d = doc(vec![StyledNode::text("abc")]);
        assert_eq!(d.delete_range(2, 2), d);
        assert_eq!(d.delete_range(5, 2), d);
    }

    // ============ wrap_range tests ============

    #[test]
    fn test_wrap_splits_text_into_three_siblings() {
        let d = doc(vec![StyledNode::text("abcdef")]);

        let result = d.wrap_range(2, 4, "mark");

        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.tag, Tag::Root);
                assert_eq!(
                    root.children,
                    vec![
                        StyledNode::text("ab"),
                        StyledNode::element(Tag::named("mark"), vec![StyledNode::text("cd")]),
                        StyledNode::text("ef"),
                    ]
                );
            }
            other => panic!("expected root element, got {other:?}"),
        }
        assert_eq!(result.text(), "abcdef");
    }

    #[test]
    fn test_wrap_whole_text_has_no_flanking_siblings() {
        let d = doc(vec![StyledNode::text("abc")]);

        let result = d.wrap_range(0, 3, "mark");

        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children.len(), 1);
                assert!(matches!(
                    &root.children[0],
                    StyledNode::Element(el) if el.tag.is_named("mark")
                ));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_wrap_spanning_children_tags_each_part() {
        let d = doc(vec![StyledNode::text("abc"), StyledNode::text("def")]);

        let result = d.wrap_range(1, 5, "mark");

        assert_eq!(result.text(), "abcdef");
        match &result.content {
            StyledNode::Element(root) => {
                // a [bc] [de] f: two tagged runs, no fragment residue
                assert_eq!(root.children.len(), 4);
                assert!(matches!(
                    &root.children[1],
                    StyledNode::Element(el) if el.tag.is_named("mark")
                ));
                assert!(matches!(
                    &root.children[2],
                    StyledNode::Element(el) if el.tag.is_named("mark")
                ));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_no_fragment_tags_survive_wrap() {
        fn assert_no_fragment(node: &StyledNode) {
            if let StyledNode::Element(el) = node {
                assert_ne!(el.tag, Tag::Fragment);
                for child in &el.children {
                    assert_no_fragment(child);
                }
            }
        }

        let d = doc(vec![
            StyledNode::text("abc"),
            StyledNode::element(Tag::named("em"), vec![StyledNode::text("def")]),
            StyledNode::text("ghi"),
        ]);
        let result = d.wrap_range(1, 8, "mark");

        assert_no_fragment(&result.content);
        assert_eq!(result.text(), "abcdefghi");
    }

    // ============ unwrap_tag tests ============

    #[test]
    fn test_unwrap_splices_children_and_merges_text() {
        let d = doc(vec![
            StyledNode::text("ab"),
            StyledNode::element(Tag::named("mark"), vec![StyledNode::text("cd")]),
            StyledNode::text("ef"),
        ]);

        let result = d.unwrap_tag("mark");

        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children, vec![StyledNode::text("abcdef")]);
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_leaves_other_tags_alone() {
        let d = doc(vec![
            StyledNode::element(
                Tag::named("em"),
                vec![StyledNode::element(
                    Tag::named("mark"),
                    vec![StyledNode::text("x")],
                )],
            ),
        ]);

        let result = d.unwrap_tag("mark");

        match &result.content {
            StyledNode::Element(root) => {
                assert!(matches!(
                    &root.children[0],
                    StyledNode::Element(el) if el.tag.is_named("em")
                        && el.children == vec![StyledNode::text("x")]
                ));
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    #[test]
    fn test_wrap_then_unwrap_restores_text_shape() {
        let d = doc(vec![StyledNode::text("abcdef")]);

        let result = d.wrap_range(2, 4, "mark").unwrap_tag("mark");

        match &result.content {
            StyledNode::Element(root) => {
                assert_eq!(root.children, vec![StyledNode::text("abcdef")]);
            }
            other => panic!("expected root element, got {other:?}"),
        }
    }

    // ============ extract_range tests ============

    #[test]
    fn test_extract_returns_subtree_without_mutating() {
        let d = doc(vec![
            StyledNode::text("ab"),
            StyledNode::element(Tag::named("bold"), vec![StyledNode::text("cd")]),
        ]);

        let extracted = d.extract_range(1, 3).expect("range selects content");

        match &extracted {
            StyledNode::Element(root) => {
                assert_eq!(root.children[0], StyledNode::text("b"));
                assert!(matches!(
                    &root.children[1],
                    StyledNode::Element(el) if el.tag.is_named("bold")
                        && el.children == vec![StyledNode::text("c")]
                ));
            }
            other => panic!("expected element, got {other:?}"),
        }
        // Source untouched
        assert_eq!(d.text(), "abcd");
    }

    #[test]
    fn test_extract_empty_range_is_none() {
        let d = doc(vec![StyledNode::text("ab")]);
        assert!(d.extract_range(1, 1).is_none());
        assert!(d.extract_range(5, 9).is_none());
    }

    // ============ merge_adjacent_text_nodes tests ============

    #[test]
    fn test_merge_adjacent_text_nodes_fuses_runs() {
        let merged = merge_adjacent_text_nodes(vec![
            StyledNode::text("a"),
            StyledNode::text("b"),
            StyledNode::element(Tag::named("em"), vec![]),
            StyledNode::text("c"),
        ]);

        assert_eq!(
            merged,
            vec![
                StyledNode::text("ab"),
                StyledNode::element(Tag::named("em"), vec![]),
                StyledNode::text("c"),
            ]
        );
    }
}
