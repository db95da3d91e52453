use crate::model::style::{Style, StyleSegment};

/// Limits bounding the inline parser on pathological input.
///
/// Both caps degrade gracefully: when a cap is hit the remaining text is
/// emitted unstyled rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineLimits {
    /// Cap on delimiter-search iterations per scan.
    pub max_scan_iterations: usize,
    /// Cap on nested-style recursion depth.
    pub max_nesting_depth: usize,
}

impl Default for InlineLimits {
    fn default() -> Self {
        Self {
            max_scan_iterations: 1000,
            max_nesting_depth: 8,
        }
    }
}

/// Single-byte stand-in for a backslash-escaped delimiter character, so the
/// escaped character cannot be mistaken for a live delimiter during matching.
/// Being one byte, substitution and restoration never shift segment offsets.
const ESCAPE_PLACEHOLDER: char = '\u{1}';

/// Characters a backslash can escape.
const ESCAPABLE: &[char] = &['\\', '*', '_', '~', '`'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineStyleKind {
    Bold,
    Italic,
    Code,
    Strikethrough,
    Underline,
}

impl InlineStyleKind {
    fn style(self) -> Style {
        match self {
            InlineStyleKind::Bold => Style::bold(),
            InlineStyleKind::Italic => Style::italic(),
            InlineStyleKind::Code => Style::code(),
            InlineStyleKind::Strikethrough => Style::strikethrough(),
            InlineStyleKind::Underline => Style::underline(),
        }
    }
}

/// One delimiter family. Families are listed in tie-break priority order:
/// at the same start position the earlier family wins, which makes longer
/// delimiters (`***` over `**` over `*`) win their ties.
struct Family {
    open: &'static str,
    close: &'static str,
    styles: &'static [InlineStyleKind],
    /// Raw zone: inner content is never re-scanned for nested delimiters.
    raw: bool,
}

const FAMILIES: &[Family] = &[
    Family { open: "`", close: "`", styles: &[InlineStyleKind::Code], raw: true },
    Family { open: "<u>", close: "</u>", styles: &[InlineStyleKind::Underline], raw: false },
    Family { open: "~~", close: "~~", styles: &[InlineStyleKind::Strikethrough], raw: false },
    Family {
        open: "***",
        close: "***",
        styles: &[InlineStyleKind::Bold, InlineStyleKind::Italic],
        raw: false,
    },
    Family { open: "**", close: "**", styles: &[InlineStyleKind::Bold], raw: false },
    Family { open: "__", close: "__", styles: &[InlineStyleKind::Bold], raw: false },
    Family { open: "*", close: "*", styles: &[InlineStyleKind::Italic], raw: false },
    Family { open: "_", close: "_", styles: &[InlineStyleKind::Italic], raw: false },
];

#[derive(Debug, Clone, Copy)]
struct InlineMatch {
    start: usize,
    end: usize,
    inner_start: usize,
    inner_end: usize,
    family: usize,
}

/// Extracts inline styles from one line of Markdown, returning the
/// de-delimited content and the style segments covering it.
pub fn parse_inline(text: &str) -> (String, Vec<StyleSegment>) {
    parse_inline_with_limits(text, &InlineLimits::default())
}

pub fn parse_inline_with_limits(text: &str, limits: &InlineLimits) -> (String, Vec<StyleSegment>) {
    let (neutralized, saved) = neutralize_escapes(text);
    let (styled, mut segments) = parse_styled(&neutralized, 0, limits);
    segments.sort_by_key(|seg| seg.start);
    (restore_escapes(&styled, &saved), segments)
}

/// Replaces every backslash-escaped delimiter with a placeholder byte,
/// remembering the escaped characters in order. A raw placeholder byte
/// already present in the input claims its own slot so restoration stays
/// aligned.
fn neutralize_escapes(text: &str) -> (String, Vec<char>) {
    let mut out = String::with_capacity(text.len());
    let mut saved = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && ESCAPABLE.contains(&next)
        {
            chars.next();
            out.push(ESCAPE_PLACEHOLDER);
            saved.push(next);
        } else if c == ESCAPE_PLACEHOLDER {
            out.push(ESCAPE_PLACEHOLDER);
            saved.push(ESCAPE_PLACEHOLDER);
        } else {
            out.push(c);
        }
    }
    (out, saved)
}

/// Swaps placeholders back for the characters they stood in for. Delimiter
/// stripping only removes delimiter bytes, so placeholders survive to the
/// output in their original order.
fn restore_escapes(text: &str, saved: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut queue = saved.iter();
    for c in text.chars() {
        if c == ESCAPE_PLACEHOLDER {
            out.push(*queue.next().unwrap_or(&c));
        } else {
            out.push(c);
        }
    }
    out
}

/// One left-to-right styling pass: repeatedly takes the earliest delimiter
/// match, emits the text before it, recurses into the matched inner content
/// (except raw zones), and continues after the match.
fn parse_styled(text: &str, depth: usize, limits: &InlineLimits) -> (String, Vec<StyleSegment>) {
    let mut out = String::with_capacity(text.len());
    let mut segments = Vec::new();
    let mut cursor = 0;

    let mut guard = 0;
    while guard < limits.max_scan_iterations {
        guard += 1;
        let Some(m) = next_match(text, cursor, limits) else {
            break;
        };
        let family = &FAMILIES[m.family];

        out.push_str(&text[cursor..m.start]);
        let inner = &text[m.inner_start..m.inner_end];
        let emitted_at = out.len();

        if family.raw || depth + 1 >= limits.max_nesting_depth {
            out.push_str(inner);
        } else {
            let (inner_text, inner_segments) = parse_styled(inner, depth + 1, limits);
            out.push_str(&inner_text);
            for seg in inner_segments {
                segments.push(seg.shifted_right(emitted_at));
            }
        }

        for kind in family.styles {
            segments.push(StyleSegment::new(emitted_at, out.len(), kind.style()));
        }
        cursor = m.end;
    }

    out.push_str(&text[cursor..]);
    (out, segments)
}

/// The earliest match at or after `from` across all families; at the same
/// start position the earlier family in `FAMILIES` wins.
fn next_match(text: &str, from: usize, limits: &InlineLimits) -> Option<InlineMatch> {
    let mut best: Option<InlineMatch> = None;
    for (index, family) in FAMILIES.iter().enumerate() {
        if let Some(m) = scan_family(text, from, index, family, limits) {
            let better = match best {
                None => true,
                Some(b) => m.start < b.start,
            };
            if better {
                best = Some(m);
            }
        }
    }
    best
}

/// First open/close pairing of one family at or after `from`, with a
/// non-empty inner span. Empty pairings ("**" seen by the "*" family) skip
/// ahead and retry, bounded by the scan iteration cap.
fn scan_family(
    text: &str,
    from: usize,
    index: usize,
    family: &Family,
    limits: &InlineLimits,
) -> Option<InlineMatch> {
    let mut from = from;
    let mut guard = 0;
    while guard < limits.max_scan_iterations {
        guard += 1;

        let open_at = from + text.get(from..)?.find(family.open)?;
        let inner_start = open_at + family.open.len();
        if inner_start >= text.len() {
            return None;
        }
        let close_at = inner_start + text[inner_start..].find(family.close)?;
        if close_at == inner_start {
            from = inner_start;
            continue;
        }
        return Some(InlineMatch {
            start: open_at,
            end: close_at + family.close.len(),
            inner_start,
            inner_end: close_at,
            family: index,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::style::StyleAttr;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_plain_text_passes_through() {
        let (content, segments) = parse_inline("just plain text");
        assert_eq!(content, "just plain text");
        assert!(segments.is_empty());
    }

    #[test]
    fn test_spec_example_bold_and_italic() {
        let (content, segments) = parse_inline("**bold** and *italic*");

        assert_eq!(content, "bold and italic");
        assert_eq!(
            segments,
            vec![
                StyleSegment::new(0, 4, Style::bold()),
                StyleSegment::new(9, 15, Style::italic()),
            ]
        );
    }

    #[rstest]
    #[case("**bold**", "bold", Style::bold())]
    #[case("__bold__", "bold", Style::bold())]
    #[case("*italic*", "italic", Style::italic())]
    #[case("_italic_", "italic", Style::italic())]
    #[case("`code`", "code", Style::code())]
    #[case("~~gone~~", "gone", Style::strikethrough())]
    #[case("<u>under</u>", "under", Style::underline())]
    fn test_single_delimiter_families(
        #[case] input: &str,
        #[case] expected_content: &str,
        #[case] expected_style: Style,
    ) {
        let (content, segments) = parse_inline(input);
        assert_eq!(content, expected_content);
        assert_eq!(
            segments,
            vec![StyleSegment::new(0, expected_content.len(), expected_style)]
        );
    }

    #[test]
    fn test_bold_italic_combined_marker_coexists() {
        let (content, segments) = parse_inline("***both***");

        assert_eq!(content, "both");
        assert_eq!(
            segments,
            vec![
                StyleSegment::new(0, 4, Style::bold()),
                StyleSegment::new(0, 4, Style::italic()),
            ]
        );
    }

    #[test]
    fn test_nested_italic_inside_bold() {
        let (content, segments) = parse_inline("**bold *inner* bold**");

        assert_eq!(content, "bold inner bold");
        assert_eq!(
            segments,
            vec![
                StyleSegment::new(0, 15, Style::bold()),
                StyleSegment::new(5, 10, Style::italic()),
            ]
        );
    }

    #[test]
    fn test_code_inside_bold_is_nested() {
        let (content, segments) = parse_inline("**a `b` c**");

        assert_eq!(content, "a b c");
        assert_eq!(
            segments,
            vec![
                StyleSegment::new(0, 5, Style::bold()),
                StyleSegment::new(2, 3, Style::code()),
            ]
        );
    }

    #[test]
    fn test_code_span_is_a_raw_zone() {
        let (content, segments) = parse_inline("`**not bold**`");

        assert_eq!(content, "**not bold**");
        assert_eq!(segments, vec![StyleSegment::new(0, 12, Style::code())]);
    }

    #[test]
    fn test_code_span_wins_at_equal_start() {
        // The backtick opens before the asterisk pair completes
        let (content, segments) = parse_inline("`a *b` c*");

        assert_eq!(content, "a *b c*");
        assert_eq!(segments, vec![StyleSegment::new(0, 4, Style::code())]);
    }

    #[test]
    fn test_unclosed_delimiters_stay_literal() {
        for input in ["**unclosed", "*unclosed", "`unclosed", "~~unclosed", "<u>unclosed"] {
            let (content, segments) = parse_inline(input);
            assert_eq!(content, input);
            assert!(segments.is_empty(), "input {input:?}");
        }
    }

    #[test]
    fn test_empty_delimiter_pair_is_not_a_match() {
        let (content, segments) = parse_inline("a ** b");
        assert_eq!(content, "a ** b");
        assert!(segments.is_empty());
    }

    // ============ Escape handling tests ============

    #[test]
    fn test_escaped_delimiter_is_literal() {
        let (content, segments) = parse_inline(r"a \*not italic\* b");

        assert_eq!(content, "a *not italic* b");
        assert!(segments.is_empty());
    }

    #[test]
    fn test_escaped_backslash_then_delimiter() {
        // "\\" is a literal backslash; the asterisks still pair up
        let (content, segments) = parse_inline(r"\\*italic*");

        assert_eq!(content, r"\italic");
        assert_eq!(segments, vec![StyleSegment::new(1, 7, Style::italic())]);
    }

    #[test]
    fn test_escape_inside_styled_range() {
        let (content, segments) = parse_inline(r"**bold \* star**");

        assert_eq!(content, "bold * star");
        assert_eq!(segments, vec![StyleSegment::new(0, 11, Style::bold())]);
    }

    #[test]
    fn test_escape_before_non_delimiter_stays_backslash() {
        let (content, segments) = parse_inline(r"path\to\file");
        assert_eq!(content, r"path\to\file");
        assert!(segments.is_empty());
    }

    // ============ Limit tests ============

    #[test]
    fn test_nesting_depth_cap_emits_inner_text_unstyled() {
        let limits = InlineLimits {
            max_scan_iterations: 1000,
            max_nesting_depth: 1,
        };
        let (content, segments) = parse_inline_with_limits("**bold *inner* bold**", &limits);

        // The outer match still styles; the inner asterisks survive as text
        assert_eq!(content, "bold *inner* bold");
        assert_eq!(segments, vec![StyleSegment::new(0, 17, Style::bold())]);
    }

    #[test]
    fn test_scan_iteration_cap_terminates_on_pathological_input() {
        let limits = InlineLimits {
            max_scan_iterations: 16,
            max_nesting_depth: 8,
        };
        let pathological = "* ".repeat(4000);

        let (content, _segments) = parse_inline_with_limits(&pathological, &limits);
        // Termination with the raw text retained is the contract
        assert!(content.contains('*'));
    }

    #[test]
    fn test_segments_are_sorted_by_start() {
        let (_, segments) = parse_inline("*a* **b** `c` ~~d~~");
        for pair in segments.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn test_mixed_styles_offsets() {
        let (content, segments) = parse_inline("plain **bold** `code` ~~strike~~");

        assert_eq!(content, "plain bold code strike");
        assert_eq!(
            segments,
            vec![
                StyleSegment::new(6, 10, Style::bold()),
                StyleSegment::new(11, 15, Style::code()),
                StyleSegment::new(16, 22, Style::strikethrough()),
            ]
        );
    }

    #[test]
    fn test_multibyte_content_keeps_valid_offsets() {
        let (content, segments) = parse_inline("**héllo** wörld");

        assert_eq!(content, "héllo wörld");
        assert_eq!(segments, vec![StyleSegment::new(0, 6, Style::bold())]);
        assert!(content.is_char_boundary(segments[0].end));
    }

    #[test]
    fn test_style_attr_values_match_definitions() {
        let (_, segments) = parse_inline("**b**");
        assert_eq!(segments[0].style.get(StyleAttr::FontWeight), Some("bold"));
    }
}
