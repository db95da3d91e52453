/// A soft break position within one line's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapPoint {
    pub offset: usize,
    pub is_soft_wrap: bool,
}

/// CJK ranges where a line may break at any inter-character boundary.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // CJK punctuation
        | '\u{3040}'..='\u{30FF}' // Hiragana, Katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
        | '\u{FF00}'..='\u{FFEF}' // Fullwidth forms
    )
}

/// True when a line may break at `offset`: at either line edge, after
/// whitespace or punctuation, or on either side of a CJK character.
pub fn is_word_break_point(line: &str, offset: usize) -> bool {
    if offset == 0 || offset >= line.len() {
        return true;
    }
    if !line.is_char_boundary(offset) {
        return false;
    }
    let before = line[..offset].chars().next_back();
    let after = line[offset..].chars().next();
    match (before, after) {
        (Some(b), Some(a)) => {
            b.is_whitespace() || b.is_ascii_punctuation() || is_cjk(b) || is_cjk(a)
        }
        _ => true,
    }
}

/// Finds the next break offset after `start`, or `None` when the remaining
/// text already fits `max_width`.
///
/// Binary-searches the measurement function for the longest fitting prefix,
/// always advancing at least one character so ultra-narrow widths cannot
/// loop forever. With `word_wrap`, scans backward from the fitted position
/// for the nearest word-break point, falling back to the raw character
/// boundary when an unbroken token offers none.
pub fn find_wrap_position(
    line: &str,
    start: usize,
    max_width: f32,
    word_wrap: bool,
    measure: &dyn Fn(&str) -> f32,
) -> Option<usize> {
    if start >= line.len() || !line.is_char_boundary(start) {
        return None;
    }
    let rest = &line[start..];
    if measure(rest) <= max_width {
        return None;
    }

    // Prefix end positions: one per character of the remainder.
    let boundaries: Vec<usize> = rest
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain([rest.len()])
        .collect();

    // Count of prefixes that fit (monotone in the prefix length).
    let mut lo = 0;
    let mut hi = boundaries.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        if measure(&rest[..boundaries[mid]]) <= max_width {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    // Force one character of progress even when nothing fits.
    let mut break_at = if lo == 0 { boundaries[0] } else { boundaries[lo - 1] };
    if break_at >= rest.len() {
        // The forced advance consumed the whole remainder: nothing to split
        return None;
    }

    if word_wrap {
        let mut candidate = break_at;
        while candidate > 0 {
            if rest.is_char_boundary(candidate) && is_word_break_point(rest, candidate) {
                break_at = candidate;
                break;
            }
            candidate -= 1;
        }
    }

    Some(start + break_at)
}

/// Every soft break for one line, in order. Empty when the line already fits.
pub fn calculate_line_wrap_points(
    line: &str,
    max_width: f32,
    word_wrap: bool,
    measure: &dyn Fn(&str) -> f32,
) -> Vec<WrapPoint> {
    let mut points = Vec::new();
    let mut start = 0;
    while let Some(offset) = find_wrap_position(line, start, max_width, word_wrap, measure) {
        if offset <= start {
            break;
        }
        points.push(WrapPoint {
            offset,
            is_soft_wrap: true,
        });
        start = offset;
    }
    points
}
