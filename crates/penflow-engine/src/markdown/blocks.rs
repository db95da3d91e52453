use std::sync::OnceLock;

use regex::Regex;

use crate::model::block::BlockType;

fn numbered_item_regex() -> &'static Regex {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    NUMBERED.get_or_init(|| Regex::new(r"^\d+\. ").expect("Invalid numbered item regex"))
}

/// Classifies a line by its Markdown prefix, returning the block type and the
/// content with the prefix stripped.
///
/// Patterns are tried in a fixed order (headings, bullets, numbered items,
/// blockquote); anything unmatched is a paragraph. Code fences are not
/// handled here; the parse loop owns fence state.
pub fn detect_block_type(line: &str) -> (BlockType, &str) {
    if let Some(rest) = line.strip_prefix("# ") {
        return (BlockType::Heading1, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return (BlockType::Heading2, rest);
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return (BlockType::Heading3, rest);
    }
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return (BlockType::BulletList, rest);
        }
    }
    if let Some(matched) = numbered_item_regex().find(line) {
        return (BlockType::NumberedList, &line[matched.end()..]);
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return (BlockType::Blockquote, rest);
    }
    (BlockType::Paragraph, line)
}

/// True for a code fence open/close line.
pub fn is_fence_line(line: &str) -> bool {
    line.trim_end().starts_with("```")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", BlockType::Heading1, "Title")]
    #[case("## Sub", BlockType::Heading2, "Sub")]
    #[case("### Deep", BlockType::Heading3, "Deep")]
    #[case("- bullet", BlockType::BulletList, "bullet")]
    #[case("* star", BlockType::BulletList, "star")]
    #[case("+ plus", BlockType::BulletList, "plus")]
    #[case("1. first", BlockType::NumberedList, "first")]
    #[case("42. forty-second", BlockType::NumberedList, "forty-second")]
    #[case("> quoted", BlockType::Blockquote, "quoted")]
    #[case("plain text", BlockType::Paragraph, "plain text")]
    fn test_detect_block_type(
        #[case] line: &str,
        #[case] expected_type: BlockType,
        #[case] expected_content: &str,
    ) {
        let (block_type, content) = detect_block_type(line);
        assert_eq!(block_type, expected_type);
        assert_eq!(content, expected_content);
    }

    #[rstest]
    // Prefix without the trailing space is not a match
    #[case("#Title")]
    #[case("-bullet")]
    #[case("1.first")]
    #[case(">quoted")]
    // Deeper headings than 3 are not supported block types
    #[case("#### Too deep")]
    fn test_near_miss_prefixes_are_paragraphs(#[case] line: &str) {
        let (block_type, content) = detect_block_type(line);
        assert_eq!(block_type, BlockType::Paragraph);
        assert_eq!(content, line);
    }

    #[test]
    fn test_fence_detection() {
        assert!(is_fence_line("```"));
        assert!(is_fence_line("```rust"));
        assert!(is_fence_line("``` "));
        assert!(!is_fence_line("`` not a fence"));
        assert!(!is_fence_line("text ```"));
    }
}
