// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n## Section\nParagraph with **bold**, *italic* and `code` runs.\n- Bullet point\n- Another item\n1. First\n2. Second\n> A quoted line\n```\nfn example() {\n    println!(\"Hello\");\n}\n```\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn char_measure(text: &str) -> f32 {
    text.chars().count() as f32 * 8.0
}
