use crate::parser::{spans_in_segment, TextSpan};
use anyhow::Result;

/// Parse plain text and extract all words
pub fn parse(content: &str) -> Result<Vec<TextSpan>> {
    let mut spans = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        spans_in_segment(line, line_num, 0, &mut spans);
    }

    Ok(spans)
}
