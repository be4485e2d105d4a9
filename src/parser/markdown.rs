use crate::parser::{spans_in_segment, LineIndex, TextSpan};
use anyhow::Result;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Parse markdown and extract checkable text (skip code blocks, inline code, URLs)
pub fn parse(content: &str) -> Result<Vec<TextSpan>> {
    let index = LineIndex::new(content);
    let mut spans = Vec::new();
    let mut in_code_block = false;

    for (event, range) in Parser::new(content).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) if !in_code_block => {
                let Some(source) = content.get(range.clone()) else {
                    continue;
                };
                // Escapes and entities: the rendered text is not what is in the file.
                if source != &*text {
                    continue;
                }

                let (mut line, mut column) = index.position(range.start);
                for (i, segment) in source.split('\n').enumerate() {
                    if i > 0 {
                        line += 1;
                        column = 0;
                    }
                    spans_in_segment(segment.trim_end_matches('\r'), line, column, &mut spans);
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_parsing() {
        let content = r#"
# Title

This is a test paragraph with some words.

```rust
fn main() {
    println!("This should be ignored");
}
```

More text with `inline_code` here.
"#;

        let spans = parse(content).unwrap();
        assert!(!spans.is_empty());

        // Verify we're not extracting from code blocks
        assert!(!spans.iter().any(|s| s.text.contains("println")));
        assert!(!spans.iter().any(|s| s.text == "ignored"));
        assert!(!spans.iter().any(|s| s.text == "inline"));
    }

    #[test]
    fn test_positions_match_source() {
        let content = "# Heading\n\nSome *bold* wrods [link](https://example.com).\n";
        let spans = parse(content).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        for span in &spans {
            let line: Vec<char> = lines[span.line].chars().collect();
            let text: String = line[span.start_column..span.end_column].iter().collect();
            assert_eq!(text, span.text);
        }

        let wrods = spans.iter().find(|s| s.text == "wrods").unwrap();
        assert_eq!((wrods.line, wrods.start_column, wrods.end_column), (2, 12, 17));
        assert!(!spans.iter().any(|s| s.text == "https" || s.text == "example"));
    }
}
