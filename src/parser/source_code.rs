use crate::parser::{spans_in_segment, SourceLang, TextSpan};
use anyhow::Result;

/// Parse source code and extract checkable text from comments and strings
pub fn parse(content: &str, lang: SourceLang) -> Result<Vec<TextSpan>> {
    let hash_comments = lang.uses_hash_comments();
    let mut spans = Vec::new();
    let mut in_block_comment = false;

    for (line_num, line) in content.lines().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if in_block_comment {
                let start = i;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                push_segment(&chars[start..i], line_num, start, &mut spans);
                if i < chars.len() {
                    in_block_comment = false;
                    i += 2;
                }
                continue;
            }

            let next = chars.get(i + 1).copied();
            match chars[i] {
                '/' if !hash_comments && next == Some('/') => {
                    push_segment(&chars[i + 2..], line_num, i + 2, &mut spans);
                    break;
                }
                '/' if !hash_comments && next == Some('*') => {
                    in_block_comment = true;
                    i += 2;
                }
                '#' if hash_comments => {
                    push_segment(&chars[i + 1..], line_num, i + 1, &mut spans);
                    break;
                }
                quote if is_quote(quote, lang) => {
                    let start = i + 1;
                    i = start;
                    while i < chars.len() && chars[i] != quote {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    let end = i.min(chars.len());
                    push_segment(&chars[start..end], line_num, start, &mut spans);
                    i = end + 1;
                }
                _ => i += 1,
            }
        }
    }

    Ok(spans)
}

fn is_quote(ch: char, lang: SourceLang) -> bool {
    match ch {
        '"' => true,
        // Lifetimes and char literals never hold words
        '\'' => lang != SourceLang::Rust,
        '`' => matches!(
            lang,
            SourceLang::JavaScript
                | SourceLang::TypeScript
                | SourceLang::Jsx
                | SourceLang::Tsx
                | SourceLang::Go
                | SourceLang::Shell
        ),
        _ => false,
    }
}

/// Blank out escape sequences so `\nhello` does not read as `nhello`.
fn push_segment(chars: &[char], line: usize, offset: usize, spans: &mut Vec<TextSpan>) {
    let mut segment = String::with_capacity(chars.len());
    let mut escaped = false;
    for &ch in chars {
        if escaped {
            segment.push(' ');
            escaped = false;
        } else if ch == '\\' {
            segment.push(' ');
            escaped = true;
        } else {
            segment.push(ch);
        }
    }
    spans_in_segment(&segment, line, offset, spans);
}
