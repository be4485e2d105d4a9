pub mod markdown;
pub mod plaintext;
pub mod source_code;

use crate::checker::tokenizer::tokenize_line;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    Markdown,
    SourceCode(SourceLang),
    #[default]
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLang {
    Rust,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    Jsx,
    Tsx,
    Shell,
    Toml,
    Other,
}

impl SourceLang {
    /// Languages whose comments start with `#` instead of `//`.
    pub fn uses_hash_comments(self) -> bool {
        matches!(self, SourceLang::Python | SourceLang::Shell | SourceLang::Toml)
    }
}

impl FileType {
    /// Detect file type from extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "mdx" | "markdown" => FileType::Markdown,
            "rs" => FileType::SourceCode(SourceLang::Rust),
            "js" | "mjs" | "cjs" => FileType::SourceCode(SourceLang::JavaScript),
            "ts" | "mts" | "cts" => FileType::SourceCode(SourceLang::TypeScript),
            "jsx" => FileType::SourceCode(SourceLang::Jsx),
            "tsx" => FileType::SourceCode(SourceLang::Tsx),
            "py" | "pyw" => FileType::SourceCode(SourceLang::Python),
            "go" => FileType::SourceCode(SourceLang::Go),
            "java" => FileType::SourceCode(SourceLang::Java),
            "c" | "h" => FileType::SourceCode(SourceLang::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => FileType::SourceCode(SourceLang::Cpp),
            "sh" | "bash" | "zsh" => FileType::SourceCode(SourceLang::Shell),
            "toml" => FileType::SourceCode(SourceLang::Toml),
            _ => FileType::PlainText,
        }
    }
}

/// A checkable word: zero-based line, char columns `[start_column, end_column)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// Extract the checkable words of `content`, in document order.
pub fn parse_file(file_type: FileType, content: &str) -> Result<Vec<TextSpan>> {
    let mut spans = match file_type {
        FileType::Markdown => markdown::parse(content)?,
        FileType::SourceCode(lang) => source_code::parse(content, lang)?,
        FileType::PlainText => plaintext::parse(content)?,
    };
    spans.sort_by_key(|s| (s.line, s.start_column));
    Ok(spans)
}

/// Tokenize `segment`, which starts at char column `offset` of `line`.
pub(crate) fn spans_in_segment(segment: &str, line: usize, offset: usize, spans: &mut Vec<TextSpan>) {
    for token in tokenize_line(segment) {
        spans.push(TextSpan {
            text: token.text,
            line,
            start_column: offset + token.start,
            end_column: offset + token.end,
        });
    }
}

/// Maps byte offsets in a text to (line, char column).
pub(crate) struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    pub(crate) fn position(&self, byte: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= byte) - 1;
        let start = self.line_starts[line];
        let column = self.text.get(start..byte).map_or(0, |s| s.chars().count());
        (line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(
            FileType::from_path(&PathBuf::from("test.md")),
            FileType::Markdown
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("main.rs")),
            FileType::SourceCode(SourceLang::Rust)
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("app.tsx")),
            FileType::SourceCode(SourceLang::Tsx)
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("notes.txt")),
            FileType::PlainText
        );
    }

    #[test]
    fn test_line_index() {
        let text = "ab\nçd\n\nef";
        let index = LineIndex::new(text);
        assert_eq!(index.position(0), (0, 0));
        assert_eq!(index.position(3), (1, 0));
        // 'd' follows the two-byte 'ç'
        assert_eq!(index.position(5), (1, 1));
        assert_eq!(index.position(7), (2, 0));
        assert_eq!(index.position(8), (3, 0));
    }

    #[test]
    fn test_spans_are_sorted() {
        let spans = parse_file(FileType::PlainText, "second word\nfirst").unwrap();
        let order: Vec<_> = spans.iter().map(|s| (s.line, s.start_column)).collect();
        assert_eq!(order, [(0, 0), (0, 7), (1, 0)]);
    }
}
