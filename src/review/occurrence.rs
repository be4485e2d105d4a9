use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based document position. `column` counts chars within the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One flagged word at a specific spot in the document.
///
/// Positions are only valid against the document as it was when the
/// occurrence was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownWord {
    pub word: String,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl UnknownWord {
    pub fn new(word: impl Into<String>, line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            word: word.into(),
            line,
            start_column,
            end_column,
        }
    }

    /// The empty word is the "no more occurrences" sentinel.
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.start_column)
    }

    pub fn end(&self) -> Position {
        Position::new(self.line, self.end_column)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.start_column < self.end_column
    }
}

/// An occurrence together with its ranked corrections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finding {
    pub occurrence: UnknownWord,
    pub suggestions: Vec<String>,
}

impl Finding {
    pub fn new(occurrence: UnknownWord, suggestions: Vec<String>) -> Self {
        Self {
            occurrence,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1), Position::new(1, 1));
    }

    #[test]
    fn test_sentinel_and_span() {
        assert!(UnknownWord::default().is_empty());

        let word = UnknownWord::new("teh", 3, 4, 7);
        assert!(!word.is_empty());
        assert_eq!(word.start(), Position::new(3, 4));
        assert_eq!(word.end(), Position::new(3, 7));
        assert!(word.is_well_formed());
        assert!(!UnknownWord::new("x", 0, 2, 2).is_well_formed());
    }
}
