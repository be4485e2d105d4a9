use super::Position;
use crate::document::DocumentBuffer;
use crate::error::{ReviewError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

lazy_static! {
    static ref LOCATOR: Regex = Regex::new(
        r"^(?:spell://(?P<path>[^#]*)#|#?)R(?P<index>\d+)L(?P<line>\d+)C(?P<start>\d+)-L(?P<end_line>\d+)C(?P<end>\d+)$"
    )
    .unwrap();
}

/// Points back at one reported occurrence so a review can pick up there.
///
/// Text form: `spell://<path>#R<index>L<line>C<start>-L<line>C<end>`, all
/// numbers zero-based. The `spell://<path>` prefix is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub path: Option<PathBuf>,
    pub result_index: usize,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl Locator {
    pub fn new(result_index: usize, line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            path: None,
            result_index,
            line,
            start_column,
            end_column,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.start_column)
    }

    /// Check the span still fits the document as it is now.
    pub fn validate<B: DocumentBuffer + ?Sized>(&self, buffer: &B) -> Result<()> {
        let fits = self.start_column < self.end_column
            && buffer
                .line_len(self.line)
                .is_some_and(|len| self.end_column <= len);

        if fits {
            Ok(())
        } else {
            Err(ReviewError::StaleLocator(self.to_string()))
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "spell://{}", path.display())?;
        }
        write!(
            f,
            "#R{}L{}C{}-L{}C{}",
            self.result_index, self.line, self.start_column, self.line, self.end_column
        )
    }
}

impl FromStr for Locator {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ReviewError::InvalidLocator(s.to_string());
        let caps = LOCATOR.captures(s.trim()).ok_or_else(invalid)?;

        let number = |name: &str| -> Result<usize> {
            caps.name(name)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)
        };

        let line = number("line")?;
        if number("end_line")? != line {
            return Err(invalid());
        }

        Ok(Self {
            path: caps
                .name("path")
                .map(|m| m.as_str())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            result_index: number("index")?,
            line,
            start_column: number("start")?,
            end_column: number("end")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextBuffer;

    #[test]
    fn test_parse_with_path() {
        let loc: Locator = "spell:///tmp/notes.md#R3L12C4-L12C9".parse().unwrap();
        assert_eq!(loc.path, Some(PathBuf::from("/tmp/notes.md")));
        assert_eq!(loc.result_index, 3);
        assert_eq!(loc.line, 12);
        assert_eq!(loc.start_column, 4);
        assert_eq!(loc.end_column, 9);
    }

    #[test]
    fn test_parse_bare_fragment() {
        let loc: Locator = "R0L2C5-L2C7".parse().unwrap();
        assert_eq!(loc, Locator::new(0, 2, 5, 7));
        assert_eq!(loc.to_string(), "#R0L2C5-L2C7");
        assert_eq!("#R0L2C5-L2C7".parse::<Locator>().unwrap(), loc);
    }

    #[test]
    fn test_display_parses_back() {
        let loc = Locator::new(7, 1, 0, 4).with_path("docs/readme.md");
        assert_eq!(loc.to_string(), "spell://docs/readme.md#R7L1C0-L1C4");
        assert_eq!(loc.to_string().parse::<Locator>().unwrap(), loc);
    }

    #[test]
    fn test_rejects_malformed_and_multiline() {
        assert!(matches!(
            "find:///x#R1L1C1-L1C2".parse::<Locator>(),
            Err(ReviewError::InvalidLocator(_))
        ));
        assert!(matches!(
            "R1L1C1-L2C2".parse::<Locator>(),
            Err(ReviewError::InvalidLocator(_))
        ));
        assert!("L1C1-L1C2".parse::<Locator>().is_err());
    }

    #[test]
    fn test_path_needs_fragment_separator() {
        assert!(matches!(
            "spell://fooR1L0C0-L0C3".parse::<Locator>(),
            Err(ReviewError::InvalidLocator(_))
        ));
        let loc: Locator = "spell://#R1L0C0-L0C3".parse().unwrap();
        assert_eq!(loc.path, None);
    }

    #[test]
    fn test_validate_against_buffer() {
        let buf = TextBuffer::from_text("first\nsecond line");
        assert!(Locator::new(0, 1, 0, 6).validate(&buf).is_ok());
        assert!(Locator::new(0, 1, 7, 11).validate(&buf).is_ok());

        for stale in [
            Locator::new(0, 1, 7, 12),
            Locator::new(0, 5, 0, 1),
            Locator::new(0, 0, 3, 3),
        ] {
            assert!(matches!(
                stale.validate(&buf),
                Err(ReviewError::StaleLocator(_))
            ));
        }
    }
}
