pub mod buffer;

pub use buffer::TextBuffer;

use crate::error::BufferError;
use crate::parser::FileType;
use crate::review::{Position, Range};

/// A live, line/column addressed text document.
///
/// Columns count chars and exclude the line terminator.
pub trait DocumentBuffer {
    /// Full text as it currently stands.
    fn text(&self) -> String;

    fn line_count(&self) -> usize;

    /// Length of `line` in chars, or `None` past the last line.
    fn line_len(&self, line: usize) -> Option<usize>;

    /// Text of `[start, end)` on `line`.
    fn slice(&self, line: usize, start: usize, end: usize) -> Result<String, BufferError>;

    /// Remove `[start, end)` on `line` and return where the removal started.
    fn delete(&mut self, line: usize, start: usize, end: usize) -> Result<Position, BufferError>;

    /// Insert `text` at `at` and return the range it now occupies.
    fn insert(&mut self, at: Position, text: &str) -> Result<Range, BufferError>;

    fn set_cursor(&mut self, at: Position) -> Result<(), BufferError>;

    fn cursor(&self) -> Position;

    fn file_type(&self) -> FileType {
        FileType::PlainText
    }

    /// Edits made until the matching `end_edit_group` undo as one step.
    fn begin_edit_group(&mut self) {}

    fn end_edit_group(&mut self) {}

    /// Close the open group as if it never happened: no undo step, and the
    /// modified flag as it was before the group. Callers must already have
    /// reverted the group's edits.
    fn discard_edit_group(&mut self) {
        self.end_edit_group()
    }
}

impl<B: DocumentBuffer + ?Sized> DocumentBuffer for &mut B {
    fn text(&self) -> String {
        (**self).text()
    }

    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        (**self).line_len(line)
    }

    fn slice(&self, line: usize, start: usize, end: usize) -> Result<String, BufferError> {
        (**self).slice(line, start, end)
    }

    fn delete(&mut self, line: usize, start: usize, end: usize) -> Result<Position, BufferError> {
        (**self).delete(line, start, end)
    }

    fn insert(&mut self, at: Position, text: &str) -> Result<Range, BufferError> {
        (**self).insert(at, text)
    }

    fn set_cursor(&mut self, at: Position) -> Result<(), BufferError> {
        (**self).set_cursor(at)
    }

    fn cursor(&self) -> Position {
        (**self).cursor()
    }

    fn file_type(&self) -> FileType {
        (**self).file_type()
    }

    fn begin_edit_group(&mut self) {
        (**self).begin_edit_group()
    }

    fn end_edit_group(&mut self) {
        (**self).end_edit_group()
    }

    fn discard_edit_group(&mut self) {
        (**self).discard_edit_group()
    }
}
