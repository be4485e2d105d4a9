use super::DocumentBuffer;
use crate::error::BufferError;
use crate::parser::FileType;
use crate::review::{Position, Range};
use ropey::Rope;

#[derive(Debug, Clone)]
enum Edit {
    Inserted { at: usize, len: usize },
    Deleted { at: usize, text: String },
}

#[derive(Debug, Clone)]
struct EditGroup {
    edits: Vec<Edit>,
    cursor_before: Position,
    dirty_before: bool,
}

/// Rope-backed document with a cursor and grouped undo.
pub struct TextBuffer {
    rope: Rope,
    cursor: Position,
    file_type: FileType,
    dirty: bool,
    undo_stack: Vec<EditGroup>,
    open_group: Option<EditGroup>,
    group_depth: usize,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Position::default(),
            file_type: FileType::PlainText,
            dirty: false,
            undo_stack: Vec::new(),
            open_group: None,
            group_depth: 0,
        }
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Line text without its terminator.
    pub fn line_at(&self, line: usize) -> Option<String> {
        let len = self.line_len(line)?;
        Some(self.rope.line(line).slice(..len).to_string())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Revert the most recent edit group. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.undo_stack.pop() else {
            return false;
        };

        for edit in group.edits.iter().rev() {
            match edit {
                Edit::Inserted { at, len } => self.rope.remove(*at..*at + *len),
                Edit::Deleted { at, text } => self.rope.insert(*at, text),
            }
        }
        self.cursor = group.cursor_before;
        self.dirty = true;
        true
    }

    fn check_line(&self, line: usize) -> Result<usize, BufferError> {
        self.line_len(line).ok_or(BufferError::LineOutOfRange {
            line,
            line_count: self.line_count(),
        })
    }

    fn check_position(&self, at: Position) -> Result<usize, BufferError> {
        let len = self.check_line(at.line)?;
        if at.column > len {
            return Err(BufferError::ColumnOutOfRange {
                line: at.line,
                column: at.column,
                len,
            });
        }
        Ok(self.rope.line_to_char(at.line) + at.column)
    }

    fn position_of(&self, char_idx: usize) -> Position {
        let line = self.rope.char_to_line(char_idx);
        Position::new(line, char_idx - self.rope.line_to_char(line))
    }

    fn record(&mut self, edit: Edit) {
        match self.open_group.as_mut() {
            Some(group) => group.edits.push(edit),
            None => self.undo_stack.push(EditGroup {
                edits: vec![edit],
                cursor_before: self.cursor,
                dirty_before: self.dirty,
            }),
        }
        self.dirty = true;
    }
}

impl DocumentBuffer for TextBuffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        Some(len)
    }

    fn slice(&self, line: usize, start: usize, end: usize) -> Result<String, BufferError> {
        let len = self.check_line(line)?;
        if start > end || end > len {
            return Err(BufferError::InvalidSpan { line, start, end });
        }
        let base = self.rope.line_to_char(line);
        Ok(self.rope.slice(base + start..base + end).to_string())
    }

    fn delete(&mut self, line: usize, start: usize, end: usize) -> Result<Position, BufferError> {
        let text = self.slice(line, start, end)?;
        let at = self.rope.line_to_char(line) + start;
        self.rope.remove(at..at + (end - start));
        self.record(Edit::Deleted { at, text });
        Ok(Position::new(line, start))
    }

    fn insert(&mut self, at: Position, text: &str) -> Result<Range, BufferError> {
        let idx = self.check_position(at)?;
        let len = text.chars().count();
        if len > 0 {
            self.rope.insert(idx, text);
            self.record(Edit::Inserted { at: idx, len });
        }
        Ok(Range::new(at, self.position_of(idx + len)))
    }

    fn set_cursor(&mut self, at: Position) -> Result<(), BufferError> {
        self.check_position(at)?;
        self.cursor = at;
        Ok(())
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn file_type(&self) -> FileType {
        self.file_type
    }

    fn begin_edit_group(&mut self) {
        if self.group_depth == 0 {
            self.open_group = Some(EditGroup {
                edits: Vec::new(),
                cursor_before: self.cursor,
                dirty_before: self.dirty,
            });
        }
        self.group_depth += 1;
    }

    fn end_edit_group(&mut self) {
        if self.group_depth == 0 {
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            if let Some(group) = self.open_group.take() {
                if !group.edits.is_empty() {
                    self.undo_stack.push(group);
                }
            }
        }
    }

    fn discard_edit_group(&mut self) {
        if self.group_depth == 0 {
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            if let Some(group) = self.open_group.take() {
                self.dirty = group.dirty_before;
            }
        }
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("cursor", &self.cursor)
            .field("file_type", &self.file_type)
            .field("dirty", &self.dirty)
            .field("undo_groups", &self.undo_stack.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lengths_exclude_terminators() {
        let buf = TextBuffer::from_text("hello\r\nwörld\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_len(0), Some(5));
        assert_eq!(buf.line_len(1), Some(5));
        assert_eq!(buf.line_len(2), Some(0));
        assert_eq!(buf.line_len(3), None);
        assert_eq!(buf.line_at(1), Some("wörld".to_string()));
    }

    #[test]
    fn test_delete_returns_start() {
        let mut buf = TextBuffer::from_text("one two three");
        let at = buf.delete(0, 4, 8).unwrap();
        assert_eq!(at, Position::new(0, 4));
        assert_eq!(buf.text(), "one three");
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_delete_rejects_bad_span() {
        let mut buf = TextBuffer::from_text("short");
        assert_eq!(
            buf.delete(0, 3, 9),
            Err(BufferError::InvalidSpan { line: 0, start: 3, end: 9 })
        );
        assert!(matches!(
            buf.delete(4, 0, 1),
            Err(BufferError::LineOutOfRange { line: 4, .. })
        ));
        assert_eq!(buf.text(), "short");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_reports_range() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        let range = buf.insert(Position::new(1, 1), "XYZ").unwrap();
        assert_eq!(range, Range::new(Position::new(1, 1), Position::new(1, 4)));
        assert_eq!(buf.text(), "ab\ncXYZd");

        let range = buf.insert(Position::new(0, 2), "\nnew").unwrap();
        assert_eq!(range.end, Position::new(1, 3));
        assert_eq!(buf.line_at(1), Some("new".to_string()));
    }

    #[test]
    fn test_insert_past_line_end_fails() {
        let mut buf = TextBuffer::from_text("abc");
        assert_eq!(
            buf.insert(Position::new(0, 4), "x"),
            Err(BufferError::ColumnOutOfRange { line: 0, column: 4, len: 3 })
        );
    }

    #[test]
    fn test_multibyte_columns_are_chars() {
        let mut buf = TextBuffer::from_text("naïve café");
        assert_eq!(buf.slice(0, 6, 10).unwrap(), "café");
        buf.delete(0, 0, 5).unwrap();
        buf.insert(Position::new(0, 0), "naive").unwrap();
        assert_eq!(buf.text(), "naive café");
    }

    #[test]
    fn test_set_cursor_validates() {
        let mut buf = TextBuffer::from_text("abc\nde");
        buf.set_cursor(Position::new(1, 2)).unwrap();
        assert_eq!(buf.cursor(), Position::new(1, 2));
        assert!(buf.set_cursor(Position::new(1, 3)).is_err());
        assert!(buf.set_cursor(Position::new(2, 0)).is_err());
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_grouped_edits_undo_together() {
        let mut buf = TextBuffer::from_text("the qiuck fox");
        buf.set_cursor(Position::new(0, 4)).unwrap();

        buf.begin_edit_group();
        let at = buf.delete(0, 4, 9).unwrap();
        buf.insert(at, "quick").unwrap();
        buf.end_edit_group();
        assert_eq!(buf.text(), "the quick fox");

        assert!(buf.undo());
        assert_eq!(buf.text(), "the qiuck fox");
        assert_eq!(buf.cursor(), Position::new(0, 4));
        assert!(!buf.undo());
    }

    #[test]
    fn test_ungrouped_edits_undo_one_at_a_time() {
        let mut buf = TextBuffer::from_text("abc");
        buf.insert(Position::new(0, 3), "d").unwrap();
        buf.insert(Position::new(0, 4), "e").unwrap();
        assert!(buf.undo());
        assert_eq!(buf.text(), "abcd");
        assert!(buf.undo());
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn test_discarded_group_leaves_no_trace() {
        let mut buf = TextBuffer::from_text("keep teh text");
        buf.begin_edit_group();
        let at = buf.delete(0, 5, 8).unwrap();
        buf.insert(at, "teh").unwrap();
        buf.discard_edit_group();

        assert_eq!(buf.text(), "keep teh text");
        assert!(!buf.is_dirty());
        assert!(!buf.can_undo());

        // An earlier edit keeps the document modified.
        buf.insert(Position::new(0, 0), "> ").unwrap();
        buf.begin_edit_group();
        buf.delete(0, 0, 2).unwrap();
        buf.insert(Position::new(0, 0), "> ").unwrap();
        buf.discard_edit_group();
        assert!(buf.is_dirty());
        assert!(buf.undo());
        assert_eq!(buf.text(), "keep teh text");
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let mut buf = TextBuffer::from_text("abc");
        buf.begin_edit_group();
        buf.end_edit_group();
        assert!(!buf.can_undo());
    }
}
