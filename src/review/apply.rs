use super::Position;
use crate::document::DocumentBuffer;
use crate::error::{BufferError, ReviewError, Result};
use tracing::{error, warn};

/// Replace `[start_column, end_column)` on `line` with `new_text`.
///
/// Delete and insert run as one undo group. If the insert fails the deleted
/// text is put back and the document is left as it was before the call,
/// modified flag and undo history included.
/// Returns the position just past the inserted text, which is also where the
/// cursor ends up.
pub fn replace<B: DocumentBuffer + ?Sized>(
    buffer: &mut B,
    line: usize,
    start_column: usize,
    end_column: usize,
    new_text: &str,
) -> Result<Position> {
    if start_column >= end_column {
        return Err(ReviewError::EditApplyFailed(BufferError::InvalidSpan {
            line,
            start: start_column,
            end: end_column,
        }));
    }

    let original = buffer
        .slice(line, start_column, end_column)
        .map_err(ReviewError::EditApplyFailed)?;

    buffer.begin_edit_group();
    let start = match buffer.delete(line, start_column, end_column) {
        Ok(start) => start,
        Err(err) => {
            buffer.end_edit_group();
            return Err(ReviewError::EditApplyFailed(err));
        }
    };

    let cursor = match buffer.insert(start, new_text) {
        Ok(range) => range.end,
        Err(err) => {
            match buffer.insert(start, &original) {
                Ok(_) => buffer.discard_edit_group(),
                Err(restore) => {
                    error!(%start, %restore, "failed to restore text after a failed insert");
                    buffer.end_edit_group();
                }
            }
            return Err(ReviewError::EditApplyFailed(err));
        }
    };
    buffer.end_edit_group();

    if let Err(err) = buffer.set_cursor(cursor) {
        warn!(%cursor, %err, "could not move cursor after replacement");
    }
    Ok(cursor)
}

/// Move the cursor to `at` without touching the text.
pub fn navigate_to<B: DocumentBuffer + ?Sized>(buffer: &mut B, at: Position) -> std::result::Result<(), BufferError> {
    buffer.set_cursor(at)
}
