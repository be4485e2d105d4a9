use thiserror::Error;

/// Failures of a single buffer primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },

    #[error("column {column} is out of range on line {line} (length {len})")]
    ColumnOutOfRange { line: usize, column: usize, len: usize },

    #[error("invalid span {start}..{end} on line {line}")]
    InvalidSpan { line: usize, start: usize, end: usize },
}

/// Errors surfaced by the review engine to its caller.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("no unknown word is being reviewed")]
    NoActiveOccurrence,

    #[error("no suggestion available for the current word")]
    NoSuggestionAvailable,

    #[error("dictionary oracle unavailable: {0}")]
    OracleUnavailable(#[source] anyhow::Error),

    #[error("failed to apply edit: {0}")]
    EditApplyFailed(#[source] BufferError),

    #[error("locator {0} no longer matches the document")]
    StaleLocator(String),

    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    #[error("review session '{0}' is busy")]
    SessionBusy(String),

    #[error("no review session named '{0}'")]
    UnknownSession(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
