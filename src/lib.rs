pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod document;
pub mod error;
pub mod parser;
pub mod review;

pub use checker::SpellChecker;
pub use config::Config;
pub use document::{DocumentBuffer, TextBuffer};
pub use error::{BufferError, ReviewError};
pub use review::{ReviewEngine, ReviewState, Step};

use review::Locator;

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub error_count: usize,
    pub fixed_count: usize,
    pub learned_count: usize,
    pub errors: Vec<SpellError>,
}

/// One reported word. Line and columns are zero-based.
#[derive(Debug, Clone)]
pub struct SpellError {
    pub word: String,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub context: String,
    pub suggestions: Vec<String>,
    pub locator: Locator,
}
