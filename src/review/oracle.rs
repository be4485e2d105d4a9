use super::{Finding, Position};
use crate::parser::FileType;
use anyhow::Result;
use std::sync::Arc;

/// What the oracle scans: the live text and where to start looking.
#[derive(Debug, Clone, Copy)]
pub struct ScanInput<'a> {
    pub text: &'a str,
    pub file_type: FileType,
    /// Occurrences starting before this position are skipped.
    pub from: Position,
}

/// Supplies unknown words and accepts learned ones.
pub trait DictionaryOracle {
    /// The first unknown word at or after `input.from`. `None` (or an empty
    /// word) means there are no more.
    fn next_unknown(&self, input: &ScanInput<'_>) -> Result<Option<Finding>>;

    /// Permanently add `word` to the known words. Learning a known word is
    /// not an error.
    fn learn(&self, word: &str) -> Result<()>;
}

impl<T: DictionaryOracle + ?Sized> DictionaryOracle for &T {
    fn next_unknown(&self, input: &ScanInput<'_>) -> Result<Option<Finding>> {
        (**self).next_unknown(input)
    }

    fn learn(&self, word: &str) -> Result<()> {
        (**self).learn(word)
    }
}

impl<T: DictionaryOracle + ?Sized> DictionaryOracle for Arc<T> {
    fn next_unknown(&self, input: &ScanInput<'_>) -> Result<Option<Finding>> {
        (**self).next_unknown(input)
    }

    fn learn(&self, word: &str) -> Result<()> {
        (**self).learn(word)
    }
}
