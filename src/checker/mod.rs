pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::parser::{FileType, TextSpan};
use crate::review::{DictionaryOracle, Finding, ScanInput, UnknownWord};
use crate::Config;
use anyhow::{Context, Result};
use dashmap::DashSet;
use dictionary::Dictionary;
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Parsed texts kept per checker; the oldest is dropped first.
const SCAN_CACHE_LIMIT: usize = 16;

/// Candidate words of one text: parsed, sorted, with ignore patterns applied.
struct ParsedText {
    text: String,
    file_type: FileType,
    candidates: Vec<TextSpan>,
}

/// Dictionary-backed oracle: finds unknown words and remembers learned ones.
///
/// Learned words are kept in a concurrent set, so one checker can serve
/// several review sessions at once.
pub struct SpellChecker {
    dictionary: Dictionary,
    personal_words: DashSet<String>,
    personal_dictionary: Option<PathBuf>,
    ignore_patterns: Vec<Regex>,
    max_suggestions: usize,
    scan_cache: Mutex<Vec<Arc<ParsedText>>>,
}

impl SpellChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let dictionary = Dictionary::load(&config.language)?;
        Self::with_dictionary(dictionary, config)
    }

    pub fn with_dictionary(dictionary: Dictionary, config: &Config) -> Result<Self> {
        let personal_words = DashSet::new();
        if let Some(path) = &config.personal_dictionary {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read personal dictionary: {}", path.display()))?;
                for line in content.lines() {
                    let word = line.trim();
                    if !word.is_empty() && !word.starts_with('#') {
                        personal_words.insert(word.to_lowercase());
                    }
                }
            }
        }

        let mut ignore_patterns = Vec::new();
        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => warn!(pattern = %pattern, error = %e, "skipping invalid ignore pattern"),
            }
        }

        Ok(Self {
            dictionary,
            personal_words,
            personal_dictionary: config.personal_dictionary.clone(),
            ignore_patterns,
            max_suggestions: config.max_suggestions,
            scan_cache: Mutex::new(Vec::new()),
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// In the main or the personal dictionary, ignoring case.
    pub fn is_known(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.personal_words.contains(&lower) || self.dictionary.contains(&lower)
    }

    fn should_ignore(&self, word: &str) -> bool {
        word.chars().count() <= 1 || word.chars().all(|c| c.is_numeric())
    }

    /// Char ranges of `line` covered by an ignore pattern (URLs, hashes, ...).
    fn ignored_ranges(&self, line: &str) -> Vec<(usize, usize)> {
        let column = |byte: usize| line[..byte].chars().count();
        self.ignore_patterns
            .iter()
            .flat_map(|re| re.find_iter(line))
            .map(|m| (column(m.start()), column(m.end())))
            .collect()
    }

    /// Candidates for `text`, parsed once per distinct text.
    ///
    /// Scans that only move forward over an unchanged document reuse the
    /// same parse. Known words are not filtered here since learning changes
    /// them.
    fn parsed(&self, text: &str, file_type: FileType) -> Result<Arc<ParsedText>> {
        {
            let cache = self.scan_cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.iter().find(|p| p.file_type == file_type && p.text == text) {
                return Ok(Arc::clone(hit));
            }
        }

        let spans = crate::parser::parse_file(file_type, text)?;
        let lines: Vec<&str> = text.lines().collect();
        let mut ignored: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        let candidates: Vec<TextSpan> = spans
            .into_iter()
            .filter(|span| {
                if self.should_ignore(&span.text) {
                    return false;
                }
                let ranges = ignored
                    .entry(span.line)
                    .or_insert_with(|| self.ignored_ranges(lines.get(span.line).copied().unwrap_or("")));
                !ranges
                    .iter()
                    .any(|&(start, end)| span.start_column < end && start < span.end_column)
            })
            .collect();
        debug!(candidates = candidates.len(), "parsed document");

        let parsed = Arc::new(ParsedText {
            text: text.to_string(),
            file_type,
            candidates,
        });
        let mut cache = self.scan_cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= SCAN_CACHE_LIMIT {
            cache.remove(0);
        }
        cache.push(Arc::clone(&parsed));
        Ok(parsed)
    }
}

impl DictionaryOracle for SpellChecker {
    fn next_unknown(&self, input: &ScanInput<'_>) -> Result<Option<Finding>> {
        let parsed = self.parsed(input.text, input.file_type)?;
        let from = (input.from.line, input.from.column);
        let first = parsed
            .candidates
            .partition_point(|span| (span.line, span.start_column) < from);

        for span in &parsed.candidates[first..] {
            if self.is_known(&span.text) {
                continue;
            }

            let suggestions = suggestions::generate(&span.text, &self.dictionary, self.max_suggestions);
            return Ok(Some(Finding::new(
                UnknownWord::new(span.text.clone(), span.line, span.start_column, span.end_column),
                suggestions,
            )));
        }

        Ok(None)
    }

    fn learn(&self, word: &str) -> Result<()> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            anyhow::bail!("Cannot learn an empty word");
        }
        if self.dictionary.contains(&word) || !self.personal_words.insert(word.clone()) {
            return Ok(());
        }

        if let Some(path) = &self.personal_dictionary {
            if let Err(err) = append_word(path, &word) {
                self.personal_words.remove(&word);
                return Err(err);
            }
        }

        info!(word = %word, "added to personal dictionary");
        Ok(())
    }
}

fn append_word(path: &Path, word: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create personal dictionary directory")?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open personal dictionary: {}", path.display()))?;
    writeln!(file, "{}", word)
        .with_context(|| format!("Failed to write personal dictionary: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FileType;
    use crate::review::Position;
    use tempfile::tempdir;

    fn checker(words: &[&str], config: &Config) -> SpellChecker {
        SpellChecker::with_dictionary(Dictionary::from_words(words).unwrap(), config).unwrap()
    }

    fn scan(checker: &SpellChecker, text: &str, from: Position) -> Option<Finding> {
        let input = ScanInput {
            text,
            file_type: FileType::PlainText,
            from,
        };
        checker.next_unknown(&input).unwrap()
    }

    #[test]
    fn test_finds_first_unknown_with_suggestions() {
        let checker = checker(&["the", "quick", "fox"], &Config::default());
        let finding = scan(&checker, "the\nthe qiuck fox", Position::default()).unwrap();

        assert_eq!(finding.occurrence, UnknownWord::new("qiuck", 1, 4, 9));
        assert_eq!(finding.suggestions.first().map(String::as_str), Some("quick"));
    }

    #[test]
    fn test_scan_starts_at_position() {
        let checker = checker(&["and"], &Config::default());
        let text = "zorp and zorp";
        assert_eq!(scan(&checker, text, Position::new(0, 0)).unwrap().occurrence.start_column, 0);
        assert_eq!(scan(&checker, text, Position::new(0, 4)).unwrap().occurrence.start_column, 9);
        assert!(scan(&checker, text, Position::new(0, 10)).is_none());
    }

    #[test]
    fn test_skips_numbers_single_letters_and_patterns() {
        let checker = checker(&["see", "now"], &Config::default());
        assert!(scan(&checker, "see https://exampel.com now", Position::default()).is_none());
        assert!(scan(&checker, "see 42 x NASA now", Position::default()).is_none());
    }

    #[test]
    fn test_learn_suppresses_and_persists_once() {
        let dir = tempdir().unwrap();
        let personal = dir.path().join("nested").join("personal.txt");
        let config = Config {
            personal_dictionary: Some(personal.clone()),
            ..Config::default()
        };
        let checker = checker(&["hello"], &config);

        assert!(scan(&checker, "zorp zorp", Position::default()).is_some());
        checker.learn("Zorp").unwrap();
        checker.learn("zorp").unwrap();
        checker.learn("hello").unwrap();
        assert!(scan(&checker, "zorp zorp", Position::default()).is_none());

        assert_eq!(fs::read_to_string(&personal).unwrap(), "zorp\n");

        let reloaded = SpellChecker::with_dictionary(Dictionary::from_words(&["hello"]).unwrap(), &config).unwrap();
        assert!(reloaded.is_known("ZORP"));
    }

    #[test]
    fn test_rescans_follow_the_current_text() {
        let checker = checker(&["and"], &Config::default());
        let before = scan(&checker, "zorp and", Position::default()).unwrap();
        assert_eq!(before.occurrence.start_column, 0);

        let after = scan(&checker, "and zorp", Position::default()).unwrap();
        assert_eq!(after.occurrence, UnknownWord::new("zorp", 0, 4, 8));

        // Same text, another file type: the code span is not checked.
        let input = ScanInput {
            text: "and `zorp`",
            file_type: FileType::Markdown,
            from: Position::default(),
        };
        assert!(checker.next_unknown(&input).unwrap().is_none());
        assert!(scan(&checker, "and `zorp`", Position::default()).is_some());
    }

    #[test]
    fn test_learn_rejects_empty_word() {
        let checker = checker(&[], &Config::default());
        assert!(checker.learn("  ").is_err());
    }

    #[test]
    fn test_markdown_code_is_not_checked() {
        let checker = checker(&["some", "text"], &Config::default());
        let input = ScanInput {
            text: "some text\n\n```\nzzzq\n```\n",
            file_type: FileType::Markdown,
            from: Position::default(),
        };
        assert!(checker.next_unknown(&input).unwrap().is_none());
    }
}
