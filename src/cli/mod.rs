//! Run modes behind the binary. Each one drives a [`ReviewEngine`] over one
//! file; the engine decides what happens to the text.

pub mod output;
pub mod prompt;

use crate::checker::SpellChecker;
use crate::document::{DocumentBuffer, TextBuffer};
use crate::parser::FileType;
use crate::review::{Locator, ReviewEngine, Step, UnknownWord};
use crate::{CheckResult, Config, ReviewError, SpellError};
use anyhow::{Context, Result};
use prompt::Decision;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub fn load_buffer(path: &Path) -> Result<TextBuffer> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(TextBuffer::from_text(&content).with_file_type(FileType::from_path(path)))
}

fn save_buffer(path: &Path, buffer: &mut TextBuffer) -> Result<()> {
    fs::write(path, buffer.text()).with_context(|| format!("Failed to write file: {}", path.display()))?;
    buffer.mark_clean();
    debug!(path = %path.display(), "wrote corrected file");
    Ok(())
}

fn context_of(buffer: &TextBuffer, occurrence: &UnknownWord, width: usize) -> String {
    let line = buffer.line_at(occurrence.line).unwrap_or_default();
    output::context_window(&line, occurrence.start_column, occurrence.end_column, width)
}

/// Report every unknown word. The file is never modified.
pub fn check_file(checker: &SpellChecker, path: &Path, config: &Config) -> Result<CheckResult> {
    let mut engine = ReviewEngine::new(checker, load_buffer(path)?);
    let mut errors = Vec::new();

    let mut step = engine.start()?;
    while let Step::Presented { occurrence, suggestions } = step {
        let locator = Locator::new(
            errors.len(),
            occurrence.line,
            occurrence.start_column,
            occurrence.end_column,
        )
        .with_path(path);

        errors.push(SpellError {
            context: context_of(engine.buffer(), &occurrence, config.context_width),
            word: occurrence.word,
            line: occurrence.line,
            start_column: occurrence.start_column,
            end_column: occurrence.end_column,
            suggestions,
            locator,
        });
        step = engine.ignore()?;
    }

    Ok(CheckResult {
        error_count: errors.len(),
        errors,
        ..CheckResult::default()
    })
}

/// Apply the best suggestion to every word that has one.
pub fn fix_file(checker: &SpellChecker, path: &Path) -> Result<CheckResult> {
    let mut engine = ReviewEngine::new(checker, load_buffer(path)?);
    let mut result = CheckResult::default();

    let mut step = engine.start()?;
    while let Step::Presented { suggestions, .. } = &step {
        step = if suggestions.is_empty() {
            result.error_count += 1;
            engine.ignore()?
        } else {
            result.fixed_count += 1;
            engine.change()?
        };
    }

    let (_, mut buffer) = engine.into_parts();
    if buffer.is_dirty() {
        save_buffer(path, &mut buffer)?;
    }
    Ok(result)
}

/// Walk the file with the user deciding on each word.
///
/// With `resume`, the review starts at that locator instead of the top.
/// Corrections made before a quit are still written.
pub fn review_file(
    checker: &SpellChecker,
    path: &Path,
    config: &Config,
    resume: Option<&Locator>,
    colored: bool,
) -> Result<CheckResult> {
    let mut engine = ReviewEngine::new(checker, load_buffer(path)?);
    let mut result = CheckResult::default();

    let mut step = match resume {
        Some(locator) => {
            engine.resume(locator)?;
            engine.find_next()?
        }
        None => engine.start()?,
    };

    while let Step::Presented { occurrence, suggestions } = &step {
        let context = context_of(engine.buffer(), occurrence, config.context_width);
        output::print_occurrence(path, occurrence, &context, colored);

        let next = match prompt::ask(&occurrence.word, suggestions)? {
            Decision::Change(index) => match engine.change_to(index) {
                Ok(next) => {
                    result.fixed_count += 1;
                    next
                }
                Err(ReviewError::EditApplyFailed(err)) => {
                    warn!(path = %path.display(), %err, "could not apply correction");
                    eprintln!("Could not apply correction: {}", err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            },
            Decision::Ignore => {
                result.error_count += 1;
                engine.ignore()?
            }
            Decision::Learn => {
                result.learned_count += 1;
                engine.learn()?
            }
            Decision::Quit => break,
        };
        step = next;
    }

    let (_, mut buffer) = engine.into_parts();
    if buffer.is_dirty() {
        save_buffer(path, &mut buffer)?;
    }
    Ok(result)
}
