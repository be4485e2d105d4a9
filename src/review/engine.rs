use super::oracle::{DictionaryOracle, ScanInput};
use super::{apply, Locator, Position, SessionState, UnknownWord};
use crate::document::DocumentBuffer;
use crate::error::{ReviewError, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// No word presented.
    Idle,
    /// A word is presented and waits for change, ignore or learn.
    AwaitingDecision,
    /// The oracle ran out of unknown words.
    Completed,
}

/// Outcome of every engine operation that moves the review forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Presented {
        occurrence: UnknownWord,
        suggestions: Vec<String>,
    },
    Completed,
}

/// Drives one review pass over one document.
///
/// Holds at most one occurrence at a time. After every decision the live
/// text is scanned again from a resume point derived from the edit just
/// made, so no stored position ever outlives an edit.
pub struct ReviewEngine<O, B> {
    oracle: O,
    buffer: B,
    session: SessionState,
    state: ReviewState,
    resume_from: Position,
}

impl<O: DictionaryOracle, B: DocumentBuffer> ReviewEngine<O, B> {
    pub fn new(oracle: O, buffer: B) -> Self {
        Self {
            oracle,
            buffer,
            session: SessionState::new(),
            state: ReviewState::Idle,
            resume_from: Position::default(),
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_parts(self) -> (O, B) {
        (self.oracle, self.buffer)
    }

    /// Begin a fresh pass from the top of the document.
    pub fn start(&mut self) -> Result<Step> {
        self.reset();
        self.resume_from = Position::default();
        self.find_next()
    }

    /// Drop the presented word and go back to `Idle`.
    pub fn reset(&mut self) {
        self.session.reset();
        self.state = ReviewState::Idle;
    }

    pub fn find_next(&mut self) -> Result<Step> {
        if self.state == ReviewState::Completed {
            return Ok(Step::Completed);
        }

        let text = self.buffer.text();
        let input = ScanInput {
            text: &text,
            file_type: self.buffer.file_type(),
            from: self.resume_from,
        };

        let finding = match self.oracle.next_unknown(&input) {
            Ok(finding) => finding,
            Err(err) => return Err(self.oracle_failed(err)),
        };

        let Some(finding) = finding.filter(|f| !f.occurrence.is_empty()) else {
            self.session.reset();
            self.state = ReviewState::Completed;
            info!("spelling review complete");
            return Ok(Step::Completed);
        };

        let occurrence = finding.occurrence;
        if !occurrence.is_well_formed() {
            return Err(self.oracle_failed(anyhow::anyhow!(
                "oracle returned an empty span for '{}' at {}",
                occurrence.word,
                occurrence.start()
            )));
        }
        if let Err(err) = apply::navigate_to(&mut self.buffer, occurrence.start()) {
            return Err(self.oracle_failed(
                anyhow::Error::new(err).context(format!("occurrence '{}' is outside the document", occurrence.word)),
            ));
        }

        debug!(
            word = %occurrence.word,
            at = %occurrence.start(),
            suggestions = finding.suggestions.len(),
            "presenting unknown word"
        );
        self.session.present(occurrence.clone(), finding.suggestions.clone());
        self.state = ReviewState::AwaitingDecision;

        Ok(Step::Presented {
            occurrence,
            suggestions: finding.suggestions,
        })
    }

    /// Replace the word with the first suggestion.
    pub fn change(&mut self) -> Result<Step> {
        self.change_to(0)
    }

    /// Replace the word with the suggestion at `index`.
    pub fn change_to(&mut self, index: usize) -> Result<Step> {
        let occurrence = self.active()?.clone();
        let replacement = self
            .session
            .suggestions()
            .get(index)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or(ReviewError::NoSuggestionAvailable)?;

        // A failed edit keeps the word presented so the caller can retry.
        let cursor = apply::replace(
            &mut self.buffer,
            occurrence.line,
            occurrence.start_column,
            occurrence.end_column,
            &replacement,
        )
        .inspect_err(|err| warn!(word = %occurrence.word, %err, "change failed"))?;

        debug!(from = %occurrence.word, to = %replacement, "changed word");
        self.resume_from = cursor;
        self.find_next()
    }

    /// Skip this occurrence only; later occurrences of the word still show up.
    pub fn ignore(&mut self) -> Result<Step> {
        let occurrence = self.active()?;
        self.resume_from = occurrence.end();
        self.find_next()
    }

    /// Add the word (lowercased) to the known words and move on.
    pub fn learn(&mut self) -> Result<Step> {
        let occurrence = self.active()?.clone();
        let word = occurrence.word.to_lowercase();

        if let Err(err) = self.oracle.learn(&word) {
            return Err(self.oracle_failed(err));
        }

        debug!(%word, "learned word");
        self.resume_from = occurrence.end();
        self.find_next()
    }

    /// Continue a review at a previously reported occurrence.
    ///
    /// The cursor only moves if the locator still fits the document. The
    /// next `find_next` scans from the locator's start.
    pub fn resume(&mut self, locator: &Locator) -> Result<Position> {
        locator.validate(&self.buffer)?;
        let at = locator.start();
        apply::navigate_to(&mut self.buffer, at).map_err(|_| ReviewError::StaleLocator(locator.to_string()))?;

        self.reset();
        self.resume_from = at;
        debug!(%locator, "resuming review");
        Ok(at)
    }

    fn active(&self) -> Result<&UnknownWord> {
        match (self.state, self.session.current()) {
            (ReviewState::AwaitingDecision, Some(current)) => Ok(current),
            _ => Err(ReviewError::NoActiveOccurrence),
        }
    }

    fn oracle_failed(&mut self, err: anyhow::Error) -> ReviewError {
        warn!(error = %err, "dictionary oracle failed, review reset");
        self.reset();
        ReviewError::OracleUnavailable(err)
    }
}
