use super::occurrence::UnknownWord;

/// The word under review and its suggestions.
///
/// Only the engine that owns this value writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current: Option<UnknownWord>,
    suggestions: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The presented occurrence, or `None` when nothing is under review.
    pub fn current(&self) -> Option<&UnknownWord> {
        self.current.as_ref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.suggestions.clear();
    }

    pub(crate) fn present(&mut self, occurrence: UnknownWord, suggestions: Vec<String>) {
        self.current = Some(occurrence);
        self.suggestions = suggestions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_and_reset() {
        let mut session = SessionState::new();
        assert!(session.current().is_none());
        assert!(session.suggestions().is_empty());

        session.present(UnknownWord::new("wrod", 0, 0, 4), vec!["word".to_string()]);
        assert!(session.is_active());
        assert_eq!(session.current().unwrap().word, "wrod");
        assert_eq!(session.suggestions(), ["word".to_string()]);

        session.reset();
        assert_eq!(session, SessionState::default());
    }
}
