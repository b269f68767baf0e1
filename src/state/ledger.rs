//! Word ledger.
//!
//! Holds the target words for one round and how many times each has been
//! matched on the board.

use serde::{Deserialize, Serialize};

use super::scoring::ScoringRule;

/// A target word as it comes out of a word set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSpec {
    pub text: String,
    #[serde(default)]
    pub is_main: bool,
}

impl WordSpec {
    pub fn new(text: impl Into<String>, is_main: bool) -> Self {
        Self {
            text: text.into(),
            is_main,
        }
    }

    pub fn main(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn sub(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// A target word in a live round.
///
/// `text` and `is_main` are fixed for the round; only `count` moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    text: String,
    is_main: bool,
    count: u32,
}

impl Word {
    fn fresh(spec: WordSpec) -> Self {
        Self {
            text: spec.text,
            is_main: spec.is_main,
            count: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The board reported a word that is not part of this round.
    #[error("word {0:?} is not in the current round")]
    WordNotFound(String),
}

/// Ordered set of target words for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    words: Vec<Word>,
}

impl Ledger {
    /// Build a fresh ledger, every count at zero.
    pub fn load(words: impl IntoIterator<Item = WordSpec>) -> Self {
        Self {
            words: words.into_iter().map(Word::fresh).collect(),
        }
    }

    /// Index of the word with exactly this text.
    ///
    /// With duplicate texts the first entry wins.
    pub fn position(&self, text: &str) -> Result<usize, LedgerError> {
        self.words
            .iter()
            .position(|w| w.text == text)
            .ok_or_else(|| LedgerError::WordNotFound(text.to_string()))
    }

    /// Record one match and return the points it is worth under `rule`.
    pub fn record_match(&mut self, text: &str, rule: &ScoringRule) -> Result<u32, LedgerError> {
        let index = self.position(text)?;
        Ok(rule.point(self.bump(index)))
    }

    /// Increment the count at `index` (obtained from [`Ledger::position`]).
    pub(crate) fn bump(&mut self, index: usize) -> bool {
        let word = &mut self.words[index];
        word.count += 1;
        word.is_main
    }

    pub fn get(&self, text: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.text == text)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Texts in round order, as handed to the board.
    pub fn texts(&self) -> Vec<String> {
        self.words.iter().map(|w| w.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total matches recorded this round.
    pub fn total_matches(&self) -> u32 {
        self.words.iter().map(|w| w.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ledger() -> Ledger {
        Ledger::load(vec![WordSpec::main("car"), WordSpec::sub("art")])
    }

    #[test]
    fn test_load_starts_at_zero() {
        let ledger = make_ledger();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.words().iter().all(|w| w.count() == 0));
        assert_eq!(ledger.texts(), vec!["car".to_string(), "art".to_string()]);
    }

    #[test]
    fn test_record_match() {
        let mut ledger = make_ledger();
        let rule = ScoringRule::new(5, 2);

        assert_eq!(ledger.record_match("car", &rule), Ok(5));
        assert_eq!(ledger.record_match("art", &rule), Ok(2));
        assert_eq!(ledger.record_match("car", &rule), Ok(5));

        assert_eq!(ledger.get("car").unwrap().count(), 2);
        assert_eq!(ledger.get("art").unwrap().count(), 1);
        assert_eq!(ledger.total_matches(), 3);
    }

    #[test]
    fn test_unknown_word() {
        let mut ledger = make_ledger();

        let result = ledger.record_match("missing", &ScoringRule::default());
        assert_eq!(result, Err(LedgerError::WordNotFound("missing".to_string())));
        assert_eq!(ledger.total_matches(), 0);
    }

    #[test]
    fn test_lookup_is_exact() {
        let ledger = make_ledger();
        assert!(ledger.position("Car").is_err());
        assert!(ledger.position("car ").is_err());
    }

    #[test]
    fn test_word_spec_json_defaults_is_main() {
        let spec: WordSpec = serde_json::from_str(r#"{"text":"dog"}"#).unwrap();
        assert_eq!(spec, WordSpec::sub("dog"));

        let spec: WordSpec = serde_json::from_str(r#"{"text":"dog","isMain":true}"#).unwrap();
        assert!(spec.is_main);
    }
}
