//! Word-set source.
//!
//! A round draws one group of target words. The stock source reads the
//! `wordsSets.json` format and picks a group at random.

use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use super::ledger::WordSpec;

/// Word-set errors.
#[derive(Debug, thiserror::Error)]
pub enum WordSetError {
    #[error("word-set collection is empty")]
    Empty,
    #[error("no word-set file configured")]
    Unconfigured,
    #[error("word set #{0} has no words")]
    EmptySet(usize),
    #[error("failed to parse word sets: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read word sets: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies one group of words per round.
pub trait WordSetSource {
    fn draw(&mut self) -> Result<Vec<WordSpec>, WordSetError>;
}

#[derive(Deserialize)]
struct WordSetsFile {
    sets: Vec<Vec<WordSpec>>,
}

fn validate(sets: &[Vec<WordSpec>]) -> Result<(), WordSetError> {
    if sets.is_empty() {
        return Err(WordSetError::Empty);
    }
    if let Some(index) = sets.iter().position(|set| set.is_empty()) {
        return Err(WordSetError::EmptySet(index));
    }
    Ok(())
}

/// Random draw from a fixed collection of groups.
#[derive(Debug, Clone)]
pub struct WordSets {
    sets: Vec<Vec<WordSpec>>,
    rng: StdRng,
}

impl WordSets {
    pub fn new(sets: Vec<Vec<WordSpec>>) -> Result<Self, WordSetError> {
        validate(&sets)?;
        Ok(Self {
            sets,
            rng: StdRng::from_entropy(),
        })
    }

    /// Parse `{"sets": [[{"text": .., "isMain": ..}, ..], ..]}`.
    pub fn from_json(raw: &str) -> Result<Self, WordSetError> {
        let file: WordSetsFile = serde_json::from_str(raw)?;
        Self::new(file.sets)
    }

    /// Read a `wordsSets.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordSetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Deterministic draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn sets(&self) -> &[Vec<WordSpec>] {
        &self.sets
    }

    /// Texts that appear more than once within a single group, per group index.
    ///
    /// Lookup by text is ambiguous for these; the ledger credits the first.
    pub fn duplicate_texts(&self) -> Vec<(usize, String)> {
        let mut duplicates = Vec::new();
        for (index, set) in self.sets.iter().enumerate() {
            let mut seen = HashSet::new();
            for spec in set {
                if !seen.insert(spec.text.as_str()) {
                    duplicates.push((index, spec.text.clone()));
                }
            }
        }
        duplicates
    }
}

impl WordSetSource for WordSets {
    fn draw(&mut self) -> Result<Vec<WordSpec>, WordSetError> {
        self.sets
            .choose(&mut self.rng)
            .cloned()
            .ok_or(WordSetError::Empty)
    }
}

/// Hands out groups in order, wrapping around.
#[derive(Debug, Clone)]
pub struct RotatingWordSets {
    sets: Vec<Vec<WordSpec>>,
    next: usize,
}

impl RotatingWordSets {
    pub fn new(sets: Vec<Vec<WordSpec>>) -> Result<Self, WordSetError> {
        validate(&sets)?;
        Ok(Self { sets, next: 0 })
    }
}

impl WordSetSource for RotatingWordSets {
    fn draw(&mut self) -> Result<Vec<WordSpec>, WordSetError> {
        let set = self.sets.get(self.next).cloned().ok_or(WordSetError::Empty)?;
        self.next = (self.next + 1) % self.sets.len();
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETS_JSON: &str = r#"{
        "sets": [
            [{"text": "car", "isMain": true}, {"text": "art"}],
            [{"text": "sun", "isMain": true}, {"text": "us"}, {"text": "us"}]
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let sets = WordSets::from_json(SETS_JSON).unwrap();
        assert_eq!(sets.sets().len(), 2);
        assert_eq!(sets.sets()[0][0], WordSpec::main("car"));
        assert_eq!(sets.sets()[0][1], WordSpec::sub("art"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            WordSets::from_json(r#"{"sets": []}"#),
            Err(WordSetError::Empty)
        ));
        assert!(matches!(
            WordSets::from_json(r#"{"sets": [[{"text": "a"}], []]}"#),
            Err(WordSetError::EmptySet(1))
        ));
        assert!(matches!(
            WordSets::from_json("not json"),
            Err(WordSetError::Parse(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("wordrace-sets-{}.json", std::process::id()));
        std::fs::write(&path, SETS_JSON).unwrap();

        let sets = WordSets::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(sets.sets().len(), 2);

        assert!(matches!(
            WordSets::load("/nonexistent/wordrace/wordsSets.json"),
            Err(WordSetError::Io(_))
        ));
    }

    #[test]
    fn test_draw_returns_a_known_group() {
        let mut sets = WordSets::from_json(SETS_JSON).unwrap().with_seed(7);
        for _ in 0..20 {
            let drawn = sets.draw().unwrap();
            assert!(sets.sets().contains(&drawn));
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = WordSets::from_json(SETS_JSON).unwrap().with_seed(42);
        let mut b = WordSets::from_json(SETS_JSON).unwrap().with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.draw().unwrap(), b.draw().unwrap());
        }
    }

    #[test]
    fn test_duplicate_texts() {
        let sets = WordSets::from_json(SETS_JSON).unwrap();
        assert_eq!(sets.duplicate_texts(), vec![(1, "us".to_string())]);
    }

    #[test]
    fn test_rotating_wraps() {
        let mut sets = RotatingWordSets::new(vec![
            vec![WordSpec::main("one")],
            vec![WordSpec::main("two")],
        ])
        .unwrap();

        assert_eq!(sets.draw().unwrap()[0].text, "one");
        assert_eq!(sets.draw().unwrap()[0].text, "two");
        assert_eq!(sets.draw().unwrap()[0].text, "one");
    }
}
