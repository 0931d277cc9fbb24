use std::collections::HashSet;

use rand::{seq::SliceRandom, thread_rng};

use crate::error::domain_error::DomainError;
use crate::error::Error;

/// The words of one session plus the set of words that have been skipped.
///
/// A word leaves the eligible pool only when it is explicitly skipped;
/// correctly guessed words stay eligible and may be drawn again, even in the
/// same round. Exhaustion therefore means "every word has been skipped".
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<String>,
    skipped: HashSet<String>,
}

impl WordPool {
    /// Replaces the pool with a fresh word list and clears the skipped set.
    ///
    /// Blank and whitespace-only entries are dropped; the surviving entries
    /// are stored as uploaded. On failure the previous pool is untouched.
    pub fn load(&mut self, words: Vec<String>) -> Result<(), Error> {
        let words: Vec<String> = words
            .into_iter()
            .filter(|word| !word.trim().is_empty())
            .collect();
        if words.is_empty() {
            return Err(Error::Domain(DomainError::EmptyWordList));
        }
        self.words = words;
        self.skipped = HashSet::new();
        Ok(())
    }

    /// Picks one eligible word uniformly at random, uppercased for display.
    /// Returns `None` when the pool is exhausted. Drawing does not mutate the
    /// pool.
    pub fn draw(&self) -> Option<String> {
        let available: Vec<&String> = self
            .words
            .iter()
            .filter(|word| !self.skipped.contains(*word))
            .collect();
        let mut rng = thread_rng();
        available.choose(&mut rng).map(|word| word.to_uppercase())
    }

    /// Marks a word as skipped for the rest of the session. Accepts either
    /// the stored form or the uppercased display form returned by `draw`;
    /// unknown words are ignored so that the skipped set never leaves the
    /// pool. Idempotent.
    pub fn mark_skipped(&mut self, word: &str) {
        let needle = word.to_uppercase();
        for entry in &self.words {
            if entry.to_uppercase() == needle {
                self.skipped.insert(entry.clone());
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.words.iter().all(|word| self.skipped.contains(word))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
