//! Per-level question sequences.
//!
//! A [`Deck`] is what a game consumes: the bank's questions grouped by level,
//! each level shuffled independently. The engine only tracks
//! `(level, index)`; the deck maps that pair to a question.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{Question, QuestionBank, LEVEL_COUNT};

/// Questions grouped by level, ready to be served.
#[derive(Debug, Clone)]
pub struct Deck {
    levels: Vec<Vec<Question>>,
}

impl Deck {
    /// Group questions by level, keeping authoring order.
    pub fn in_order(bank: &QuestionBank) -> Self {
        let levels = (1..=LEVEL_COUNT)
            .map(|level| bank.level(level).cloned().collect())
            .collect();
        Self { levels }
    }

    /// Group questions by level and shuffle each level with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(bank: &QuestionBank, rng: &mut R) -> Self {
        let mut deck = Self::in_order(bank);
        for level in &mut deck.levels {
            level.shuffle(rng);
        }
        deck
    }

    /// Reproducible shuffle, for tests and replays.
    pub fn seeded(bank: &QuestionBank, seed: u64) -> Self {
        Self::shuffled(bank, &mut StdRng::seed_from_u64(seed))
    }

    /// Question to show at `index` within `level`.
    ///
    /// Indices past the end of a level wrap around, so a level with fewer
    /// questions than a player needs repeats them rather than stalling.
    /// Returns `None` only when the level has no questions at all.
    pub fn question(&self, level: u8, index: usize) -> Option<&Question> {
        let questions = self.level(level)?;
        if questions.is_empty() {
            return None;
        }
        questions.get(index % questions.len())
    }

    /// All questions of `level` in serving order.
    pub fn level(&self, level: u8) -> Option<&[Question]> {
        let slot = usize::from(level).checked_sub(1)?;
        self.levels.get(slot).map(Vec::as_slice)
    }

    /// Levels with no questions, which make a full game impossible.
    pub fn empty_levels(&self) -> Vec<u8> {
        (1..=LEVEL_COUNT)
            .filter(|&level| self.level(level).map_or(true, |qs| qs.is_empty()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_question, OptionKey};

    fn bank() -> QuestionBank {
        let mut questions = Vec::new();
        for level in 1..=LEVEL_COUNT {
            for (i, key) in OptionKey::ALL.iter().enumerate() {
                let mut q = sample_question(level, *key);
                q.prompt = format!("L{level}Q{i}");
                questions.push(q);
            }
        }
        QuestionBank {
            id: "deck".into(),
            name: "Deck".into(),
            description: String::new(),
            questions,
        }
    }

    #[test]
    fn groups_by_level_in_order() {
        let deck = Deck::in_order(&bank());
        for level in 1..=LEVEL_COUNT {
            let qs = deck.level(level).unwrap();
            assert_eq!(qs.len(), 4);
            assert!(qs.iter().all(|q| q.level == level));
            assert_eq!(qs[0].prompt, format!("L{level}Q0"));
        }
        assert!(deck.level(0).is_none());
        assert!(deck.level(5).is_none());
    }

    #[test]
    fn index_wraps_around() {
        let deck = Deck::in_order(&bank());
        assert_eq!(deck.question(2, 0).unwrap().prompt, "L2Q0");
        assert_eq!(deck.question(2, 5).unwrap().prompt, "L2Q1");
    }

    #[test]
    fn seeded_shuffle_is_reproducible_and_keeps_levels() {
        let a = Deck::seeded(&bank(), 7);
        let b = Deck::seeded(&bank(), 7);
        for level in 1..=LEVEL_COUNT {
            let pa: Vec<_> = a.level(level).unwrap().iter().map(|q| &q.prompt).collect();
            let pb: Vec<_> = b.level(level).unwrap().iter().map(|q| &q.prompt).collect();
            assert_eq!(pa, pb);
            assert!(a.level(level).unwrap().iter().all(|q| q.level == level));
        }
    }

    #[test]
    fn reports_empty_levels() {
        let mut bank = bank();
        bank.questions.retain(|q| q.level != 3);
        let deck = Deck::in_order(&bank);
        assert_eq!(deck.empty_levels(), vec![3]);
        assert!(deck.question(3, 0).is_none());
    }
}
