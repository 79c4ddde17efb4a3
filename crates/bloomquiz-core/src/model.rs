//! Core data model types for bloomquiz.
//!
//! Questions and question banks as the rest of the system consumes them,
//! already parsed and typed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of difficulty levels (Bloom-taxonomy stages) in a game.
pub const LEVEL_COUNT: u8 = 4;

/// One of the four answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Position of this key in a question's option array.
    pub fn index(self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::A => write!(f, "A"),
            OptionKey::B => write!(f, "B"),
            OptionKey::C => write!(f, "C"),
            OptionKey::D => write!(f, "D"),
        }
    }
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(format!("unknown option: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Difficulty level, 1..=4.
    pub level: u8,
    /// Subject area (e.g. "Diagnostic").
    pub category: String,
    /// The question text.
    pub prompt: String,
    /// Option texts, indexed by [`OptionKey::index`].
    pub options: [String; 4],
    /// Key of the correct option.
    pub answer: OptionKey,
    /// Shown after answering.
    #[serde(default)]
    pub explanation: String,
    /// Bibliographic reference for the explanation.
    #[serde(default)]
    pub reference: String,
}

impl Question {
    /// Text of the option behind `key`.
    pub fn option(&self, key: OptionKey) -> &str {
        &self.options[key.index()]
    }

    pub fn is_correct(&self, key: OptionKey) -> bool {
        self.answer == key
    }
}

/// A named collection of questions spanning all levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// Questions in authoring order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Questions belonging to `level`, in authoring order.
    pub fn level(&self, level: u8) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.level == level)
    }

    /// Number of questions per level, index 0 being level 1.
    pub fn level_counts(&self) -> [usize; LEVEL_COUNT as usize] {
        let mut counts = [0; LEVEL_COUNT as usize];
        for q in &self.questions {
            if (1..=LEVEL_COUNT).contains(&q.level) {
                counts[(q.level - 1) as usize] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
pub(crate) fn sample_question(level: u8, answer: OptionKey) -> Question {
    Question {
        level,
        category: "Diagnostic".into(),
        prompt: format!("Level {level} question"),
        options: [
            "first".into(),
            "second".into(),
            "third".into(),
            "fourth".into(),
        ],
        answer,
        explanation: String::new(),
        reference: String::new(),
    }
}
