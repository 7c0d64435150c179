use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named bucket of practice paragraphs
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

const EASY: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Typing is a useful skill that can save you time.",
];

const MEDIUM: &[&str] = &[
    "Python is a high-level programming language known for its readability.",
    "Tkinter is Python's standard library for creating graphical user interfaces.",
];

const HARD: &[&str] = &[
    "Data science uses scientific methods, algorithms, and systems to extract insights from structured and unstructured data.",
    "Artificial Intelligence is transforming industries by automating complex tasks and improving decision-making.",
];

impl Difficulty {
    /// Dropdown order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn paragraphs(&self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }

    fn position(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Next option in the dropdown, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous option in the dropdown, wrapping around
    pub fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Picks one paragraph uniformly at random from the difficulty's list.
pub fn select_paragraph<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> &'static str {
    // every bucket is a non-empty const list
    difficulty.paragraphs().choose(rng).copied().unwrap_or_default()
}
