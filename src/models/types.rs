//! Colour, ColourPref and FloatStatus primitive value types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Colour of the pieces a player held in one game; `None` records a bye.
///
/// Variants are declared in weight order so the derived `Ord` matches the
/// signed aggregation used for colour preference.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colour {
    White,
    None,
    Black,
}

impl Colour {
    /// Signed weight used when aggregating a colour history: white games
    /// pull the balance negative, black games positive.
    pub fn weight(self) -> i32 {
        match self {
            Colour::White => -1,
            Colour::None => 0,
            Colour::Black => 1,
        }
    }

    /// The colour handed to the other side of a pairing. A bye has no opposite.
    pub fn opposite(self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::None => Colour::None,
            Colour::Black => Colour::White,
        }
    }
}

/// Aggregated colour imbalance of one player. The sign picks the preferred
/// colour (negative white, positive black); the magnitude classifies it as
/// mild or absolute.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct ColourPref(pub i32);

impl ColourPref {
    /// Magnitude of the imbalance, in games.
    pub fn strength(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Exactly one game out of balance.
    pub fn is_mild(self) -> bool {
        self.strength() == 1
    }

    /// At or beyond the absolute threshold (1 or 2 depending on round parity
    /// and whether rule A7d is in effect).
    pub fn is_absolute(self, threshold: u32) -> bool {
        self.strength() >= threshold
    }

    /// Colour the sign points at, `Colour::None` when balanced.
    pub fn preferred(self) -> Colour {
        match self.0.cmp(&0) {
            Ordering::Greater => Colour::Black,
            Ordering::Less => Colour::White,
            Ordering::Equal => Colour::None,
        }
    }
}

/// Whether and how recently a player floated into another score group.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FloatStatus {
    /// Floated down two rounds ago.
    DownPrev,
    /// Floated down (or took the bye) in the previous round.
    Down,
    #[default]
    None,
    /// Floated up in the previous round.
    Up,
    /// Floated up two rounds ago.
    UpPrev,
}

impl FloatStatus {
    /// One round of decay after a same-score pairing: a fresh float becomes
    /// a two-rounds-ago float, a two-rounds-ago float clears.
    pub fn decayed(self) -> FloatStatus {
        match self {
            FloatStatus::Down => FloatStatus::DownPrev,
            FloatStatus::Up => FloatStatus::UpPrev,
            FloatStatus::DownPrev | FloatStatus::None | FloatStatus::UpPrev => FloatStatus::None,
        }
    }
}
