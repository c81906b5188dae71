//! PlayerCard: the per-tournament pairing record for one participant.

use crate::models::types::{Colour, ColourPref, FloatStatus};
use serde::{Deserialize, Serialize};

/// Pairing number reserved for the phantom bye opponent.
pub const BYE_OPPONENT: u32 = 0;

/// One participant's card: identity plus the running tournament state the
/// pairing criteria read. The mutable parts are only ever written when a
/// round is committed, never during trial search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerCard {
    pub name: String,
    pub rating: u32,
    pub title: Option<String>,
    /// Unique positive pairing number; 0 is reserved for the bye opponent.
    pub pairing_no: u32,
    pub score: f64,
    /// Pairing numbers of the opponents played so far, 0 for a bye.
    pub opponents: Vec<u32>,
    /// Colour held in each round, same length as `opponents`.
    pub colour_hist: Vec<Colour>,
    pub float_status: FloatStatus,
}

impl PlayerCard {
    /// Create a card for a player entering the tournament.
    pub fn new(name: impl Into<String>, rating: u32, pairing_no: u32) -> Self {
        Self {
            name: name.into(),
            rating,
            title: None,
            pairing_no,
            score: 0.0,
            opponents: Vec::new(),
            colour_hist: Vec::new(),
            float_status: FloatStatus::None,
        }
    }

    /// Rounds this player has been through (paired or byed).
    pub fn rounds_played(&self) -> usize {
        self.opponents.len()
    }

    /// Aggregate colour imbalance: the whole history and the last two games
    /// actually played are summed separately and the stronger signal wins;
    /// a tie goes to the whole history.
    pub fn colour_preference(&self) -> ColourPref {
        let total: i32 = self.colour_hist.iter().map(|c| c.weight()).sum();
        let recent: i32 = self
            .colour_hist
            .iter()
            .rev()
            .filter(|c| **c != Colour::None)
            .take(2)
            .map(|c| c.weight())
            .sum();
        ColourPref(if recent.abs() > total.abs() { recent } else { total })
    }

    /// Colour this player is due next: the preferred colour when the
    /// preference is non-zero, otherwise the alternation of the last colour
    /// actually played (none before the first game).
    pub fn expected_colour(&self) -> Colour {
        match self.colour_preference().preferred() {
            Colour::None => self
                .colour_hist
                .iter()
                .rev()
                .find(|c| **c != Colour::None)
                .map_or(Colour::None, |c| c.opposite()),
            due => due,
        }
    }

    /// Append one played game to the history. Float status: up against a
    /// higher score, down against a lower one; an equal-score game lets an
    /// earlier float decay one round.
    pub fn pair(&mut self, opponent_no: u32, opponent_score: f64, colour: Colour) {
        self.opponents.push(opponent_no);
        self.colour_hist.push(colour);
        self.float_status = if opponent_score > self.score {
            FloatStatus::Up
        } else if opponent_score < self.score {
            FloatStatus::Down
        } else {
            self.float_status.decayed()
        };
    }

    /// Commit one pairing to both cards; `colour` is what `first` holds.
    pub fn pair_both(first: &mut PlayerCard, second: &mut PlayerCard, colour: Colour) {
        let (no_1, score_1) = (first.pairing_no, first.score);
        let (no_2, score_2) = (second.pairing_no, second.score);
        first.pair(no_2, score_2, colour);
        second.pair(no_1, score_1, colour.opposite());
    }

    /// Commit a bye: phantom opponent, no colour, a forced downfloat, and
    /// the bye point value.
    pub fn bye(&mut self, bye_value: f64) {
        self.opponents.push(BYE_OPPONENT);
        self.colour_hist.push(Colour::None);
        self.float_status = FloatStatus::Down;
        self.score += bye_value;
    }

    /// Whether this player has already received a bye in this tournament.
    pub fn had_bye(&self) -> bool {
        self.opponents.contains(&BYE_OPPONENT)
    }

    /// Whether `other` is already in this player's opponent history.
    pub fn has_played(&self, other: &PlayerCard) -> bool {
        self.opponents.contains(&other.pairing_no)
    }
}
