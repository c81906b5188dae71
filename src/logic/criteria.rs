//! Criteria evaluator: the B-rule predicates of the Dutch system.
//!
//! Every method is a pure predicate over player card state. The relax flags
//! are owned by the bracket currently evaluating and are flipped one at a
//! time by the C10 relaxation ladder; nothing here mutates a card.

use crate::models::{FloatStatus, PlayerCard};

/// Pairing criteria B1..B6 with their relaxation flags, all initially on.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// B5 protection against two downfloats in consecutive rounds.
    pub b5_down: bool,
    /// B5 protection against two upfloats in consecutive rounds.
    pub b5_up: bool,
    /// B6: like B5-down, two rounds back.
    pub b6_down: bool,
    /// B6: like B5-up, two rounds back.
    pub b6_up: bool,
    /// A7d: in odd rounds a mild preference already counts as absolute.
    pub a7d: bool,
    /// While set, B2 applies to final-round top scorers as well.
    pub b2_top_scorer: bool,
    round_no: u32,
    last_round: bool,
}

impl Criteria {
    pub fn new(round_no: u32, last_round: bool) -> Self {
        Self {
            b5_down: true,
            b5_up: true,
            b6_down: true,
            b6_up: true,
            a7d: true,
            b2_top_scorer: true,
            round_no,
            last_round,
        }
    }

    /// Re-enable the four float-protection flags (ladder re-entry through C3).
    pub(crate) fn reset_float_protection(&mut self) {
        self.b5_down = true;
        self.b5_up = true;
        self.b6_down = true;
        self.b6_up = true;
    }

    /// Magnitude at which a colour preference becomes absolute for B2.
    fn absolute_threshold(&self) -> u32 {
        if self.round_no % 2 == 1 && self.a7d {
            1
        } else {
            2
        }
    }

    /// Half the maximum score reachable before this round.
    fn half_max_score(&self) -> f64 {
        self.round_no.saturating_sub(1) as f64 / 2.0
    }

    /// B1a: the two players have not met before.
    pub fn b1a(&self, p: &PlayerCard, q: &PlayerCard) -> bool {
        !p.has_played(q)
    }

    /// B1b: the player has never received a bye.
    pub fn b1b(&self, p: &PlayerCard) -> bool {
        !p.had_bye()
    }

    /// B2: two absolute preferences on the same side cannot meet, except for
    /// a final-round top scorer once the exemption has been unlocked.
    pub fn b2(&self, p: &PlayerCard, q: &PlayerCard) -> bool {
        let threshold = self.absolute_threshold();
        let (a, b) = (p.colour_preference(), q.colour_preference());
        if !(a.is_absolute(threshold) && b.is_absolute(threshold) && a.preferred() == b.preferred())
        {
            return true;
        }
        self.last_round
            && !self.b2_top_scorer
            && (p.score > self.half_max_score() || q.score > self.half_max_score())
    }

    /// B4: number of pairs whose expected colours coincide. Acceptable while
    /// it stays within the bracket's current violation budget.
    pub fn b4(&self, pairs: &[(&PlayerCard, &PlayerCard)]) -> usize {
        pairs
            .iter()
            .filter(|(p, q)| p.expected_colour() == q.expected_colour())
            .count()
    }

    /// B5 for a pair: the lower scorer must not float up two rounds running.
    pub fn b5_pair(&self, p: &PlayerCard, q: &PlayerCard) -> bool {
        if !self.b5_up || p.score == q.score {
            return true;
        }
        let lower = if p.score < q.score { p } else { q };
        lower.float_status != FloatStatus::Up
    }

    /// B5 for a downfloater: no two downfloats in consecutive rounds.
    pub fn b5_floater(&self, p: &PlayerCard) -> bool {
        !self.b5_down || p.float_status != FloatStatus::Down
    }

    /// B6 for a pair: like B5 but looking two rounds back.
    pub fn b6_pair(&self, p: &PlayerCard, q: &PlayerCard) -> bool {
        if !self.b6_up || p.score == q.score {
            return true;
        }
        let lower = if p.score < q.score { p } else { q };
        lower.float_status != FloatStatus::UpPrev
    }

    /// B6 for a downfloater: no downfloat repeat from two rounds ago.
    pub fn b6_floater(&self, p: &PlayerCard) -> bool {
        !self.b6_down || p.float_status != FloatStatus::DownPrev
    }

    /// C1 compatibility: the two criteria a bracket can never relax away.
    pub fn compatible(&self, p: &PlayerCard, q: &PlayerCard) -> bool {
        self.b1a(p, q) && self.b2(p, q)
    }

    /// Aggregate check for one candidate pairing of a bracket: pairwise
    /// B1a/B2/B5/B6, B4 over the whole set against the budget `x`, float
    /// protection for a lone downfloater, B1b for a bye recipient.
    pub fn satisfied(
        &self,
        pairs: &[(&PlayerCard, &PlayerCard)],
        x: usize,
        floater: Option<&PlayerCard>,
        bye: Option<&PlayerCard>,
    ) -> bool {
        pairs.iter().all(|&(p, q)| {
            self.b1a(p, q) && self.b2(p, q) && self.b5_pair(p, q) && self.b6_pair(p, q)
        }) && self.b4(pairs) <= x
            && floater.map_or(true, |f| self.b5_floater(f) && self.b6_floater(f))
            && bye.map_or(true, |b| self.b1b(b))
    }
}
