//! Score bracket resolution: the per-bracket state machine of the Dutch
//! system, states named after the rule clauses C1..C14.
//!
//! The machine is an explicit loop over a `State` enum rather than chained
//! calls, so the backtracking ladder stays tractable. Everything it touches
//! while searching is trial state inside the bracket; player cards are only
//! written when the round context commits. Moves that cross a bracket
//! boundary (downfloat, backtrack, collapse) are handed back to the driving
//! round context as a `Step` and never performed peer to peer.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::logic::criteria::Criteria;
use crate::logic::round::PairingError;
use crate::models::{Colour, PlayerCard};

/// Index of a player in the round's card arena.
pub type PlayerIx = usize;

/// Rule clause the machine executes next.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    C1,
    C2,
    C2b,
    C3,
    C4,
    C5,
    C6,
    C7,
    C8,
    C9,
    C10,
    C12,
    C13,
    C14,
}

/// What the driving round context must do before the machine can continue.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    /// Internal transition, keep stepping.
    Continue,
    /// Bracket resolved; the listed members leave as downfloaters.
    Resolved(Vec<PlayerIx>),
    /// C1 wants this member moved to the next bracket, then retries.
    Downfloat(PlayerIx),
    /// Undo this player's earlier downfloat and re-enter the previous bracket.
    Backtrack(PlayerIx),
    /// C14: merge this bracket into the next one.
    CollapseIntoNext,
    /// C13/C14: merge the previous bracket into this one.
    CollapsePrevIntoThis,
    /// Every relaxation, backtrack and collapse option is exhausted.
    Fail,
}

/// Read-only view of the round state a bracket needs while stepping.
pub(crate) struct BracketEnv<'a> {
    pub is_lowest: bool,
    /// Member count of the previous bracket, if one exists.
    pub prev_members: Option<usize>,
    pub downfloated: &'a HashSet<PlayerIx>,
    pub backtracked: &'a HashSet<PlayerIx>,
}

impl BracketEnv<'_> {
    fn can_downfloat(&self, px: PlayerIx) -> bool {
        !self.is_lowest && !self.downfloated.contains(&px)
    }

    /// Only a player downfloated this round can be backtracked, once.
    fn can_backtrack(&self, px: PlayerIx) -> bool {
        self.prev_members.is_some()
            && self.downfloated.contains(&px)
            && !self.backtracked.contains(&px)
    }
}

/// Snapshot of the outer search while a homogeneous remainder is paired;
/// restored by C9 when the remainder turns out to be unpairable.
#[derive(Clone, Debug)]
struct SavedSearch {
    working: Vec<PlayerIx>,
    s1: Vec<PlayerIx>,
    s2: Vec<PlayerIx>,
    s1_base: Vec<PlayerIx>,
    s2_base: Vec<PlayerIx>,
    p: usize,
    exchange_k: usize,
    exchange_ix: usize,
    exchanges: Vec<(Vec<PlayerIx>, Vec<PlayerIx>)>,
}

/// One score group and the trial state of its resolution.
#[derive(Clone, Debug)]
pub struct ScoreBracket {
    score: f64,
    members: Vec<PlayerIx>,

    state: State,
    criteria: Criteria,
    round_no: u32,
    last_round: bool,

    // C2 parameters; C14 shrinks them between attempts.
    params_seeded: bool,
    p1: usize,
    m1: usize,
    x1: usize,
    z1: usize,
    p: usize,
    x: usize,
    z: usize,
    forced_homogeneous: bool,
    incompatible: Option<PlayerIx>,

    // Working partition of the current search level (outer or remainder).
    working: Vec<PlayerIx>,
    s1: Vec<PlayerIx>,
    s2: Vec<PlayerIx>,
    s1_base: Vec<PlayerIx>,
    s2_base: Vec<PlayerIx>,
    exchange_k: usize,
    exchange_ix: usize,
    exchanges: Vec<(Vec<PlayerIx>, Vec<PlayerIx>)>,
    saved: Option<SavedSearch>,
    /// Outer pairs held while the homogeneous remainder is being paired.
    staged: Vec<(PlayerIx, PlayerIx)>,

    // Trial result, committed to cards only by the round context.
    pairings: Vec<(PlayerIx, PlayerIx)>,
    bye: Option<PlayerIx>,
    resolved: bool,
}

impl ScoreBracket {
    pub(crate) fn new(score: f64, members: Vec<PlayerIx>) -> Self {
        Self {
            score,
            members,
            state: State::C1,
            criteria: Criteria::new(1, false),
            round_no: 1,
            last_round: false,
            params_seeded: false,
            p1: 0,
            m1: 0,
            x1: 0,
            z1: 0,
            p: 0,
            x: 0,
            z: 0,
            forced_homogeneous: false,
            incompatible: None,
            working: Vec::new(),
            s1: Vec::new(),
            s2: Vec::new(),
            s1_base: Vec::new(),
            s2_base: Vec::new(),
            exchange_k: 0,
            exchange_ix: 0,
            exchanges: Vec::new(),
            saved: None,
            staged: Vec::new(),
            pairings: Vec::new(),
            bye: None,
            resolved: false,
        }
    }

    /// Score this bracket stands for; movers-down carry a higher one.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Colour-violation budget the bracket resolved under (final `x`).
    pub fn colour_budget(&self) -> usize {
        self.x
    }

    /// Trial pairings as arena indices (meaningful once resolved).
    pub fn pairings(&self) -> &[(PlayerIx, PlayerIx)] {
        &self.pairings
    }

    /// Trial bye recipient, if this bracket hands one out.
    pub fn bye(&self) -> Option<PlayerIx> {
        self.bye
    }

    pub(crate) fn members(&self) -> &[PlayerIx] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<PlayerIx> {
        &mut self.members
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Reset all trial state for a fresh resolution attempt.
    pub(crate) fn begin(&mut self, round_no: u32, last_round: bool) {
        self.state = State::C1;
        self.criteria = Criteria::new(round_no, last_round);
        self.round_no = round_no;
        self.last_round = last_round;
        self.params_seeded = false;
        self.p1 = 0;
        self.m1 = 0;
        self.x1 = 0;
        self.z1 = 0;
        self.p = 0;
        self.x = 0;
        self.z = 0;
        self.forced_homogeneous = false;
        self.incompatible = None;
        self.working.clear();
        self.s1.clear();
        self.s2.clear();
        self.s1_base.clear();
        self.s2_base.clear();
        self.exchange_k = 0;
        self.exchange_ix = 0;
        self.exchanges.clear();
        self.saved = None;
        self.staged.clear();
        self.pairings.clear();
        self.bye = None;
        self.resolved = false;
    }

    /// Run one state transition.
    pub(crate) fn step(
        &mut self,
        players: &[PlayerCard],
        env: &BracketEnv,
    ) -> Result<Step, PairingError> {
        let step = match self.state {
            State::C1 => self.c1(players, env),
            State::C2 => self.c2(players),
            State::C2b => self.c2b(players),
            State::C3 => self.c3(),
            State::C4 => return self.c4(players),
            State::C5 => self.c5(players),
            State::C6 => self.c6(players, env),
            State::C7 => self.c7(players),
            State::C8 => self.c8(players),
            State::C9 => return self.c9(),
            State::C10 => self.c10(),
            State::C12 => self.c12(env),
            State::C13 => self.c13(players, env),
            State::C14 => self.c14(players, env),
        };
        Ok(step)
    }

    /// Movers-down present and a strict minority, unless C14b forced the
    /// bracket to be treated homogeneously.
    fn heterogeneous(&self) -> bool {
        !self.forced_homogeneous && self.m1 > 0 && 2 * self.m1 < self.members.len()
    }

    fn compute_pair_counts(&mut self, players: &[PlayerCard]) {
        self.p1 = self.members.len() / 2;
        self.m1 = self
            .members
            .iter()
            .filter(|&&px| players[px].score > self.score)
            .count();
    }

    /// Seeds for the colour-violation budgets: `x1` counts the pairings that
    /// cannot satisfy both expected colours once every colour-neutral player
    /// has been assigned to the minority side; `z1` discounts, in even
    /// rounds, the mild preferences sitting on the majority side.
    fn compute_colour_seeds(&mut self, players: &[PlayerCard]) {
        let mut white = 0usize;
        let mut black = 0usize;
        let mut neutral = 0usize;
        for &px in &self.members {
            match players[px].expected_colour() {
                Colour::White => white += 1,
                Colour::Black => black += 1,
                Colour::None => neutral += 1,
            }
        }
        let majority = white.max(black);
        let minority = white.min(black) + neutral;
        self.x1 = majority.abs_diff(minority) / 2;
        self.z1 = if self.round_no % 2 == 1 {
            self.x1
        } else {
            let majority_colour = match white.cmp(&black) {
                Ordering::Greater => Colour::White,
                Ordering::Less => Colour::Black,
                Ordering::Equal => Colour::None,
            };
            let mild_majority = if majority_colour == Colour::None {
                0
            } else {
                self.members
                    .iter()
                    .filter(|&&px| {
                        let pref = players[px].colour_preference();
                        pref.is_mild() && pref.preferred() == majority_colour
                    })
                    .count()
            };
            self.x1.saturating_sub(mild_majority)
        };
        self.params_seeded = true;
    }

    /// C12/C13 can reach C14 straight from C1, before C2 ran.
    fn seed_params_if_needed(&mut self, players: &[PlayerCard]) {
        if !self.params_seeded {
            self.compute_pair_counts(players);
            self.compute_colour_seeds(players);
        }
    }

    /// Restart the partition search keeping flags and budgets (ladder re-entry).
    fn reenter(&mut self) -> Step {
        self.p = if self.heterogeneous() { self.m1 } else { self.p1 };
        self.saved = None;
        self.staged.clear();
        self.working = self.members.clone();
        self.state = State::C4;
        Step::Continue
    }

    /// Record the trial result. Card mutation waits for the round commit.
    fn commit(
        &mut self,
        pairs: Vec<(PlayerIx, PlayerIx)>,
        bye: Option<PlayerIx>,
        floaters: Vec<PlayerIx>,
    ) -> Step {
        log::debug!(
            "bracket {}: resolved with {} pairing(s), bye: {}, downfloaters: {}",
            self.score,
            pairs.len(),
            bye.is_some(),
            floaters.len()
        );
        self.pairings = pairs;
        self.bye = bye;
        self.resolved = true;
        Step::Resolved(floaters)
    }

    /// C1: every member needs at least one compatible partner (B1a and B2);
    /// in the lowest bracket an available bye counts. A member without one
    /// is the bracket's incompatible player and escalates.
    fn c1(&mut self, players: &[PlayerCard], env: &BracketEnv) -> Step {
        if self.members.is_empty() {
            log::debug!("bracket {}: empty, nothing to pair", self.score);
            self.resolved = true;
            return Step::Resolved(Vec::new());
        }
        for &px in &self.members {
            let card = &players[px];
            let has_partner = self
                .members
                .iter()
                .any(|&qx| qx != px && self.criteria.compatible(card, &players[qx]));
            let bye_open = env.is_lowest && self.criteria.b1b(card);
            if has_partner || bye_open {
                continue;
            }
            self.incompatible = Some(px);
            log::debug!(
                "bracket {}: player {} has no compatible opponent",
                self.score,
                card.pairing_no
            );
            if card.score > self.score {
                self.state = State::C12;
                return Step::Continue;
            }
            if env.is_lowest {
                self.state = State::C13;
                return Step::Continue;
            }
            if env.can_downfloat(px) {
                // State stays C1: re-check the shrunken bracket after the move.
                return Step::Downfloat(px);
            }
            self.state = State::C13;
            return Step::Continue;
        }
        self.state = State::C2;
        Step::Continue
    }

    /// C2: initial pairing parameters.
    fn c2(&mut self, players: &[PlayerCard]) -> Step {
        self.compute_pair_counts(players);
        self.state = State::C2b;
        Step::Continue
    }

    /// C2b: colour-violation budget seeds.
    fn c2b(&mut self, players: &[PlayerCard]) -> Step {
        self.compute_colour_seeds(players);
        self.state = State::C3;
        Step::Continue
    }

    /// C3: pick `p`, re-arm the float protections, seed the budgets.
    fn c3(&mut self) -> Step {
        self.criteria.reset_float_protection();
        self.x = self.x1;
        self.z = self.z1;
        self.reenter()
    }

    /// C4: sort the working set and split it into S1/S2.
    fn c4(&mut self, players: &[PlayerCard]) -> Result<Step, PairingError> {
        sort_members(players, &mut self.working);
        let bottom = self.working.len().saturating_sub(self.p);
        if self.p > bottom {
            return Err(PairingError::InvalidPartition {
                top: self.p,
                bottom,
            });
        }
        self.s1 = self.working[..self.p].to_vec();
        self.s2 = self.working[self.p..].to_vec();
        self.s1_base = self.s1.clone();
        self.s2_base = self.s2.clone();
        self.exchange_k = 0;
        self.exchange_ix = 0;
        self.exchanges.clear();
        self.state = State::C5;
        Ok(Step::Continue)
    }

    /// C5: re-sort both halves (needed after an exchange).
    fn c5(&mut self, players: &[PlayerCard]) -> Step {
        sort_members(players, &mut self.s1);
        sort_members(players, &mut self.s2);
        self.state = State::C6;
        Step::Continue
    }

    /// C6: evaluate the pairing S1[i]-S2[i]; handle the leftover as bye,
    /// single floater, homogeneous remainder, or group downfloat.
    fn c6(&mut self, players: &[PlayerCard], env: &BracketEnv) -> Step {
        let top = self.s1.len();
        let pairs: Vec<(PlayerIx, PlayerIx)> = self
            .s1
            .iter()
            .copied()
            .zip(self.s2.iter().copied())
            .collect();
        let leftover: Vec<PlayerIx> = self.s2[top..].to_vec();

        // B4 spans the whole bracket, so staged outer pairs count too.
        let mut all_pairs = self.staged.clone();
        all_pairs.extend(&pairs);
        let card_pairs: Vec<(&PlayerCard, &PlayerCard)> = all_pairs
            .iter()
            .map(|&(a, b)| (&players[a], &players[b]))
            .collect();

        match leftover.len() {
            0 => {
                if self.criteria.satisfied(&card_pairs, self.x, None, None) {
                    return self.commit(all_pairs, None, Vec::new());
                }
            }
            1 => {
                let lone = leftover[0];
                if env.is_lowest {
                    if self
                        .criteria
                        .satisfied(&card_pairs, self.x, None, Some(&players[lone]))
                    {
                        return self.commit(all_pairs, Some(lone), Vec::new());
                    }
                } else if self
                    .criteria
                    .satisfied(&card_pairs, self.x, Some(&players[lone]), None)
                {
                    if env.can_downfloat(lone) {
                        return self.commit(all_pairs, None, vec![lone]);
                    }
                    // Another member may be able to float instead: keep searching.
                }
            }
            _ => {
                if self.saved.is_none() && self.heterogeneous() {
                    // Movers are paired; the resident remainder is paired on
                    // its own, re-running from C4 with p recomputed.
                    if self.criteria.satisfied(&card_pairs, self.x, None, None) {
                        self.saved = Some(SavedSearch {
                            working: self.working.clone(),
                            s1: self.s1.clone(),
                            s2: self.s2.clone(),
                            s1_base: self.s1_base.clone(),
                            s2_base: self.s2_base.clone(),
                            p: self.p,
                            exchange_k: self.exchange_k,
                            exchange_ix: self.exchange_ix,
                            exchanges: self.exchanges.clone(),
                        });
                        self.staged = all_pairs;
                        self.working = leftover;
                        self.p = self.working.len() / 2;
                        self.state = State::C4;
                        return Step::Continue;
                    }
                } else if !env.is_lowest {
                    // A homogeneous bracket with a shrunken p1 floats every
                    // leftover down together.
                    let float_ok = leftover.iter().all(|&fx| {
                        env.can_downfloat(fx)
                            && self.criteria.b5_floater(&players[fx])
                            && self.criteria.b6_floater(&players[fx])
                    });
                    if float_ok && self.criteria.satisfied(&card_pairs, self.x, None, None) {
                        return self.commit(all_pairs, None, leftover);
                    }
                }
                // In the lowest bracket more than one leftover is never satisfiable.
            }
        }
        self.state = State::C7;
        Step::Continue
    }

    /// C7: advance S2 to the next transposition (the next lexicographic
    /// arrangement of its first |S1| positions; the tail order is irrelevant).
    fn c7(&mut self, players: &[PlayerCard]) -> Step {
        let prefix = self.s1.len();
        if prefix < self.s2.len() {
            // Make the current arrangement the last one with this prefix, so
            // the next permutation moves the prefix itself.
            self.s2[prefix..].reverse();
        }
        if next_permutation(&mut self.s2, |a, b| member_order(players, a, b)) {
            self.state = State::C6;
        } else if self.saved.is_none() && self.heterogeneous() {
            self.state = State::C10;
        } else {
            self.state = State::C8;
        }
        Step::Continue
    }

    /// C8: apply the next subset exchange between the untransposed S1 and S2,
    /// smallest subsets first, then retry from C5.
    fn c8(&mut self, players: &[PlayerCard]) -> Step {
        let limit = self.s1_base.len().min(self.s2_base.len());
        if self.exchange_k == 0 {
            self.exchange_k = 1;
            self.build_exchanges(players);
            self.exchange_ix = 0;
        } else {
            self.exchange_ix += 1;
        }
        while self.exchange_ix >= self.exchanges.len() {
            self.exchange_k += 1;
            if self.exchange_k > limit {
                self.state = if self.saved.is_some() {
                    State::C9
                } else {
                    State::C10
                };
                return Step::Continue;
            }
            self.build_exchanges(players);
            self.exchange_ix = 0;
        }
        let (move_down, move_up) = self.exchanges[self.exchange_ix].clone();
        self.s1 = self
            .s1_base
            .iter()
            .copied()
            .filter(|px| !move_down.contains(px))
            .chain(move_up.iter().copied())
            .collect();
        self.s2 = self
            .s2_base
            .iter()
            .copied()
            .filter(|px| !move_up.contains(px))
            .chain(move_down.iter().copied())
            .collect();
        self.state = State::C5;
        Step::Continue
    }

    /// Enumerate all k-subset swaps, ordered by the absolute score
    /// difference of the swapped subsets, then by pairing numbers.
    fn build_exchanges(&mut self, players: &[PlayerCard]) {
        let k = self.exchange_k;
        let down = combinations(&self.s1_base, k);
        let up = combinations(&self.s2_base, k);
        let mut all = Vec::with_capacity(down.len() * up.len());
        for d in &down {
            for u in &up {
                all.push((d.clone(), u.clone()));
            }
        }
        let subset_score =
            |set: &[PlayerIx]| set.iter().map(|&px| players[px].score).sum::<f64>();
        let pn_key = |set: &[PlayerIx]| {
            let mut key: Vec<u32> = set.iter().map(|&px| players[px].pairing_no).collect();
            key.sort_unstable();
            key
        };
        all.sort_by(|a, b| {
            let da = (subset_score(&a.0) - subset_score(&a.1)).abs();
            let db = (subset_score(&b.0) - subset_score(&b.1)).abs();
            da.total_cmp(&db)
                .then_with(|| pn_key(&a.0).cmp(&pn_key(&b.0)))
                .then_with(|| pn_key(&a.1).cmp(&pn_key(&b.1)))
        });
        self.exchanges = all;
    }

    /// C9: the homogeneous remainder could not be paired; restore the outer
    /// search and move its transposition cursor forward.
    fn c9(&mut self) -> Result<Step, PairingError> {
        let saved = self.saved.take().ok_or(PairingError::StateViolation(
            "remainder search resumed without a saved outer search",
        ))?;
        self.working = saved.working;
        self.s1 = saved.s1;
        self.s2 = saved.s2;
        self.s1_base = saved.s1_base;
        self.s2_base = saved.s2_base;
        self.p = saved.p;
        self.exchange_k = saved.exchange_k;
        self.exchange_ix = saved.exchange_ix;
        self.exchanges = saved.exchanges;
        self.staged.clear();
        self.state = State::C7;
        Ok(Step::Continue)
    }

    /// C10: the relaxation ladder. Drop the float protections one at a time,
    /// widen the colour budgets up to p1, then (final round only) give up
    /// A7d and the top-scorer shield before conceding to C14.
    fn c10(&mut self) -> Step {
        if self.criteria.b6_up {
            self.criteria.b6_up = false;
            log::trace!("bracket {}: relaxing B6 for upfloats", self.score);
            return self.reenter();
        }
        if self.criteria.b5_up {
            self.criteria.b5_up = false;
            log::trace!("bracket {}: relaxing B5 for upfloats", self.score);
            return self.reenter();
        }
        if self.criteria.b6_down {
            self.criteria.b6_down = false;
            log::trace!("bracket {}: relaxing B6 for downfloats", self.score);
            return self.reenter();
        }
        if self.criteria.b5_down {
            self.criteria.b5_down = false;
            log::trace!("bracket {}: relaxing B5 for downfloats", self.score);
            return self.reenter();
        }
        let widened = if self.round_no % 2 == 1 {
            if self.x < self.p1 {
                self.x += 1;
                self.z = self.x;
                true
            } else {
                false
            }
        } else if self.z < self.x {
            self.z += 1;
            true
        } else if self.x < self.p1 {
            self.x += 1;
            true
        } else {
            false
        };
        if widened {
            log::trace!(
                "bracket {}: widened colour budget to x={} z={}",
                self.score,
                self.x,
                self.z
            );
            return self.reenter();
        }
        if self.last_round && self.criteria.a7d {
            self.criteria.a7d = false;
            log::debug!("bracket {}: final round, dropping A7d", self.score);
            self.state = State::C3;
            return Step::Continue;
        }
        if self.last_round && self.criteria.b2_top_scorer {
            self.criteria.b2_top_scorer = false;
            log::debug!(
                "bracket {}: final round, unlocking B2 top-scorer exemption",
                self.score
            );
            self.state = State::C3;
            return Step::Continue;
        }
        self.state = State::C14;
        Step::Continue
    }

    /// C12: the incompatible player outscores the bracket; undo the downfloat
    /// that brought them here if that is still allowed.
    fn c12(&mut self, env: &BracketEnv) -> Step {
        if let Some(px) = self.incompatible {
            if env.can_backtrack(px) {
                return Step::Backtrack(px);
            }
        }
        self.state = State::C14;
        Step::Continue
    }

    /// C13: the incompatible player sits in the lowest bracket.
    fn c13(&mut self, players: &[PlayerCard], env: &BracketEnv) -> Step {
        self.seed_params_if_needed(players);
        if self.heterogeneous() {
            self.state = State::C14;
            return Step::Continue;
        }
        if let Some(px) = self.incompatible {
            if env.can_backtrack(px) {
                return Step::Backtrack(px);
            }
        }
        match env.prev_members {
            Some(n) if n > 0 => Step::CollapsePrevIntoThis,
            _ => {
                log::warn!(
                    "bracket {}: unresolvable, no previous bracket left to collapse",
                    self.score
                );
                Step::Fail
            }
        }
    }

    /// C14: no valid pairing exists at the current parameters. Shrink `m1`
    /// for heterogeneous brackets (down to forcing homogeneous treatment),
    /// else shrink `p1`; at zero, collapse.
    fn c14(&mut self, players: &[PlayerCard], env: &BracketEnv) -> Step {
        self.seed_params_if_needed(players);
        if self.heterogeneous() {
            self.m1 -= 1;
            if self.m1 == 0 {
                self.forced_homogeneous = true;
            }
            log::debug!(
                "bracket {}: shrinking movers-down to m1={}",
                self.score,
                self.m1
            );
            self.state = State::C3;
            return Step::Continue;
        }
        if self.p1 > 0 {
            self.p1 -= 1;
            self.x1 = self.x1.min(self.p1);
            self.z1 = self.z1.min(self.p1);
            log::debug!("bracket {}: shrinking pair count to p1={}", self.score, self.p1);
        }
        if self.p1 == 0 {
            if !env.is_lowest {
                return Step::CollapseIntoNext;
            }
            return match env.prev_members {
                Some(n) if n > 0 => Step::CollapsePrevIntoThis,
                _ => {
                    log::warn!(
                        "bracket {}: unresolvable, nothing left to collapse",
                        self.score
                    );
                    Step::Fail
                }
            };
        }
        self.state = State::C3;
        Step::Continue
    }
}

/// Dutch ordering: score descending, then pairing number ascending.
pub(crate) fn member_order(players: &[PlayerCard], a: PlayerIx, b: PlayerIx) -> Ordering {
    players[b]
        .score
        .total_cmp(&players[a].score)
        .then(players[a].pairing_no.cmp(&players[b].pairing_no))
}

fn sort_members(players: &[PlayerCard], set: &mut [PlayerIx]) {
    set.sort_by(|&a, &b| member_order(players, a, b));
}

/// Advance `seq` to its next permutation under `less`; false once `seq` was
/// the last one.
fn next_permutation(
    seq: &mut [PlayerIx],
    less: impl Fn(PlayerIx, PlayerIx) -> Ordering,
) -> bool {
    if seq.len() < 2 {
        return false;
    }
    let mut i = seq.len() - 1;
    while i > 0 && less(seq[i - 1], seq[i]) != Ordering::Less {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = seq.len() - 1;
    while less(seq[i - 1], seq[j]) != Ordering::Less {
        j -= 1;
    }
    seq.swap(i - 1, j);
    seq[i..].reverse();
    true
}

/// All k-element subsets of `set`, in positional order.
fn combinations(set: &[PlayerIx], k: usize) -> Vec<Vec<PlayerIx>> {
    if k > set.len() {
        return Vec::new();
    }
    if k == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| set[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + set.len() - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
