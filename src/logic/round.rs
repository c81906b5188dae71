//! Round context: the driver that walks the score brackets from the top and
//! performs the cross-bracket moves the bracket machines request.

use std::collections::HashSet;
use std::fmt;
use std::mem;

use crate::logic::bracket::{member_order, BracketEnv, PlayerIx, ScoreBracket, Step};
use crate::models::{Colour, PlayerCard};

/// Failure modes of one round's pairing.
#[derive(Clone, Debug, PartialEq)]
pub enum PairingError {
    /// A bracket stayed unpairable after every relaxation, backtrack and
    /// collapse option was used up.
    UnresolvableBracket { score: f64 },
    /// A partition was requested with more players in S1 than S2.
    InvalidPartition { top: usize, bottom: usize },
    /// The state machine reached a transition its bookkeeping forbids.
    StateViolation(&'static str),
    /// Results were requested before the round resolved.
    RoundNotResolved,
}

impl fmt::Display for PairingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingError::UnresolvableBracket { score } => {
                write!(f, "score bracket {score} cannot be paired")
            }
            PairingError::InvalidPartition { top, bottom } => {
                write!(f, "invalid bracket partition: |S1| = {top} > |S2| = {bottom}")
            }
            PairingError::StateViolation(msg) => write!(f, "pairing state violation: {msg}"),
            PairingError::RoundNotResolved => {
                write!(f, "round results requested before the round was resolved")
            }
        }
    }
}

impl std::error::Error for PairingError {}

/// One round of pairing: owns the card arena and the bracket list, resolves
/// the brackets top down, and commits the outcome back onto the cards.
pub struct RoundContext {
    players: Vec<PlayerCard>,
    brackets: Vec<ScoreBracket>,
    round_no: u32,
    last_round: bool,
    bye_value: f64,
    /// Players moved down a bracket during this round's resolution.
    downfloated: HashSet<PlayerIx>,
    /// Downfloats already undone once; a second undo is not allowed.
    backtracked: HashSet<PlayerIx>,
    resolved: bool,
}

impl RoundContext {
    /// Group the players into score brackets, highest score first.
    pub fn new(players: Vec<PlayerCard>, round_no: u32, last_round: bool, bye_value: f64) -> Self {
        let mut order: Vec<PlayerIx> = (0..players.len()).collect();
        order.sort_by(|&a, &b| member_order(&players, a, b));
        let mut brackets: Vec<ScoreBracket> = Vec::new();
        for px in order {
            let score = players[px].score;
            match brackets.last_mut() {
                Some(b) if b.score() == score => b.members_mut().push(px),
                _ => brackets.push(ScoreBracket::new(score, vec![px])),
            }
        }
        log::info!(
            "round {}: {} player(s) in {} score bracket(s)",
            round_no,
            players.len(),
            brackets.len()
        );
        Self {
            players,
            brackets,
            round_no,
            last_round,
            bye_value,
            downfloated: HashSet::new(),
            backtracked: HashSet::new(),
            resolved: false,
        }
    }

    /// Number of score brackets currently held.
    pub fn bracket_count(&self) -> usize {
        self.brackets.len()
    }

    pub fn brackets(&self) -> &[ScoreBracket] {
        &self.brackets
    }

    /// Resolve every bracket from the top. A backtrack or collapse rewinds
    /// the walk to the affected bracket, which starts over.
    pub fn resolve(&mut self) -> Result<(), PairingError> {
        if self.resolved {
            return Ok(());
        }
        let mut ix = 0;
        while ix < self.brackets.len() {
            let (round_no, last_round) = (self.round_no, self.last_round);
            self.brackets[ix].begin(round_no, last_round);
            ix = self.resolve_bracket(ix)?;
        }
        self.resolved = true;
        log::info!(
            "round {}: resolved, {} pairing(s), bye: {}",
            self.round_no,
            self.pairings().len(),
            self.bye().is_some()
        );
        Ok(())
    }

    /// Step one bracket to a terminal move and return the index to continue
    /// the walk at.
    fn resolve_bracket(&mut self, ix: usize) -> Result<usize, PairingError> {
        loop {
            let env = BracketEnv {
                is_lowest: ix + 1 == self.brackets.len(),
                prev_members: ix.checked_sub(1).map(|p| self.brackets[p].members().len()),
                downfloated: &self.downfloated,
                backtracked: &self.backtracked,
            };
            let step = self.brackets[ix].step(&self.players, &env)?;
            match step {
                Step::Continue => {}
                Step::Resolved(floaters) => {
                    for px in floaters {
                        self.downfloat(ix, px);
                    }
                    return Ok(ix + 1);
                }
                Step::Downfloat(px) => {
                    self.downfloat(ix, px);
                }
                Step::Backtrack(px) => {
                    self.backtrack(ix, px);
                    return Ok(ix - 1);
                }
                Step::CollapseIntoNext => {
                    self.collapse_into_next(ix);
                    return Ok(ix);
                }
                Step::CollapsePrevIntoThis => {
                    self.collapse_prev_into_this(ix);
                    return Ok(ix - 1);
                }
                Step::Fail => {
                    return Err(PairingError::UnresolvableBracket {
                        score: self.brackets[ix].score(),
                    });
                }
            }
        }
    }

    fn downfloat(&mut self, ix: usize, px: PlayerIx) {
        self.downfloated.insert(px);
        self.move_player(ix, ix + 1, px);
        log::debug!(
            "round {}: player {} floats down from bracket {}",
            self.round_no,
            self.players[px].pairing_no,
            self.brackets[ix].score()
        );
    }

    fn backtrack(&mut self, ix: usize, px: PlayerIx) {
        self.backtracked.insert(px);
        self.move_player(ix, ix - 1, px);
        log::debug!(
            "round {}: player {} is moved back up to bracket {}",
            self.round_no,
            self.players[px].pairing_no,
            self.brackets[ix - 1].score()
        );
    }

    fn move_player(&mut self, from: usize, to: usize, px: PlayerIx) {
        if let Some(pos) = self.brackets[from].members().iter().position(|&m| m == px) {
            self.brackets[from].members_mut().remove(pos);
            self.brackets[to].members_mut().push(px);
        }
    }

    /// C14: the bracket gives up and merges downward; the merged bracket
    /// keeps the lower score.
    fn collapse_into_next(&mut self, ix: usize) {
        let members = mem::take(self.brackets[ix].members_mut());
        log::debug!(
            "round {}: bracket {} collapses into bracket {}",
            self.round_no,
            self.brackets[ix].score(),
            self.brackets[ix + 1].score()
        );
        self.brackets[ix + 1].members_mut().extend(members);
        self.brackets.remove(ix);
    }

    /// C13: the lowest bracket absorbs the one above it and both are redone.
    fn collapse_prev_into_this(&mut self, ix: usize) {
        let members = mem::take(self.brackets[ix - 1].members_mut());
        log::debug!(
            "round {}: bracket {} absorbs bracket {}",
            self.round_no,
            self.brackets[ix].score(),
            self.brackets[ix - 1].score()
        );
        self.brackets[ix].members_mut().extend(members);
        self.brackets.remove(ix - 1);
    }

    /// Resolved pairings as (white-seat, black-seat is decided at commit)
    /// pairing-number tuples, bracket by bracket from the top.
    pub fn pairings(&self) -> Vec<(u32, u32)> {
        self.brackets
            .iter()
            .flat_map(|b| b.pairings().iter())
            .map(|&(a, b)| (self.players[a].pairing_no, self.players[b].pairing_no))
            .collect()
    }

    /// Pairing number of the bye recipient, if any.
    pub fn bye(&self) -> Option<u32> {
        self.brackets
            .iter()
            .find_map(|b| b.bye().map(|px| self.players[px].pairing_no))
    }

    /// Commit the resolved round onto the cards and hand them back.
    pub fn finalize(mut self) -> Result<Vec<PlayerCard>, PairingError> {
        if !self.resolved || self.brackets.iter().any(|b| !b.is_resolved()) {
            return Err(PairingError::RoundNotResolved);
        }
        for bracket in &self.brackets {
            let pairs = bracket.pairings().to_vec();
            for (a, b) in pairs {
                let colour = assign_colours(&self.players[a], &self.players[b]);
                let (first, second) = two_mut(&mut self.players, a, b);
                PlayerCard::pair_both(first, second, colour);
            }
            if let Some(px) = bracket.bye() {
                self.players[px].bye(self.bye_value);
            }
        }
        Ok(self.players)
    }
}

/// E-rule colour allocation for one pairing: the player with the stronger
/// preference (ties broken by score, then pairing number) gets their due
/// colour; a fully neutral chooser takes White.
fn assign_colours(a: &PlayerCard, b: &PlayerCard) -> Colour {
    let a_chooses = a
        .colour_preference()
        .strength()
        .cmp(&b.colour_preference().strength())
        .then(a.score.total_cmp(&b.score))
        .then(b.pairing_no.cmp(&a.pairing_no))
        == std::cmp::Ordering::Greater;
    let chooser = if a_chooses { a } else { b };
    let due = match chooser.expected_colour() {
        Colour::None => Colour::White,
        c => c,
    };
    if a_chooses {
        due
    } else {
        due.opposite()
    }
}

/// Two disjoint mutable borrows into the card arena.
fn two_mut(players: &mut [PlayerCard], a: usize, b: usize) -> (&mut PlayerCard, &mut PlayerCard) {
    if a < b {
        let (head, tail) = players.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = players.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}
