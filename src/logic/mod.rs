//! Pairing logic: criteria predicates, the bracket state machine, and the
//! round driver.

mod bracket;
mod criteria;
mod round;

pub use bracket::{PlayerIx, ScoreBracket};
pub use criteria::Criteria;
pub use round::{PairingError, RoundContext};
