//! FIDE Dutch System pairing engine for Swiss-system chess tournaments.
//!
//! Feed a [`RoundContext`] the player cards carried over from the previous
//! round, [`resolve`](RoundContext::resolve) it, read the pairings and bye,
//! and [`finalize`](RoundContext::finalize) to get the updated cards back.
//!
//! ```
//! use dutch_pairing::{PlayerCard, RoundContext};
//!
//! let players = vec![
//!     PlayerCard::new("Ada", 2100, 1),
//!     PlayerCard::new("Ben", 2000, 2),
//!     PlayerCard::new("Cem", 1900, 3),
//!     PlayerCard::new("Dia", 1800, 4),
//! ];
//! let mut round = RoundContext::new(players, 1, false, 1.0);
//! round.resolve().unwrap();
//! assert_eq!(round.pairings(), vec![(1, 3), (2, 4)]);
//! let cards = round.finalize().unwrap();
//! assert_eq!(cards.len(), 4);
//! ```

pub mod logic;
pub mod models;

pub use logic::{Criteria, PairingError, PlayerIx, RoundContext, ScoreBracket};
pub use models::{Colour, ColourPref, FloatStatus, PlayerCard, BYE_OPPONENT};
