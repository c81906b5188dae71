//! Data model: player cards and the colour/float primitive value types.

mod player;
mod types;

pub use player::{PlayerCard, BYE_OPPONENT};
pub use types::{Colour, ColourPref, FloatStatus};
