//! Card system: the traits every game card implements.
//!
//! ## Key Types
//!
//! - `Card`: identity plus the back-reference to the owning holder
//! - `Placement`: the id/holder pair a card carries
//! - `Playable`: a card action resolved against a game-supplied context
//!
//! Concrete cards live with their games under `games::`.

pub mod card;

pub use card::{Card, Placement, Playable};
