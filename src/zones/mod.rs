//! Pile system for card locations.
//!
//! Piles are **game-configured**, not hardcoded. Games define their piles
//! (deck, hand, bench, discard, ...) via `PileConfig` at startup.
//!
//! ## Key Types
//!
//! - `Cardholder`: one ordered, keyed pile that owns its cards
//! - `PileSet`: the fixed set of piles a participant owns
//! - `PilePosition`: front or back insertion
//! - `transfer`: atomic move of a card between any two holders

pub mod cardholder;
pub mod pile_set;

pub use cardholder::{transfer, Cardholder, PilePosition};
pub use pile_set::PileSet;

// Re-export pile types from core for convenience
pub use crate::core::config::{HolderId, PileConfig, ZoneId};
