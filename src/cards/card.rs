//! The minimal card contract.
//!
//! A card knows its own id and which holder it currently sits in. Holders
//! keep that back-reference in sync on every register and remove, so game
//! code can ask a card where it is without searching every pile.

use serde::{Deserialize, Serialize};

use crate::core::config::HolderId;
use crate::core::entity::CardUid;
use crate::core::error::Result;

/// Identity and location of a card.
///
/// `uid` is assigned on first registration and never changes afterwards.
/// `holder` is `None` while the card is in transit between piles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub uid: Option<CardUid>,
    pub holder: Option<HolderId>,
}

impl Placement {
    /// A placement for a card that has never been registered.
    #[must_use]
    pub const fn unplaced() -> Self {
        Self { uid: None, holder: None }
    }
}

/// Anything a `Cardholder` can hold.
pub trait Card {
    fn placement(&self) -> &Placement;

    fn placement_mut(&mut self) -> &mut Placement;

    /// Short human-readable name for logs and notices.
    fn label(&self) -> String;

    /// Structural validity check run before a card enters a game.
    fn check(&self) -> Result<()> {
        Ok(())
    }

    fn uid(&self) -> Option<CardUid> {
        self.placement().uid
    }

    fn holder(&self) -> Option<HolderId> {
        self.placement().holder
    }
}

/// A card with an action that can be played against some context.
///
/// `Ctx` carries whatever the game lets the card touch while it resolves.
/// Returns `Ok(false)` when the card could not be played in the current
/// situation, and `Err` when the request itself was malformed.
pub trait Playable<Ctx: ?Sized>: Card {
    type Action: Copy + std::fmt::Debug;

    fn play_card(&mut self, action: Self::Action, ctx: &mut Ctx) -> Result<bool>;
}
