//! UNO on the generic environment.
//!
//! The shared deck is an NPC seat: it owns cards but never takes a turn.
//! Each player's hand is the single pile of its seat. Card effects (skip,
//! reverse, draw penalties) act on the environment's turn order directly.

mod card;
mod game;

pub use card::{standard_deck, Color, UnoCard, UnoFace, UnoTable};
pub use game::{UnoAction, UnoConfig, UnoGame, UnoQuery};

use crate::core::config::{HolderId, ZoneId};
use crate::core::player::PlayerId;
use crate::rules::Participant;
use crate::zones::Cardholder;

/// Seat of the shared deck.
pub const DECK_SEAT: PlayerId = PlayerId(255);

/// The one pile every seat owns.
pub const PILE: ZoneId = ZoneId::new(0);

/// A player's hand, or the shared deck.
#[derive(Clone, Debug)]
pub struct UnoSeat {
    id: PlayerId,
    npc: bool,
    pub pile: Cardholder<UnoCard>,
}

impl UnoSeat {
    #[must_use]
    pub fn player(id: PlayerId) -> Self {
        Self { id, npc: false, pile: Cardholder::new(HolderId::new(id, PILE), None) }
    }

    #[must_use]
    pub fn deck() -> Self {
        Self { id: DECK_SEAT, npc: true, pile: Cardholder::new(HolderId::new(DECK_SEAT, PILE), None) }
    }
}

impl Participant for UnoSeat {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn is_npc(&self) -> bool {
        self.npc
    }
}
