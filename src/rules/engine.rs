//! Participant contract and game results.
//!
//! Anything seated in a `GameEnvironment` implements `Participant`:
//! - Whether it takes turns at all (NPC holders such as a shared deck don't)
//! - What happens when its turn begins and ends

use crate::core::player::PlayerId;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(p) => Some(*p),
            GameResult::Draw => None,
        }
    }
}

/// What a participant asks for when its turn ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitSignal {
    Stay,
    /// Remove this participant from the rotation.
    Deactivate,
}

/// A seat in a game environment.
pub trait Participant {
    fn id(&self) -> PlayerId;

    /// NPC holders own cards but never take turns.
    fn is_npc(&self) -> bool {
        false
    }

    /// Called when this participant becomes the current one.
    fn on_entry(&mut self) {}

    /// Called when this participant's turn ends.
    fn on_exit(&mut self) -> ExitSignal {
        ExitSignal::Stay
    }
}
