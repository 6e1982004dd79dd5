//! Engine error taxonomy.
//!
//! Every fallible operation returns [`EngineError`]. Errors fall into the
//! classes reported by [`EngineError::kind`]:
//!
//! - **Structural**: malformed decks, cards or orders. Fatal during setup.
//! - **NotFound**: an id missing from a pile, hook table or seat list. These
//!   are contract violations by the caller.
//! - **InvalidAction**: a phase precondition or choice was not met. Turn
//!   handlers recover by routing back to a neutral phase.
//! - **Declined**: a decision source gave no answer. Recovered like
//!   `InvalidAction`.
//! - **State**: the environment was asked to do something its current state
//!   forbids (deactivate twice, advance before an order exists).

use thiserror::Error;

use super::config::{HolderId, ZoneId};
use super::entity::CardUid;
use super::player::PlayerId;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{uid} is not held by {holder}")]
    CardNotFound { uid: CardUid, holder: HolderId },

    #[error("{holder} holds no cards")]
    EmptyHolder { holder: HolderId },

    #[error("card already carries id {card}, cannot register it as {supplied}")]
    IdMismatch { card: CardUid, supplied: CardUid },

    #[error("card has no id and none was supplied to {holder}")]
    MissingCardId { holder: HolderId },

    #[error("{uid} is already held by {holder}")]
    DuplicateCard { uid: CardUid, holder: HolderId },

    #[error("{holder} is full ({capacity} cards)")]
    HolderFull { holder: HolderId, capacity: usize },

    #[error("new order for {holder} is not a permutation of its cards")]
    NotAPermutation { holder: HolderId },

    #[error("{owner} has no pile {zone}")]
    UnknownZone { owner: PlayerId, zone: ZoneId },

    #[error("{owner} configures pile {zone} twice")]
    DuplicateZone { owner: PlayerId, zone: ZoneId },

    #[error("no hook registered by {card} in {phase}")]
    HookNotFound { card: CardUid, phase: String },

    #[error("{0} is not registered")]
    ParticipantNotFound(PlayerId),

    #[error("{0} is already registered")]
    DuplicateParticipant(PlayerId),

    #[error("{0} is already active")]
    AlreadyActive(PlayerId),

    #[error("{0} is already inactive")]
    AlreadyInactive(PlayerId),

    #[error("{0} does not take turns")]
    NpcParticipant(PlayerId),

    #[error("invalid turn order: {0}")]
    InvalidOrder(String),

    #[error("turn order has not been established")]
    OrderNotEstablished,

    #[error("no active participant can take the next turn")]
    NoActiveParticipant,

    #[error("deck must hold exactly {expected} cards, got {actual}")]
    DeckSize { expected: usize, actual: usize },

    #[error("malformed card {label}: {reason}")]
    MalformedCard { label: String, reason: String },

    #[error("{player} drew no playable opening hand after {attempts} attempts")]
    MulliganExhausted { player: PlayerId, attempts: usize },

    #[error("cleanup of {0} failed")]
    CleanupFailed(CardUid),

    #[error("{card} cannot {ability}")]
    MissingCapability { card: String, ability: String },

    #[error("{0}")]
    InvalidAction(String),

    #[error("no answer to {0}")]
    Declined(String),
}

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Structural,
    NotFound,
    InvalidAction,
    Declined,
    State,
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            IdMismatch { .. }
            | MissingCardId { .. }
            | DuplicateCard { .. }
            | NotAPermutation { .. }
            | UnknownZone { .. }
            | DuplicateZone { .. }
            | DuplicateParticipant(_)
            | InvalidOrder(_)
            | DeckSize { .. }
            | MalformedCard { .. }
            | MulliganExhausted { .. }
            | CleanupFailed(_) => ErrorKind::Structural,
            CardNotFound { .. } | EmptyHolder { .. } | HookNotFound { .. } | ParticipantNotFound(_) => {
                ErrorKind::NotFound
            }
            HolderFull { .. } | MissingCapability { .. } | InvalidAction(_) => ErrorKind::InvalidAction,
            Declined(_) => ErrorKind::Declined,
            AlreadyActive(_) | AlreadyInactive(_) | NpcParticipant(_) | OrderNotEstablished | NoActiveParticipant => {
                ErrorKind::State
            }
        }
    }

    /// Whether a turn handler may absorb this error and keep the turn going.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidAction | ErrorKind::Declined)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidAction(message.into())
    }

    pub fn declined(query: impl std::fmt::Display) -> Self {
        EngineError::Declined(query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let holder = HolderId::new(PlayerId::new(0), ZoneId::new(1));

        assert_eq!(
            EngineError::CardNotFound { uid: CardUid(3), holder }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(EngineError::DeckSize { expected: 20, actual: 19 }.kind(), ErrorKind::Structural);
        assert_eq!(EngineError::invalid("no swaps").kind(), ErrorKind::InvalidAction);
        assert_eq!(EngineError::declined("phase_two").kind(), ErrorKind::Declined);
        assert_eq!(EngineError::AlreadyInactive(PlayerId::new(1)).kind(), ErrorKind::State);
    }

    #[test]
    fn test_recoverable() {
        let holder = HolderId::new(PlayerId::new(0), ZoneId::new(4));

        assert!(EngineError::invalid("bench is full").is_recoverable());
        assert!(EngineError::HolderFull { holder, capacity: 3 }.is_recoverable());
        assert!(EngineError::declined("switch").is_recoverable());
        assert!(!EngineError::CleanupFailed(CardUid(1)).is_recoverable());
        assert!(!EngineError::EmptyHolder { holder }.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let holder = HolderId::new(PlayerId::new(0), ZoneId::new(1));
        let err = EngineError::CardNotFound { uid: CardUid(9), holder };
        assert_eq!(err.to_string(), "card_9 is not held by Player 0/pile 1");
        assert_eq!(EngineError::declined("switch").to_string(), "no answer to switch");
    }
}
