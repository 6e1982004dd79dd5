//! # flow-ccg
//!
//! A turn-flow engine for hand-and-pile card games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic Core**: piles, phases and query kinds are supplied by
//!    each game. The engine only knows ids, ordered piles and hook tables.
//!
//! 2. **Phases on a Stack**: a player's turn is a stack of phase tokens.
//!    Handlers pop one, run the hooks cards injected for it, and push what
//!    comes next.
//!
//! 3. **Hooks Owned by Cards**: every hook is keyed by the id of the card
//!    that installed it, so the card can remove exactly what it added.
//!
//! ## Architecture
//!
//! - **No Back-Pointers**: cards name their holder by `HolderId`; handlers
//!   receive explicit `&mut` contexts instead of reaching into parents.
//!
//! - **Deterministic**: all shuffles and coin flips draw from a seeded
//!   ChaCha8 `GameRng`, so every game replays from its seed.
//!
//! ## Modules
//!
//! - `core`: card ids, players, RNG, configuration, errors
//! - `cards`: the `Card` and `Playable` traits
//! - `zones`: cardholders, pile sets and atomic transfer
//! - `flow`: flow stacks and injection tables
//! - `rules`: participants, the game environment and results
//! - `decision`: queries and the sources that answer them
//! - `games`: the battler and UNO

pub mod core;
pub mod cards;
pub mod zones;
pub mod flow;
pub mod rules;
pub mod decision;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    CardUid, UidAllocator, PlayerId,
    GameRng,
    ZoneId, HolderId, PileConfig, EngineConfig,
    EngineError, ErrorKind, Result,
};

pub use crate::cards::{Card, Placement, Playable};

pub use crate::zones::{transfer, Cardholder, PilePosition, PileSet};

pub use crate::flow::{FlowStack, InjectionTable, TurnSignal};

pub use crate::rules::{ExitSignal, GameEnvironment, GameResult, Participant, TurnChange};

pub use crate::decision::{Declining, DecisionSource, Query, RandomDecisions, ScriptedDecisions};
