//! Core engine types: card ids, players, RNG, configuration, errors.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure these via `PileConfig` and `EngineConfig` rather than
//! modifying the core.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{CardUid, ParseCardUidError, UidAllocator};
pub use player::PlayerId;
pub use rng::GameRng;
pub use config::{ZoneId, HolderId, PileConfig, EngineConfig};
pub use error::{EngineError, ErrorKind, Result};
