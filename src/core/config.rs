//! Engine configuration types.
//!
//! Games configure the engine at startup by providing:
//! - `PileConfig`: Defines the piles each player owns (deck, hand, bench, ...)
//! - `EngineConfig`: Loop caps and retry limits for the turn driver
//!
//! The engine never hardcodes piles or phases - games define them.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Slot of one pile in a participant's `PileSet`.
///
/// Each game names its slots as constants (`piles::DECK`, `uno::PILE`) and
/// lists them in `PileConfig`s; the engine only compares them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u8);

impl ZoneId {
    #[must_use]
    pub const fn new(slot: u8) -> Self {
        Self(slot)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pile {}", self.0)
    }
}

/// A concrete pile: one zone owned by one participant.
///
/// Cards store this as their back-reference to the holder they sit in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderId {
    pub owner: PlayerId,
    pub zone: ZoneId,
}

impl HolderId {
    #[must_use]
    pub const fn new(owner: PlayerId, zone: ZoneId) -> Self {
        Self { owner, zone }
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.zone)
    }
}

/// Configuration for a single pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileConfig {
    /// Unique identifier for this pile within a player's set.
    pub id: ZoneId,

    /// Human-readable name (for logging/display).
    pub name: String,

    /// Maximum cards allowed. `None` for unlimited.
    pub max_cards: Option<usize>,
}

impl PileConfig {
    /// Create a new, unbounded pile configuration.
    pub fn new(id: ZoneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            max_cards: None,
        }
    }

    /// Set maximum card limit.
    #[must_use]
    pub fn with_max_cards(mut self, max: usize) -> Self {
        self.max_cards = Some(max);
        self
    }
}

/// Limits for the turn driver.
///
/// Every loop that waits on a decision source is bounded by one of these, so
/// a source that declines forever cannot stall a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Phases a single turn may execute before it is force-ended.
    pub max_steps_per_turn: usize,

    /// Turns a game may run before it is called a draw.
    pub max_turns: usize,

    /// Times a required prompt (e.g. choosing an active card) is re-asked.
    pub max_prompt_retries: usize,

    /// Redraws allowed when an opening hand has no playable card.
    pub max_mulligans: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps_per_turn: 256,
            max_turns: 500,
            max_prompt_retries: 8,
            max_mulligans: 16,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_max_steps_per_turn(mut self, steps: usize) -> Self {
        self.max_steps_per_turn = steps;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: usize) -> Self {
        self.max_turns = turns;
        self
    }

    #[must_use]
    pub fn with_max_prompt_retries(mut self, retries: usize) -> Self {
        self.max_prompt_retries = retries;
        self
    }

    #[must_use]
    pub fn with_max_mulligans(mut self, mulligans: usize) -> Self {
        self.max_mulligans = mulligans;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id() {
        let id = ZoneId::new(5);
        assert_eq!(id.index(), 5);
        assert_eq!(id.to_string(), "pile 5");
        assert!(ZoneId::new(1) < ZoneId::new(2));
    }

    #[test]
    fn test_holder_id_display() {
        let holder = HolderId::new(PlayerId::new(1), ZoneId::new(4));
        assert_eq!(holder.to_string(), "Player 1/pile 4");
    }

    #[test]
    fn test_pile_config_builder() {
        let bench = PileConfig::new(ZoneId::new(4), "Bench").with_max_cards(3);

        assert_eq!(bench.name, "Bench");
        assert_eq!(bench.max_cards, Some(3));
        assert_eq!(PileConfig::new(ZoneId::new(0), "Deck").max_cards, None);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::default()
            .with_max_steps_per_turn(10)
            .with_max_turns(20)
            .with_max_prompt_retries(1)
            .with_max_mulligans(0);

        assert_eq!(config.max_steps_per_turn, 10);
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.max_prompt_retries, 1);
        assert_eq!(config.max_mulligans, 0);
    }

    #[test]
    fn test_engine_config_serde() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
