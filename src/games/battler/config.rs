//! Battler configuration.

use serde::{Deserialize, Serialize};

use super::character::PostDamageInput;
use super::types::piles;
use crate::core::config::{EngineConfig, PileConfig};

/// Rules constants and engine limits for a battler game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Exact deck size required by `initialize_player`.
    pub cards_per_deck: usize,
    pub initial_hand_size: usize,
    /// Energy tokens each player starts with.
    pub initial_tokens: u32,
    /// Knock-outs needed to win.
    pub kos_to_win: u32,
    pub bench_capacity: usize,
    pub post_damage: PostDamageInput,
    pub seed: u64,
    pub engine: EngineConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            cards_per_deck: 20,
            initial_hand_size: 5,
            initial_tokens: 100,
            kos_to_win: 2,
            bench_capacity: 3,
            post_damage: PostDamageInput::Raw,
            seed: 0,
            engine: EngineConfig::default(),
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_cards_per_deck(mut self, count: usize) -> Self {
        self.cards_per_deck = count;
        self
    }

    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_initial_tokens(mut self, tokens: u32) -> Self {
        self.initial_tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_kos_to_win(mut self, kos: u32) -> Self {
        self.kos_to_win = kos;
        self
    }

    #[must_use]
    pub fn with_bench_capacity(mut self, capacity: usize) -> Self {
        self.bench_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_post_damage(mut self, input: PostDamageInput) -> Self {
        self.post_damage = input;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// The five piles every player owns.
    #[must_use]
    pub fn piles(&self) -> Vec<PileConfig> {
        vec![
            PileConfig::new(piles::DECK, "Deck"),
            PileConfig::new(piles::HAND, "Hand"),
            PileConfig::new(piles::ACTIVE, "Active").with_max_cards(1),
            PileConfig::new(piles::DISCARD, "Discard"),
            PileConfig::new(piles::BENCH, "Bench").with_max_cards(self.bench_capacity),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.cards_per_deck, 20);
        assert_eq!(config.initial_hand_size, 5);
        assert_eq!(config.initial_tokens, 100);
        assert_eq!(config.kos_to_win, 2);
        assert_eq!(config.bench_capacity, 3);
        assert_eq!(config.post_damage, PostDamageInput::Raw);
    }

    #[test]
    fn test_piles_follow_bench_capacity() {
        let piles = BattleConfig::new().with_bench_capacity(5).piles();
        let bench = piles.iter().find(|p| p.id == super::piles::BENCH).unwrap();
        assert_eq!(bench.max_cards, Some(5));
        assert_eq!(piles.len(), 5);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = BattleConfig::new().with_seed(9).with_post_damage(PostDamageInput::Final);
        let json = serde_json::to_string(&config).unwrap();
        let back: BattleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
