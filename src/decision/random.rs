//! Uniformly random answers, for self-play and soak tests.

use tracing::debug;

use super::{DecisionSource, Query};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Picks one offered option at random, occasionally declining.
#[derive(Clone, Debug)]
pub struct RandomDecisions {
    rng: GameRng,
    decline_probability: f64,
}

impl RandomDecisions {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng, decline_probability: 0.0 }
    }

    /// Decline with the given probability (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn with_decline_probability(mut self, probability: f64) -> Self {
        self.decline_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl<K: std::fmt::Debug> DecisionSource<K> for RandomDecisions {
    fn query(&mut self, player: PlayerId, query: &Query<K>) -> Option<Vec<String>> {
        if query.options.is_empty() || self.rng.gen_bool(self.decline_probability) {
            debug!(target: "engine::decision", %player, kind = ?query.kind, "declined");
            return None;
        }
        let choice = self.rng.choose(&query.options)?.clone();
        debug!(target: "engine::decision", %player, kind = ?query.kind, %choice, "answered");
        Some(vec![choice])
    }

    fn notify(&mut self, player: PlayerId, message: &str) {
        debug!(target: "engine::decision", %player, notice = message, "notice");
    }
}
