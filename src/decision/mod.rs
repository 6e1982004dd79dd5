//! Decision sources: who answers the engine's questions.
//!
//! Whenever a phase needs a choice (which card to bench, which move to use)
//! the engine issues a `Query` and suspends until the participant's
//! `DecisionSource` answers. Any source may decline by returning `None`;
//! the engine then falls back to a safe phase.
//!
//! ## Implementations
//!
//! - `ScriptedDecisions`: replays a fixed list of answers and records what
//!   was asked (tests, replays)
//! - `RandomDecisions`: picks uniformly among the offered options
//! - `Declining`: never answers

pub mod random;
pub mod scripted;

pub use random::RandomDecisions;
pub use scripted::ScriptedDecisions;

use crate::core::player::PlayerId;

/// A request for a choice.
///
/// `options` lists candidate answers in text form; sources are free to
/// answer outside it, and the engine validates whatever comes back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query<K> {
    pub kind: K,
    pub options: Vec<String>,
}

impl<K> Query<K> {
    pub fn new(kind: K, options: Vec<String>) -> Self {
        Self { kind, options }
    }
}

/// Supplies answers to queries and receives notices.
pub trait DecisionSource<K> {
    /// Answer `query` for `player`, or `None` to decline.
    fn query(&mut self, player: PlayerId, query: &Query<K>) -> Option<Vec<String>>;

    /// Fire-and-forget message to `player`.
    fn notify(&mut self, player: PlayerId, message: &str);
}

/// A source that declines every query.
#[derive(Clone, Copy, Debug, Default)]
pub struct Declining;

impl<K> DecisionSource<K> for Declining {
    fn query(&mut self, _player: PlayerId, _query: &Query<K>) -> Option<Vec<String>> {
        None
    }

    fn notify(&mut self, _player: PlayerId, _message: &str) {}
}
