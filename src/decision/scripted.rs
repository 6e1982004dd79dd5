//! Replayed answers for tests and recorded games.

use std::collections::VecDeque;

use super::{DecisionSource, Query};
use crate::core::player::PlayerId;

/// Answers queries from a queue, in order, regardless of who asks.
///
/// Once the queue runs dry every further query is declined. Every query
/// kind and notice is recorded so tests can assert on the conversation.
#[derive(Clone, Debug)]
pub struct ScriptedDecisions<K> {
    answers: VecDeque<Option<Vec<String>>>,
    asked: Vec<(PlayerId, K)>,
    notices: Vec<(PlayerId, String)>,
}

impl<K> Default for ScriptedDecisions<K> {
    fn default() -> Self {
        Self {
            answers: VecDeque::new(),
            asked: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl<K: Clone> ScriptedDecisions<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer made of one or more words.
    #[must_use]
    pub fn answer(mut self, words: &[&str]) -> Self {
        self.push(words);
        self
    }

    /// Queue a declined query.
    #[must_use]
    pub fn decline(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn push(&mut self, words: &[&str]) {
        self.answers
            .push_back(Some(words.iter().map(|w| (*w).to_string()).collect()));
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn asked(&self) -> &[(PlayerId, K)] {
        &self.asked
    }

    #[must_use]
    pub fn notices(&self) -> &[(PlayerId, String)] {
        &self.notices
    }
}

impl<K: Clone> DecisionSource<K> for ScriptedDecisions<K> {
    fn query(&mut self, player: PlayerId, query: &Query<K>) -> Option<Vec<String>> {
        self.asked.push((player, query.kind.clone()));
        self.answers.pop_front().flatten()
    }

    fn notify(&mut self, player: PlayerId, message: &str) {
        self.notices.push((player, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_in_order_then_declines() {
        let mut source = ScriptedDecisions::new().answer(&["item"]).decline().answer(&["card_1", "card_2"]);
        let query = Query::new("phase_two", vec![]);
        let p0 = PlayerId::new(0);

        assert_eq!(source.query(p0, &query), Some(vec!["item".to_string()]));
        assert_eq!(source.query(p0, &query), None);
        assert_eq!(
            source.query(p0, &query),
            Some(vec!["card_1".to_string(), "card_2".to_string()])
        );
        assert_eq!(source.query(p0, &query), None);
        assert_eq!(source.asked().len(), 4);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_records_notices() {
        let mut source: ScriptedDecisions<&str> = ScriptedDecisions::new();
        source.notify(PlayerId::new(1), "no swaps left");
        assert_eq!(source.notices(), &[(PlayerId::new(1), "no swaps left".to_string())]);
    }
}
