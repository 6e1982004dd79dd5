//! The per-player stack of pending phases.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Pending phase tokens, executed last-in first-out.
///
/// Handlers push the phase(s) that should run next; the turn driver pops
/// and executes until the stack is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStack<P> {
    pending: SmallVec<[P; 8]>,
}

impl<P> Default for FlowStack<P> {
    fn default() -> Self {
        Self { pending: SmallVec::new() }
    }
}

impl<P: Copy> FlowStack<P> {
    /// A stack holding a single initial phase.
    #[must_use]
    pub fn starting_at(initial: P) -> Self {
        let mut stack = Self::default();
        stack.push(initial);
        stack
    }

    pub fn push(&mut self, phase: P) {
        self.pending.push(phase);
    }

    pub fn pop(&mut self) -> Option<P> {
        self.pending.pop()
    }

    /// The phase that would run next.
    #[must_use]
    pub fn peek(&self) -> Option<P> {
        self.pending.last().copied()
    }

    /// Drop everything pending and start over at `initial`.
    pub fn reset(&mut self, initial: P) {
        self.pending.clear();
        self.pending.push(initial);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
