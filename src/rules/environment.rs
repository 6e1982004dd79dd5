//! The game environment: seats, turn order and win detection.
//!
//! `GameEnvironment` owns every participant and drives whose turn it is:
//!
//! 1. Participants are registered. Turn-taking ones start active; NPC
//!    holders are seated but never active.
//! 2. `establish_order` fixes the cyclic turn order once.
//! 3. `next_turn` ends the current turn and hands over to the next active
//!    participant, skipping deactivated ones.
//!
//! Deactivating participants until one remains declares that one the
//! winner. The environment also owns the card id counter and the game RNG.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use super::engine::{ExitSignal, GameResult, Participant};
use crate::core::entity::UidAllocator;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Outcome of [`GameEnvironment::next_turn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnChange {
    /// The turn passed from one participant to another.
    Passed { from: PlayerId, to: PlayerId },
    /// The game is over.
    Finished(GameResult),
}

#[derive(Clone, Debug)]
struct Seat<P> {
    participant: P,
    active: bool,
}

#[derive(Clone, Debug)]
pub struct GameEnvironment<P> {
    seats: Vec<Seat<P>>,
    index: FxHashMap<PlayerId, usize>,
    order: Vec<PlayerId>,
    current: Option<PlayerId>,
    winner: Option<PlayerId>,
    finished: bool,
    active_count: usize,
    uids: UidAllocator,
    rng: GameRng,
}

impl<P: Participant> GameEnvironment<P> {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seats: Vec::new(),
            index: FxHashMap::default(),
            order: Vec::new(),
            current: None,
            winner: None,
            finished: false,
            active_count: 0,
            uids: UidAllocator::new(),
            rng: GameRng::new(seed),
        }
    }

    /// Seat a participant. Turn-taking participants start active.
    pub fn register(&mut self, participant: P) -> Result<PlayerId> {
        let id = participant.id();
        if self.index.contains_key(&id) {
            return Err(EngineError::DuplicateParticipant(id));
        }
        let active = !participant.is_npc();
        if active {
            self.active_count += 1;
        }
        self.index.insert(id, self.seats.len());
        self.seats.push(Seat { participant, active });
        debug!(target: "engine::env", player = %id, active, "participant registered");
        Ok(id)
    }

    fn slot(&self, id: PlayerId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(EngineError::ParticipantNotFound(id))
    }

    pub fn get(&self, id: PlayerId) -> Result<&P> {
        let slot = self.slot(id)?;
        Ok(&self.seats[slot].participant)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Result<&mut P> {
        let slot = self.slot(id)?;
        Ok(&mut self.seats[slot].participant)
    }

    /// Borrow two distinct participants mutably at once.
    pub fn pair_mut(&mut self, a: PlayerId, b: PlayerId) -> Result<(&mut P, &mut P)> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        if ia == ib {
            return Err(EngineError::invalid(format!("{a} cannot be paired with itself")));
        }
        if ia < ib {
            let (left, right) = self.seats.split_at_mut(ib);
            Ok((&mut left[ia].participant, &mut right[0].participant))
        } else {
            let (left, right) = self.seats.split_at_mut(ia);
            Ok((&mut right[0].participant, &mut left[ib].participant))
        }
    }

    /// A participant together with the id counter and RNG, for setup code
    /// that registers and shuffles cards.
    pub fn seat_with_tools(&mut self, id: PlayerId) -> Result<(&mut P, &mut UidAllocator, &mut GameRng)> {
        let slot = self.slot(id)?;
        Ok((&mut self.seats[slot].participant, &mut self.uids, &mut self.rng))
    }

    pub fn participants(&self) -> impl Iterator<Item = &P> + '_ {
        self.seats.iter().map(|seat| &seat.participant)
    }

    pub fn is_active(&self, id: PlayerId) -> Result<bool> {
        let slot = self.slot(id)?;
        Ok(self.seats[slot].active)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Take a participant out of the rotation.
    ///
    /// When exactly one active participant remains it becomes the winner;
    /// when none remain the game ends in a draw.
    pub fn deactivate(&mut self, id: PlayerId) -> Result<()> {
        let slot = self.slot(id)?;
        let seat = &mut self.seats[slot];
        if !seat.active {
            return Err(EngineError::AlreadyInactive(id));
        }
        seat.active = false;
        self.active_count -= 1;
        info!(target: "engine::env", player = %id, remaining = self.active_count, "participant deactivated");

        match self.active_count {
            0 => self.finished = true,
            1 if self.winner.is_none() => {
                let last = self
                    .seats
                    .iter()
                    .find(|seat| seat.active)
                    .map(|seat| seat.participant.id());
                if let Some(last) = last {
                    self.declare_winner(last);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Put a deactivated participant back into the rotation.
    pub fn activate(&mut self, id: PlayerId) -> Result<()> {
        let slot = self.slot(id)?;
        let seat = &mut self.seats[slot];
        if seat.participant.is_npc() {
            return Err(EngineError::NpcParticipant(id));
        }
        if seat.active {
            return Err(EngineError::AlreadyActive(id));
        }
        seat.active = true;
        self.active_count += 1;
        debug!(target: "engine::env", player = %id, "participant activated");
        Ok(())
    }

    /// Record a winner by explicit rule. The game is over afterwards.
    pub fn declare_winner(&mut self, id: PlayerId) {
        info!(target: "engine::env", winner = %id, "winner declared");
        self.winner = Some(id);
        self.finished = true;
    }

    /// Fix the turn order. It must name every turn-taking participant exactly
    /// once; its first entry takes the first turn.
    pub fn establish_order(&mut self, order: Vec<PlayerId>) -> Result<()> {
        let expected: FxHashSet<PlayerId> = self
            .seats
            .iter()
            .filter(|seat| !seat.participant.is_npc())
            .map(|seat| seat.participant.id())
            .collect();
        let given: FxHashSet<PlayerId> = order.iter().copied().collect();

        if given.len() != order.len() {
            return Err(EngineError::InvalidOrder("a participant appears twice".into()));
        }
        if let Some(npc) = order.iter().find(|id| !expected.contains(id)) {
            return Err(EngineError::InvalidOrder(format!("{npc} is not a turn-taking participant")));
        }
        if given != expected {
            return Err(EngineError::InvalidOrder("every turn-taking participant must be listed".into()));
        }
        let first = *order
            .first()
            .ok_or_else(|| EngineError::InvalidOrder("order is empty".into()))?;

        info!(target: "engine::env", ?order, "turn order established");
        self.order = order;
        self.current = Some(first);
        Ok(())
    }

    #[must_use]
    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    #[must_use]
    pub fn current(&self) -> Option<PlayerId> {
        self.current
    }

    /// Point the turn at a specific participant.
    pub fn set_current(&mut self, id: PlayerId) -> Result<()> {
        if !self.order.contains(&id) {
            return Err(EngineError::InvalidOrder(format!("{id} is not in the turn order")));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Reverse the direction of play. The current participant is unchanged.
    pub fn reverse_order(&mut self) {
        self.order.reverse();
    }

    /// The next active participant after `from` in cyclic order.
    pub fn next_player(&self, from: PlayerId) -> Result<PlayerId> {
        if self.order.is_empty() {
            return Err(EngineError::OrderNotEstablished);
        }
        let position = self
            .order
            .iter()
            .position(|&id| id == from)
            .ok_or_else(|| EngineError::InvalidOrder(format!("{from} is not in the turn order")))?;

        let len = self.order.len();
        (1..=len)
            .map(|step| self.order[(position + step) % len])
            .find(|&id| self.index.get(&id).is_some_and(|&slot| self.seats[slot].active))
            .ok_or(EngineError::NoActiveParticipant)
    }

    /// End the current turn and hand over to the next participant.
    ///
    /// Runs the outgoing participant's exit hook (which may deactivate it),
    /// stops if the game is now decided, and otherwise runs the incoming
    /// participant's entry hook.
    pub fn next_turn(&mut self) -> Result<TurnChange> {
        if let Some(result) = self.result() {
            return Ok(TurnChange::Finished(result));
        }
        let from = self.current.ok_or(EngineError::OrderNotEstablished)?;

        let slot = self.slot(from)?;
        if self.seats[slot].active && self.seats[slot].participant.on_exit() == ExitSignal::Deactivate {
            self.deactivate(from)?;
        }
        if let Some(result) = self.result() {
            return Ok(TurnChange::Finished(result));
        }

        let to = self.next_player(from)?;
        self.current = Some(to);
        self.get_mut(to)?.on_entry();
        debug!(target: "engine::env", %from, %to, "turn passed");
        Ok(TurnChange::Passed { from, to })
    }

    /// Forget a declared winner so the game can continue. A game with no
    /// active participant stays finished.
    pub fn clear_winner(&mut self) {
        self.winner = None;
        self.finished = self.active_count == 0;
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// `Some` once the game is decided.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        match (self.winner, self.finished) {
            (Some(winner), _) => Some(GameResult::Winner(winner)),
            (None, true) => Some(GameResult::Draw),
            (None, false) => None,
        }
    }

    pub fn uids(&mut self) -> &mut UidAllocator {
        &mut self.uids
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }
}
