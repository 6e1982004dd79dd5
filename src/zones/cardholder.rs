//! Ordered, keyed card piles.
//!
//! A `Cardholder` owns its cards and remembers their order. Index 0 of the
//! order is the *front* of the pile: `peek` looks there, and drawing from a
//! deck takes the front card.
//!
//! ## Usage
//!
//! ```
//! use flow_ccg::cards::{Card, Placement};
//! use flow_ccg::core::{HolderId, PlayerId, UidAllocator, ZoneId};
//! use flow_ccg::zones::{Cardholder, PilePosition};
//!
//! struct Chip(Placement);
//!
//! impl Card for Chip {
//!     fn placement(&self) -> &Placement { &self.0 }
//!     fn placement_mut(&mut self) -> &mut Placement { &mut self.0 }
//!     fn label(&self) -> String { "chip".into() }
//! }
//!
//! let mut uids = UidAllocator::new();
//! let mut deck = Cardholder::new(HolderId::new(PlayerId::new(0), ZoneId::new(0)), None);
//!
//! let first = deck.register_new(Chip(Placement::unplaced()), &mut uids, PilePosition::Back).unwrap();
//! let second = deck.register_new(Chip(Placement::unplaced()), &mut uids, PilePosition::Front).unwrap();
//!
//! assert_eq!(deck.ids(), &[second, first]);
//! assert_eq!(deck.peek().unwrap().0, second);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::Card;
use crate::core::config::{HolderId, PileConfig};
use crate::core::entity::{CardUid, UidAllocator};
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Where a registered card lands in the pile order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilePosition {
    /// Becomes the new front card.
    Front,
    /// Appended after the current last card.
    #[default]
    Back,
    /// Lands at this index, or at the back when the pile is shorter.
    At(usize),
}

/// An ordered collection of cards keyed by `CardUid`.
#[derive(Clone, Debug)]
pub struct Cardholder<C> {
    id: HolderId,
    cards: FxHashMap<CardUid, C>,
    order: Vec<CardUid>,
    capacity: Option<usize>,
}

impl<C: Card> Cardholder<C> {
    /// Create an empty holder. `capacity` of `None` means unbounded.
    #[must_use]
    pub fn new(id: HolderId, capacity: Option<usize>) -> Self {
        Self {
            id,
            cards: FxHashMap::default(),
            order: Vec::new(),
            capacity,
        }
    }

    /// Create an empty holder for `owner` from a pile configuration.
    #[must_use]
    pub fn from_config(owner: PlayerId, config: &PileConfig) -> Self {
        Self::new(HolderId::new(owner, config.id), config.max_cards)
    }

    #[must_use]
    pub fn id(&self) -> HolderId {
        self.id
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.order.len() >= cap)
    }

    #[must_use]
    pub fn contains(&self, uid: CardUid) -> bool {
        self.cards.contains_key(&uid)
    }

    #[must_use]
    pub fn get(&self, uid: CardUid) -> Option<&C> {
        self.cards.get(&uid)
    }

    pub fn get_mut(&mut self, uid: CardUid) -> Option<&mut C> {
        self.cards.get_mut(&uid)
    }

    /// Card ids front to back.
    #[must_use]
    pub fn ids(&self) -> &[CardUid] {
        &self.order
    }

    /// Index of `uid` counted from the front.
    #[must_use]
    pub fn position(&self, uid: CardUid) -> Option<usize> {
        self.order.iter().position(|&held| held == uid)
    }

    /// Cards front to back.
    pub fn iter(&self) -> impl Iterator<Item = (CardUid, &C)> + '_ {
        self.order
            .iter()
            .filter_map(move |uid| self.cards.get(uid).map(|card| (*uid, card)))
    }

    /// Check that `uid` could be registered here right now.
    pub fn can_accept(&self, uid: CardUid) -> Result<()> {
        if self.cards.contains_key(&uid) {
            return Err(EngineError::DuplicateCard { uid, holder: self.id });
        }
        if let Some(capacity) = self.capacity {
            if self.order.len() >= capacity {
                return Err(EngineError::HolderFull { holder: self.id, capacity });
            }
        }
        Ok(())
    }

    /// Attach a card to this holder.
    ///
    /// The card keeps an id it already carries; `uid` is only needed for a
    /// card that has never been registered, and must match when both exist.
    pub fn register(&mut self, mut card: C, uid: Option<CardUid>, position: PilePosition) -> Result<CardUid> {
        let uid = match (card.uid(), uid) {
            (Some(own), Some(supplied)) if own != supplied => {
                return Err(EngineError::IdMismatch { card: own, supplied });
            }
            (Some(own), _) => own,
            (None, Some(supplied)) => supplied,
            (None, None) => return Err(EngineError::MissingCardId { holder: self.id }),
        };
        self.can_accept(uid)?;

        let placement = card.placement_mut();
        placement.uid = Some(uid);
        placement.holder = Some(self.id);

        self.cards.insert(uid, card);
        match position {
            PilePosition::Front => self.order.insert(0, uid),
            PilePosition::Back => self.order.push(uid),
            PilePosition::At(index) => self.order.insert(index.min(self.order.len()), uid),
        }
        trace!(target: "engine::piles", holder = %self.id, %uid, "registered card");
        Ok(uid)
    }

    /// Attach a card, allocating a fresh id if it has none.
    pub fn register_new(&mut self, card: C, uids: &mut UidAllocator, position: PilePosition) -> Result<CardUid> {
        let uid = match card.uid() {
            Some(uid) => uid,
            None => uids.alloc(),
        };
        self.register(card, Some(uid), position)
    }

    /// Detach and return a card. Its id is kept; its holder is cleared.
    pub fn remove(&mut self, uid: CardUid) -> Result<C> {
        let mut card = self
            .cards
            .remove(&uid)
            .ok_or(EngineError::CardNotFound { uid, holder: self.id })?;
        self.order.retain(|&held| held != uid);
        card.placement_mut().holder = None;
        trace!(target: "engine::piles", holder = %self.id, %uid, "removed card");
        Ok(card)
    }

    /// The front-most card, without removing it.
    pub fn peek(&self) -> Result<(CardUid, &C)> {
        let uid = *self.order.first().ok_or(EngineError::EmptyHolder { holder: self.id })?;
        let card = self
            .cards
            .get(&uid)
            .ok_or(EngineError::CardNotFound { uid, holder: self.id })?;
        Ok((uid, card))
    }

    /// Id of the front-most card, if any.
    #[must_use]
    pub fn front(&self) -> Option<CardUid> {
        self.order.first().copied()
    }

    /// Randomize the order. The set of (id, card) bindings is untouched.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.order);
    }

    /// Replace the order with a permutation of the current ids.
    pub fn reorder(&mut self, new_order: Vec<CardUid>) -> Result<()> {
        let unique: FxHashSet<CardUid> = new_order.iter().copied().collect();
        let is_permutation = new_order.len() == self.order.len()
            && unique.len() == new_order.len()
            && unique.iter().all(|uid| self.cards.contains_key(uid));
        if !is_permutation {
            return Err(EngineError::NotAPermutation { holder: self.id });
        }
        self.order = new_order;
        Ok(())
    }

    /// Remove every card, front to back.
    pub fn drain(&mut self) -> Vec<C> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|uid| self.cards.remove(&uid))
            .map(|mut card| {
                card.placement_mut().holder = None;
                card
            })
            .collect()
    }
}

/// Move a card between two holders, keeping its id.
///
/// The destination is validated before the source is touched, so on any
/// error both holders are left exactly as they were.
pub fn transfer<C: Card>(
    uid: CardUid,
    from: &mut Cardholder<C>,
    to: &mut Cardholder<C>,
    position: PilePosition,
) -> Result<()> {
    if !from.contains(uid) {
        return Err(EngineError::CardNotFound { uid, holder: from.id() });
    }
    to.can_accept(uid)?;
    let card = from.remove(uid)?;
    to.register(card, Some(uid), position)?;
    tracing::debug!(target: "engine::piles", %uid, from = %from.id(), to = %to.id(), "transferred card");
    Ok(())
}
