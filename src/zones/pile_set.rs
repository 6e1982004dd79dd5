//! A participant's fixed set of piles.

use rustc_hash::FxHashMap;

use super::cardholder::{transfer, Cardholder, PilePosition};
use crate::cards::Card;
use crate::core::config::{PileConfig, ZoneId};
use crate::core::entity::CardUid;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;

/// The piles one participant owns, looked up by `ZoneId`.
///
/// Built once from the game's pile configuration; piles are never added or
/// dropped afterwards.
#[derive(Clone, Debug)]
pub struct PileSet<C> {
    owner: PlayerId,
    holders: Vec<Cardholder<C>>,
    index: FxHashMap<ZoneId, usize>,
}

impl<C: Card> PileSet<C> {
    pub fn new(owner: PlayerId, configs: &[PileConfig]) -> Result<Self> {
        let mut index = FxHashMap::default();
        let mut holders = Vec::with_capacity(configs.len());
        for config in configs {
            if index.insert(config.id, holders.len()).is_some() {
                return Err(EngineError::DuplicateZone { owner, zone: config.id });
            }
            holders.push(Cardholder::from_config(owner, config));
        }
        Ok(Self { owner, holders, index })
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    fn slot(&self, zone: ZoneId) -> Result<usize> {
        self.index
            .get(&zone)
            .copied()
            .ok_or(EngineError::UnknownZone { owner: self.owner, zone })
    }

    pub fn get(&self, zone: ZoneId) -> Result<&Cardholder<C>> {
        let slot = self.slot(zone)?;
        Ok(&self.holders[slot])
    }

    pub fn get_mut(&mut self, zone: ZoneId) -> Result<&mut Cardholder<C>> {
        let slot = self.slot(zone)?;
        Ok(&mut self.holders[slot])
    }

    /// Borrow two distinct piles mutably at once.
    pub fn pair_mut(&mut self, a: ZoneId, b: ZoneId) -> Result<(&mut Cardholder<C>, &mut Cardholder<C>)> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        if ia == ib {
            return Err(EngineError::invalid(format!("{a} cannot be paired with itself")));
        }
        if ia < ib {
            let (left, right) = self.holders.split_at_mut(ib);
            Ok((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.holders.split_at_mut(ia);
            Ok((&mut right[0], &mut left[ib]))
        }
    }

    /// Zone currently holding `uid`, if any.
    #[must_use]
    pub fn locate(&self, uid: CardUid) -> Option<ZoneId> {
        self.holders
            .iter()
            .find(|holder| holder.contains(uid))
            .map(|holder| holder.id().zone)
    }

    /// Look a card up in any of the given zones.
    pub fn find_mut(&mut self, uid: CardUid, zones: &[ZoneId]) -> Option<&mut C> {
        let zone = zones
            .iter()
            .copied()
            .find(|&zone| self.get(zone).is_ok_and(|holder| holder.contains(uid)))?;
        self.get_mut(zone).ok()?.get_mut(uid)
    }

    /// Move a card between two of this participant's piles.
    pub fn transfer(&mut self, uid: CardUid, from: ZoneId, to: ZoneId, position: PilePosition) -> Result<()> {
        let (source, destination) = self.pair_mut(from, to)?;
        transfer(uid, source, destination, position)
    }

    /// Swap two cards between piles, each taking the other's place.
    ///
    /// Both cards are validated first; capacity is unaffected since each pile
    /// gives one card and receives one.
    pub fn exchange(&mut self, a: CardUid, a_zone: ZoneId, b: CardUid, b_zone: ZoneId) -> Result<()> {
        let (first, second) = self.pair_mut(a_zone, b_zone)?;
        if !first.contains(a) {
            return Err(EngineError::CardNotFound { uid: a, holder: first.id() });
        }
        if !second.contains(b) {
            return Err(EngineError::CardNotFound { uid: b, holder: second.id() });
        }
        let card_a = first.remove(a)?;
        let card_b = second.remove(b)?;
        first.register(card_b, Some(b), PilePosition::Back)?;
        second.register(card_a, Some(a), PilePosition::Back)?;
        Ok(())
    }

    /// Total cards across every pile.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.holders.iter().map(Cardholder::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cardholder<C>> + '_ {
        self.holders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Placement;

    const DECK: ZoneId = ZoneId::new(0);
    const HAND: ZoneId = ZoneId::new(1);
    const ACTIVE: ZoneId = ZoneId::new(2);

    #[derive(Debug)]
    struct Chip(Placement);

    impl Card for Chip {
        fn placement(&self) -> &Placement {
            &self.0
        }

        fn placement_mut(&mut self) -> &mut Placement {
            &mut self.0
        }

        fn label(&self) -> String {
            "chip".into()
        }
    }

    fn piles() -> PileSet<Chip> {
        PileSet::new(
            PlayerId::new(0),
            &[
                PileConfig::new(DECK, "Deck"),
                PileConfig::new(HAND, "Hand"),
                PileConfig::new(ACTIVE, "Active").with_max_cards(1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_zone_rejected() {
        let result = PileSet::<Chip>::new(
            PlayerId::new(0),
            &[PileConfig::new(DECK, "Deck"), PileConfig::new(DECK, "Again")],
        );
        assert_eq!(
            result.unwrap_err(),
            EngineError::DuplicateZone { owner: PlayerId::new(0), zone: DECK }
        );
    }

    #[test]
    fn test_unknown_zone() {
        let piles = piles();
        assert!(matches!(piles.get(ZoneId::new(9)), Err(EngineError::UnknownZone { .. })));
    }

    #[test]
    fn test_transfer_and_locate() {
        let mut piles = piles();
        piles
            .get_mut(DECK)
            .unwrap()
            .register(Chip(Placement::unplaced()), Some(CardUid(1)), PilePosition::Back)
            .unwrap();

        piles.transfer(CardUid(1), DECK, HAND, PilePosition::Back).unwrap();

        assert_eq!(piles.locate(CardUid(1)), Some(HAND));
        assert_eq!(piles.total_cards(), 1);
        assert!(piles.transfer(CardUid(1), DECK, HAND, PilePosition::Back).is_err());
        assert!(piles.transfer(CardUid(1), HAND, HAND, PilePosition::Back).is_err());
    }

    #[test]
    fn test_exchange_swaps_places() {
        let mut piles = piles();
        piles
            .get_mut(ACTIVE)
            .unwrap()
            .register(Chip(Placement::unplaced()), Some(CardUid(1)), PilePosition::Back)
            .unwrap();
        piles
            .get_mut(HAND)
            .unwrap()
            .register(Chip(Placement::unplaced()), Some(CardUid(2)), PilePosition::Back)
            .unwrap();

        piles.exchange(CardUid(1), ACTIVE, CardUid(2), HAND).unwrap();

        assert_eq!(piles.locate(CardUid(1)), Some(HAND));
        assert_eq!(piles.locate(CardUid(2)), Some(ACTIVE));
        assert!(piles.find_mut(CardUid(2), &[HAND, ACTIVE]).is_some());
        assert!(piles.find_mut(CardUid(2), &[DECK]).is_none());
    }
}
