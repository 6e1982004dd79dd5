//! Property tests for piles and the participant rotation.

use flow_ccg::cards::{Card, Placement};
use flow_ccg::core::{EngineError, GameRng, PileConfig, PlayerId, UidAllocator, ZoneId};
use flow_ccg::rules::{GameEnvironment, GameResult, Participant};
use flow_ccg::zones::{PilePosition, PileSet};
use proptest::prelude::*;

#[derive(Debug)]
struct Token {
    placement: Placement,
    weight: u8,
}

impl Card for Token {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn label(&self) -> String {
        format!("token {}", self.weight)
    }
}

const ZONES: [ZoneId; 3] = [ZoneId::new(0), ZoneId::new(1), ZoneId::new(2)];
const SMALL: usize = 2;

fn piles(weights: &[u8]) -> PileSet<Token> {
    let configs = [
        PileConfig::new(ZONES[0], "Deck"),
        PileConfig::new(ZONES[1], "Hand"),
        PileConfig::new(ZONES[2], "Active").with_max_cards(SMALL),
    ];
    let mut set = PileSet::new(PlayerId::new(0), &configs).unwrap();
    let mut uids = UidAllocator::new();
    let deck = set.get_mut(ZONES[0]).unwrap();
    for &weight in weights {
        deck.register_new(Token { placement: Placement::unplaced(), weight }, &mut uids, PilePosition::Back)
            .unwrap();
    }
    set
}

/// Every card sits where its placement says, and ids are unique.
fn assert_consistent(set: &PileSet<Token>) -> Result<(), TestCaseError> {
    let mut seen = Vec::new();
    for pile in set.iter() {
        prop_assert_eq!(pile.ids().len(), pile.len());
        if let Some(capacity) = pile.capacity() {
            prop_assert!(pile.len() <= capacity);
        }
        for (uid, card) in pile.iter() {
            prop_assert_eq!(card.uid(), Some(uid));
            prop_assert_eq!(card.holder(), Some(pile.id()));
            prop_assert!(!seen.contains(&uid));
            seen.push(uid);
        }
    }
    Ok(())
}

#[derive(Debug)]
struct Seat(PlayerId);

impl Participant for Seat {
    fn id(&self) -> PlayerId {
        self.0
    }
}

proptest! {
    #[test]
    fn test_shuffle_keeps_bindings(weights in prop::collection::vec(any::<u8>(), 0..40), seed in any::<u64>()) {
        let mut set = piles(&weights);
        let before: Vec<(u32, u8)> = set.get(ZONES[0]).unwrap().iter().map(|(uid, t)| (uid.raw(), t.weight)).collect();

        let mut rng = GameRng::new(seed);
        set.get_mut(ZONES[0]).unwrap().shuffle(&mut rng);

        let mut after: Vec<(u32, u8)> = set.get(ZONES[0]).unwrap().iter().map(|(uid, t)| (uid.raw(), t.weight)).collect();
        after.sort_unstable();
        prop_assert_eq!(before, after);
        assert_consistent(&set)?;
    }

    #[test]
    fn test_transfers_keep_piles_consistent(
        weights in prop::collection::vec(any::<u8>(), 1..20),
        moves in prop::collection::vec((any::<prop::sample::Index>(), 0usize..3, 0usize..3, any::<bool>()), 0..60),
    ) {
        let mut set = piles(&weights);
        let total = weights.len();

        for (pick, from, to, front) in moves {
            if from == to {
                continue;
            }
            let (from, to) = (ZONES[from], ZONES[to]);
            let source = set.get(from).unwrap();
            if source.is_empty() {
                continue;
            }
            let uid = source.ids()[pick.index(source.len())];
            let position = if front { PilePosition::Front } else { PilePosition::Back };
            let sizes: Vec<usize> = set.iter().map(|pile| pile.len()).collect();

            match set.transfer(uid, from, to, position) {
                Ok(()) => {
                    prop_assert_eq!(set.locate(uid), Some(to));
                    let moved = set.get(to).unwrap().ids();
                    let expected = if front { moved.first() } else { moved.last() };
                    prop_assert_eq!(expected, Some(&uid));
                }
                Err(EngineError::HolderFull { capacity, .. }) => {
                    prop_assert_eq!(capacity, SMALL);
                    prop_assert_eq!(set.locate(uid), Some(from));
                    let unchanged: Vec<usize> = set.iter().map(|pile| pile.len()).collect();
                    prop_assert_eq!(&sizes, &unchanged);
                }
                Err(err) => prop_assert!(false, "unexpected error {err}"),
            }
            prop_assert_eq!(set.total_cards(), total);
            assert_consistent(&set)?;
        }
    }

    #[test]
    fn test_active_count_tracks_rotation(players in 2u8..6, ops in prop::collection::vec((0u8..6, any::<bool>()), 0..30)) {
        let mut env = GameEnvironment::new(0);
        for id in PlayerId::all(usize::from(players)) {
            env.register(Seat(id)).unwrap();
        }

        for (id, leave) in ops {
            if env.result().is_some() {
                break;
            }
            let id = PlayerId::new(id);
            let outcome = if leave { env.deactivate(id) } else { env.activate(id) };
            if id.index() >= usize::from(players) {
                prop_assert_eq!(outcome, Err(EngineError::ParticipantNotFound(id)));
            }

            let active = PlayerId::all(usize::from(players))
                .filter(|&p| env.is_active(p).unwrap())
                .count();
            prop_assert_eq!(env.active_count(), active);
            match env.result() {
                Some(GameResult::Winner(winner)) => {
                    prop_assert_eq!(active, 1);
                    prop_assert!(env.is_active(winner).unwrap());
                }
                Some(GameResult::Draw) => prop_assert_eq!(active, 0),
                None => prop_assert!(active >= 2),
            }
        }
    }
}
