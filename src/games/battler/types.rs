//! Vocabulary of the battler: instruments, phases, queries and choices.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::core::config::ZoneId;

/// Pile ids every battler player owns.
pub mod piles {
    use crate::core::config::ZoneId;

    pub const DECK: ZoneId = ZoneId::new(0);
    pub const HAND: ZoneId = ZoneId::new(1);
    pub const ACTIVE: ZoneId = ZoneId::new(2);
    pub const DISCARD: ZoneId = ZoneId::new(3);
    pub const BENCH: ZoneId = ZoneId::new(4);
}

/// Piles a character can fight from.
pub const IN_PLAY: [ZoneId; 2] = [piles::ACTIVE, piles::BENCH];

/// Character and energy types.
///
/// Each playable instrument is weak to one other instrument and resists
/// another; both relations form a single directed cycle. `All` is the
/// wildcard energy type and has neither.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Instrument {
    Woodwind,
    Percussion,
    Piano,
    String,
    Guitar,
    Choir,
    Brass,
    All,
}

impl Instrument {
    pub const COUNT: usize = 8;

    /// The attacking instrument this one takes extra damage from.
    #[must_use]
    pub const fn weakness(self) -> Option<Instrument> {
        use Instrument::*;
        match self {
            String => Some(Guitar),
            Guitar => Some(Woodwind),
            Woodwind => Some(Percussion),
            Percussion => Some(Choir),
            Choir => Some(Piano),
            Piano => Some(Brass),
            Brass => Some(String),
            All => None,
        }
    }

    /// The attacking instrument this one takes reduced damage from.
    #[must_use]
    pub const fn resistance(self) -> Option<Instrument> {
        use Instrument::*;
        match self {
            String => Some(Piano),
            Piano => Some(Percussion),
            Percussion => Some(Guitar),
            Guitar => Some(Brass),
            Brass => Some(Choir),
            Choir => Some(Woodwind),
            Woodwind => Some(String),
            All => None,
        }
    }

    /// Damage multiplier when a card of this instrument is hit by `attacker`.
    #[must_use]
    pub fn multiplier_against(self, attacker: Instrument) -> f64 {
        if self.weakness() == Some(attacker) {
            1.2
        } else if self.resistance() == Some(attacker) {
            0.8
        } else {
            1.0
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Turn phases of a battler player.
///
/// Most actions come as a `Pre*`/main/`Post*` triple so abilities can hook in
/// before and after the standard behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Flow {
    PreTurn,
    PrePickCard,
    PickCard,
    PostPickCard,
    PrePhaseTwo,
    PhaseTwo,
    PostPhaseTwo,
    PrePlayBench,
    PlayBench,
    PostPlayBench,
    PreAttachNrg,
    AttachNrg,
    PostAttachNrg,
    PreSwitch,
    Switch,
    PostSwitch,
    PrePlayItem,
    PlayItem,
    PostPlayItem,
    PrePlayStadium,
    PlayStadium,
    PostPlayStadium,
    PrePlaySupporter,
    PlaySupporter,
    PostPlaySupporter,
    PrePlayTool,
    PlayTool,
    PostPlayTool,
    PreAddNrgToken,
    AddNrgToken,
    PostAddNrgToken,
    PreAttack,
    Attack,
    PostAttack,
    PostTurn,
    GenericAttach,
}

/// Hook points of the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageFlow {
    PreDmg,
    PostDmg,
}

/// What the engine is asking a player for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BattleQuery {
    MakeActive,
    PhaseTwo,
    Item,
    Tool,
    Supporter,
    Stadium,
    Switch,
    AddNrg,
    AttachNrg,
    ToBench,
    Attack,
}

/// Answers accepted at the `PhaseTwo` query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PhaseTwoChoice {
    Item,
    Switch,
    Stadium,
    Supporter,
    Bench,
    Tool,
    NrgCard,
    NrgToken,
    Atk,
}

impl PhaseTwoChoice {
    /// The phase this choice leads into.
    #[must_use]
    pub const fn next_phase(self) -> Flow {
        match self {
            PhaseTwoChoice::Item => Flow::PrePlayItem,
            PhaseTwoChoice::Switch => Flow::PreSwitch,
            PhaseTwoChoice::Stadium => Flow::PrePlayStadium,
            PhaseTwoChoice::Supporter => Flow::PrePlaySupporter,
            PhaseTwoChoice::Bench => Flow::PrePlayBench,
            PhaseTwoChoice::Tool => Flow::PrePlayTool,
            PhaseTwoChoice::NrgCard => Flow::PreAttachNrg,
            PhaseTwoChoice::NrgToken => Flow::PreAddNrgToken,
            PhaseTwoChoice::Atk => Flow::PostPhaseTwo,
        }
    }

    /// Every answer in text form.
    #[must_use]
    pub fn vocabulary() -> Vec<String> {
        Self::iter().map(|choice| choice.to_string()).collect()
    }
}

/// Answers accepted at the `Attack` query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum AttackChoice {
    #[strum(serialize = "mv_1")]
    MoveOne,
    #[strum(serialize = "mv_2")]
    MoveTwo,
}

impl AttackChoice {
    #[must_use]
    pub const fn action(self) -> ActionKind {
        match self {
            AttackChoice::MoveOne => ActionKind::MoveOne,
            AttackChoice::MoveTwo => ActionKind::MoveTwo,
        }
    }
}

/// The four things a character card can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    MoveOne,
    MoveTwo,
    ActiveAbility,
    Passive,
}

impl ActionKind {
    #[must_use]
    pub const fn capability(self) -> Capabilities {
        match self {
            ActionKind::MoveOne => Capabilities::MOVE_ONE,
            ActionKind::MoveTwo => Capabilities::MOVE_TWO,
            ActionKind::ActiveAbility => Capabilities::ACTIVE,
            ActionKind::Passive => Capabilities::PASSIVE,
        }
    }
}

bitflags! {
    /// Which of the four abilities a character card declares.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        const MOVE_ONE = 1 << 0;
        const MOVE_TWO = 1 << 1;
        const ACTIVE   = 1 << 2;
        const PASSIVE  = 1 << 3;
    }
}

/// Kinds of trainer card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TrainerKind {
    Item,
    Supporter,
    Stadium,
    Tool,
}

impl TrainerKind {
    /// The query used to pick a trainer of this kind from hand.
    #[must_use]
    pub const fn query(self) -> BattleQuery {
        match self {
            TrainerKind::Item => BattleQuery::Item,
            TrainerKind::Supporter => BattleQuery::Supporter,
            TrainerKind::Stadium => BattleQuery::Stadium,
            TrainerKind::Tool => BattleQuery::Tool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relations_are_cycles() {
        for instrument in Instrument::iter().filter(|i| *i != Instrument::All) {
            let mut seen = vec![instrument];
            let mut next = instrument.weakness().unwrap();
            while next != instrument {
                assert!(!seen.contains(&next));
                seen.push(next);
                next = next.weakness().unwrap();
            }
            assert_eq!(seen.len(), Instrument::COUNT - 1);
        }
    }

    #[test]
    fn test_weakness_and_resistance_differ() {
        for instrument in Instrument::iter() {
            if let (Some(weak), Some(resist)) = (instrument.weakness(), instrument.resistance()) {
                assert_ne!(weak, resist);
                assert_ne!(weak, instrument);
            }
        }
        assert_eq!(Instrument::All.weakness(), None);
        assert_eq!(Instrument::All.resistance(), None);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(Instrument::String.multiplier_against(Instrument::Guitar), 1.2);
        assert_eq!(Instrument::String.multiplier_against(Instrument::Piano), 0.8);
        assert_eq!(Instrument::String.multiplier_against(Instrument::Brass), 1.0);
        assert_eq!(Instrument::All.multiplier_against(Instrument::Guitar), 1.0);
    }

    #[test]
    fn test_phase_two_vocabulary() {
        assert_eq!(
            PhaseTwoChoice::vocabulary(),
            vec!["item", "switch", "stadium", "supporter", "bench", "tool", "nrg_card", "nrg_token", "atk"]
        );
        assert_eq!("NRG_TOKEN".parse::<PhaseTwoChoice>(), Ok(PhaseTwoChoice::NrgToken));
        assert!("retreat".parse::<PhaseTwoChoice>().is_err());
    }

    #[test]
    fn test_attack_choice_text() {
        assert_eq!("mv_1".parse::<AttackChoice>(), Ok(AttackChoice::MoveOne));
        assert_eq!(AttackChoice::MoveTwo.to_string(), "mv_2");
        assert_eq!(AttackChoice::MoveTwo.action().capability(), Capabilities::MOVE_TWO);
    }

    #[test]
    fn test_instrument_text() {
        assert_eq!(Instrument::Woodwind.to_string(), "woodwind");
        assert_eq!("Brass".parse::<Instrument>(), Ok(Instrument::Brass));
    }

    #[test]
    fn test_flow_has_all_phases() {
        assert_eq!(Flow::iter().count(), 36);
    }
}
