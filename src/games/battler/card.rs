//! Battler cards: characters, trainers and energy.

use super::character::{AbilityContext, Character, FlowHook};
use super::player::Board;
use super::types::{ActionKind, Capabilities, Flow, Instrument, TrainerKind};
use crate::cards::{Card, Placement, Playable};
use crate::core::entity::CardUid;
use crate::core::error::{EngineError, Result};
use crate::flow::InjectionTable;

/// What a trainer may touch while it resolves.
pub struct TrainerContext<'a> {
    pub uid: CardUid,
    /// The playing player's piles and counters.
    pub board: &'a mut Board,
    pub flow_hooks: &'a mut InjectionTable<Flow, FlowHook>,
    pub opponent: &'a mut Board,
}

/// Behaviour of a trainer card.
pub trait Trainer {
    fn name(&self) -> &str;

    fn kind(&self) -> TrainerKind;

    /// Resolve the card. `Ok(false)` means it could not be played right now
    /// and goes back to the hand.
    fn play(&mut self, ctx: &mut TrainerContext<'_>) -> Result<bool>;
}

pub enum CardBody {
    Character(Box<dyn Character>),
    Trainer(Box<dyn Trainer>),
    Energy(Instrument),
}

/// Any card in a battler deck.
pub struct BattleCard {
    placement: Placement,
    body: CardBody,
}

impl BattleCard {
    pub fn character(character: impl Character + 'static) -> Self {
        Self { placement: Placement::unplaced(), body: CardBody::Character(Box::new(character)) }
    }

    pub fn trainer(trainer: impl Trainer + 'static) -> Self {
        Self { placement: Placement::unplaced(), body: CardBody::Trainer(Box::new(trainer)) }
    }

    #[must_use]
    pub fn energy(instrument: Instrument) -> Self {
        Self { placement: Placement::unplaced(), body: CardBody::Energy(instrument) }
    }

    #[must_use]
    pub fn body(&self) -> &CardBody {
        &self.body
    }

    #[must_use]
    pub fn as_character(&self) -> Option<&dyn Character> {
        match &self.body {
            CardBody::Character(character) => Some(character.as_ref()),
            _ => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut (dyn Character + 'static)> {
        match &mut self.body {
            CardBody::Character(character) => Some(character.as_mut()),
            _ => None,
        }
    }

    pub fn as_trainer_mut(&mut self) -> Option<&mut (dyn Trainer + 'static)> {
        match &mut self.body {
            CardBody::Trainer(trainer) => Some(trainer.as_mut()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_character(&self) -> bool {
        matches!(self.body, CardBody::Character(_))
    }

    #[must_use]
    pub fn trainer_kind(&self) -> Option<TrainerKind> {
        match &self.body {
            CardBody::Trainer(trainer) => Some(trainer.kind()),
            _ => None,
        }
    }

    #[must_use]
    pub fn energy_instrument(&self) -> Option<Instrument> {
        match self.body {
            CardBody::Energy(instrument) => Some(instrument),
            _ => None,
        }
    }
}

impl Card for BattleCard {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn label(&self) -> String {
        let id = self.placement.uid.map_or_else(|| "unregistered".to_string(), |uid| uid.to_string());
        match &self.body {
            CardBody::Character(character) => {
                format!("{} ({}, {} hp)", character.name(), id, character.core().vitals.hp)
            }
            CardBody::Trainer(trainer) => format!("{} {} ({})", trainer.kind(), trainer.name(), id),
            CardBody::Energy(instrument) => format!("{instrument} energy ({id})"),
        }
    }

    fn check(&self) -> Result<()> {
        let CardBody::Character(character) = &self.body else {
            return Ok(());
        };
        let malformed = |reason: String| EngineError::MalformedCard { label: character.name().to_string(), reason };
        let vitals = &character.core().vitals;
        if vitals.max_hp <= 0 {
            return Err(malformed(format!("max hp {} is not positive", vitals.max_hp)));
        }
        if vitals.hp <= 0 || vitals.hp > vitals.max_hp {
            return Err(malformed(format!("hp {} outside 1..={}", vitals.hp, vitals.max_hp)));
        }
        let declared = character.capabilities().bits().count_ones();
        if declared != 2 {
            return Err(malformed(format!("declares {declared} abilities, expected 2")));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BattleCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleCard")
            .field("placement", &self.placement)
            .field("label", &self.label())
            .finish()
    }
}

impl<'a> Playable<AbilityContext<'a>> for BattleCard {
    type Action = ActionKind;

    /// Dispatch a character ability. Requesting an ability the card does not
    /// declare is an error.
    fn play_card(&mut self, action: ActionKind, ctx: &mut AbilityContext<'a>) -> Result<bool> {
        let CardBody::Character(character) = &mut self.body else {
            return Err(EngineError::invalid("only characters have abilities"));
        };
        if !character.capabilities().contains(action.capability()) {
            return Err(EngineError::MissingCapability {
                card: character.name().to_string(),
                ability: action.to_string(),
            });
        }
        match action {
            ActionKind::MoveOne => character.move_one(ctx),
            ActionKind::MoveTwo => character.move_two(ctx),
            ActionKind::ActiveAbility => character.active_ability(ctx),
            ActionKind::Passive => character.passive(ctx),
        }
    }
}

/// Whether `card` declares `action` and can currently pay for it.
#[must_use]
pub fn can_use(card: &BattleCard, action: ActionKind) -> bool {
    card.as_character().is_some_and(|character| {
        character.capabilities().contains(action.capability()) && character.can_play(action)
    })
}

/// True when the character declares the ability at all.
#[must_use]
pub fn declares(card: &BattleCard, capability: Capabilities) -> bool {
    card.as_character()
        .is_some_and(|character| character.capabilities().contains(capability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::battler::character::{CharacterCore, PostDamageInput};

    struct Sketch {
        core: CharacterCore,
        capabilities: Capabilities,
    }

    impl Sketch {
        fn new(capabilities: Capabilities) -> Self {
            Self { core: CharacterCore::new(Instrument::Piano, 60), capabilities }
        }
    }

    impl Character for Sketch {
        fn name(&self) -> &str {
            "Sketch"
        }

        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        fn core(&self) -> &CharacterCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut CharacterCore {
            &mut self.core
        }
    }

    #[test]
    fn test_check_counts_abilities() {
        let two = BattleCard::character(Sketch::new(Capabilities::MOVE_ONE | Capabilities::ACTIVE));
        assert!(two.check().is_ok());

        let three = BattleCard::character(Sketch::new(
            Capabilities::MOVE_ONE | Capabilities::MOVE_TWO | Capabilities::PASSIVE,
        ));
        assert!(matches!(three.check(), Err(EngineError::MalformedCard { .. })));
        assert!(BattleCard::energy(Instrument::Choir).check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_hp() {
        let mut sketch = Sketch::new(Capabilities::MOVE_ONE | Capabilities::MOVE_TWO);
        sketch.core.vitals.hp = 0;
        assert!(BattleCard::character(sketch).check().is_err());
    }

    #[test]
    fn test_undeclared_ability_is_refused() {
        let mut card = BattleCard::character(Sketch::new(Capabilities::MOVE_ONE | Capabilities::ACTIVE));
        let mut hooks = InjectionTable::new();
        let mut ctx = AbilityContext {
            uid: CardUid(1),
            flow_hooks: &mut hooks,
            opponent: None,
            post_damage: PostDamageInput::Raw,
        };

        let err = card.play_card(ActionKind::Passive, &mut ctx).unwrap_err();
        assert!(matches!(err, EngineError::MissingCapability { .. }));
        assert!(!card.play_card(ActionKind::MoveOne, &mut ctx).unwrap());
        assert!(!can_use(&card, ActionKind::MoveOne));
        assert!(declares(&card, Capabilities::ACTIVE));
    }

    #[test]
    fn test_energy_has_no_abilities() {
        let mut card = BattleCard::energy(Instrument::All);
        let mut hooks = InjectionTable::new();
        let mut ctx = AbilityContext {
            uid: CardUid(2),
            flow_hooks: &mut hooks,
            opponent: None,
            post_damage: PostDamageInput::Raw,
        };

        assert!(card.play_card(ActionKind::MoveOne, &mut ctx).is_err());
        assert_eq!(card.energy_instrument(), Some(Instrument::All));
        assert_eq!(card.label(), "all energy (unregistered)");
    }
}
