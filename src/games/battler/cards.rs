//! Reference cards and a starter deck.

use super::card::{BattleCard, Trainer, TrainerContext};
use super::character::{AbilityContext, Character, CharacterCore, Strike, Vitals};
use super::player::Board;
use super::types::{ActionKind, Capabilities, DamageFlow, Flow, Instrument, TrainerKind};
use crate::core::entity::CardUid;
use crate::core::error::Result;

/// A plain string player.
///
/// - Passive: its next incoming hit is halved. The hook flags the card for
///   cleanup when it fires, so it is spent after one hit.
/// - Move two: 50 string damage, needs one `All` energy.
/// - Retreat costs one `All` energy.
#[derive(Debug)]
pub struct AverageJoe {
    core: CharacterCore,
}

impl AverageJoe {
    pub const MAX_HP: i32 = 100;
    pub const MOVE_TWO_DAMAGE: i32 = 50;

    #[must_use]
    pub fn new() -> Self {
        Self { core: CharacterCore::new(Instrument::String, Self::MAX_HP) }
    }

    fn has_energy(&self) -> bool {
        self.core.vitals.energies[Instrument::All] >= 1
    }
}

impl Default for AverageJoe {
    fn default() -> Self {
        Self::new()
    }
}

impl Character for AverageJoe {
    fn name(&self) -> &str {
        "Average Joe"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PASSIVE | Capabilities::MOVE_TWO
    }

    fn core(&self) -> &CharacterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CharacterCore {
        &mut self.core
    }

    fn can_play(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::MoveTwo => self.has_energy(),
            ActionKind::Passive => true,
            ActionKind::MoveOne | ActionKind::ActiveAbility => false,
        }
    }

    fn passive(&mut self, ctx: &mut AbilityContext<'_>) -> Result<bool> {
        self.core.damage_hooks.inject(
            ctx.uid,
            DamageFlow::PreDmg,
            Box::new(|vitals: &mut Vitals, _: &Strike, dmg: f64| {
                vitals.cleanup_flag = true;
                dmg / 2.0
            }),
        );
        Ok(true)
    }

    fn move_two(&mut self, ctx: &mut AbilityContext<'_>) -> Result<bool> {
        if !self.has_energy() {
            return Ok(false);
        }
        let strike = Strike::new(self.core.vitals.instrument, Self::MOVE_TWO_DAMAGE, ActionKind::MoveTwo);
        Ok(ctx.strike_opponent(strike).is_some())
    }

    fn can_swap(&self) -> bool {
        self.has_energy()
    }

    fn consume_energy_and_swap(&mut self) -> bool {
        if !self.has_energy() {
            return false;
        }
        self.core.vitals.energies[Instrument::All] -= 1;
        true
    }

    fn cleanup(&mut self, uid: CardUid) -> bool {
        if !self.core.damage_hooks.contains(DamageFlow::PreDmg, uid) {
            return true;
        }
        self.core.damage_hooks.purify(uid, Some(DamageFlow::PreDmg)).is_ok()
    }
}

/// Item: heal the active character by 30.
#[derive(Debug, Default)]
pub struct Rosin;

impl Rosin {
    pub const HEAL: i32 = 30;
}

impl Trainer for Rosin {
    fn name(&self) -> &str {
        "Rosin"
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Item
    }

    fn play(&mut self, ctx: &mut TrainerContext<'_>) -> Result<bool> {
        let Some(core) = ctx.board.active_core_mut() else {
            return Ok(false);
        };
        if core.vitals.hp >= core.vitals.max_hp {
            return Ok(false);
        }
        core.vitals.heal(Self::HEAL);
        Ok(true)
    }
}

/// Supporter: draw two cards.
#[derive(Debug, Default)]
pub struct SheetMusic;

impl Trainer for SheetMusic {
    fn name(&self) -> &str {
        "Sheet Music"
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Supporter
    }

    fn play(&mut self, ctx: &mut TrainerContext<'_>) -> Result<bool> {
        Ok(ctx.board.draw(2)? > 0)
    }
}

/// Tool: the active character takes 10 less damage from every hit.
#[derive(Debug, Default)]
pub struct Metronome;

impl Metronome {
    pub const REDUCTION: f64 = 10.0;
}

impl Trainer for Metronome {
    fn name(&self) -> &str {
        "Metronome"
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Tool
    }

    fn play(&mut self, ctx: &mut TrainerContext<'_>) -> Result<bool> {
        let uid = ctx.uid;
        let Some(core) = ctx.board.active_core_mut() else {
            return Ok(false);
        };
        core.damage_hooks.inject(
            uid,
            DamageFlow::PreDmg,
            Box::new(|_: &mut Vitals, _: &Strike, dmg: f64| (dmg - Self::REDUCTION).max(0.0)),
        );
        Ok(true)
    }
}

/// Stadium: while it stays in play its owner gets an extra energy
/// attachment at the start of each turn.
#[derive(Debug, Default)]
pub struct ConcertHall;

impl Trainer for ConcertHall {
    fn name(&self) -> &str {
        "Concert Hall"
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Stadium
    }

    fn play(&mut self, ctx: &mut TrainerContext<'_>) -> Result<bool> {
        ctx.flow_hooks.inject(
            ctx.uid,
            Flow::PreTurn,
            Box::new(|board: &mut Board| board.counters.energy_attachments += 1),
        );
        Ok(true)
    }
}

/// Twenty cards: six characters, six wildcard energies and two of each
/// reference trainer.
#[must_use]
pub fn starter_deck() -> Vec<BattleCard> {
    let mut deck = Vec::with_capacity(20);
    deck.extend((0..6).map(|_| BattleCard::character(AverageJoe::new())));
    deck.extend((0..6).map(|_| BattleCard::energy(Instrument::All)));
    for _ in 0..2 {
        deck.push(BattleCard::trainer(Rosin));
        deck.push(BattleCard::trainer(SheetMusic));
        deck.push(BattleCard::trainer(Metronome));
        deck.push(BattleCard::trainer(ConcertHall));
    }
    deck
}
