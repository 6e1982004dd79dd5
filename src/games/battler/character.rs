//! Character cards and damage resolution.
//!
//! Every character carries a `CharacterCore`: its vitals plus the damage
//! hooks other cards (or itself) injected. `CharacterCore::damage` is the
//! only way hit points go down:
//!
//! 1. The base amount threads through every `PreDmg` hook in order.
//! 2. The instrument multiplier applies (weak 1.2, resists 0.8).
//! 3. The result is truncated and subtracted from HP.
//! 4. `PostDmg` hooks observe the hit.
//!
//! ```
//! use flow_ccg::games::battler::{CharacterCore, Instrument, Strike, ActionKind, PostDamageInput};
//!
//! let mut core = CharacterCore::new(Instrument::String, 100);
//! let report = core.damage(&Strike::new(Instrument::Guitar, 50, ActionKind::MoveTwo), PostDamageInput::Raw);
//!
//! assert_eq!(report.dealt, 60);
//! assert_eq!(core.vitals.hp, 40);
//! ```

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ActionKind, Capabilities, DamageFlow, Flow, Instrument};
use super::player::Board;
use crate::core::entity::CardUid;
use crate::core::error::Result;
use crate::flow::InjectionTable;

/// Turn-phase hook injected by a card into a player's flow.
pub type FlowHook = Box<dyn FnMut(&mut Board)>;

/// Damage-pipeline hook: receives the defender's vitals, the incoming strike
/// and the running damage value; returns the new value.
pub type DamageHook = Box<dyn FnMut(&mut Vitals, &Strike, f64) -> f64>;

/// Energy attached to a character, counted per instrument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energies([u32; Instrument::COUNT]);

impl Energies {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl Index<Instrument> for Energies {
    type Output = u32;

    fn index(&self, instrument: Instrument) -> &u32 {
        &self.0[instrument.index()]
    }
}

impl IndexMut<Instrument> for Energies {
    fn index_mut(&mut self, instrument: Instrument) -> &mut u32 {
        &mut self.0[instrument.index()]
    }
}

/// Mutable combat state of a character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub instrument: Instrument,
    pub max_hp: i32,
    pub hp: i32,
    pub energies: Energies,
    /// Set when the card needs its `cleanup` run at the next sweep.
    pub cleanup_flag: bool,
}

impl Vitals {
    #[must_use]
    pub fn is_knocked_out(&self) -> bool {
        self.hp <= 0
    }

    /// Restore up to `amount` HP without exceeding `max_hp`.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// An incoming hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    pub instrument: Instrument,
    pub amount: i32,
    pub kind: ActionKind,
}

impl Strike {
    #[must_use]
    pub const fn new(instrument: Instrument, amount: i32, kind: ActionKind) -> Self {
        Self { instrument, amount, kind }
    }
}

/// Which value `PostDmg` hooks receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostDamageInput {
    /// The strike's base amount, before any hook or multiplier.
    #[default]
    Raw,
    /// The value after hooks and multiplier, before truncation.
    Final,
}

/// Breakdown of one resolved hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageReport {
    pub raw: i32,
    pub after_hooks: f64,
    pub multiplier: f64,
    pub dealt: i32,
}

/// State shared by every character card.
pub struct CharacterCore {
    pub vitals: Vitals,
    pub damage_hooks: InjectionTable<DamageFlow, DamageHook>,
}

impl CharacterCore {
    #[must_use]
    pub fn new(instrument: Instrument, max_hp: i32) -> Self {
        Self {
            vitals: Vitals {
                instrument,
                max_hp,
                hp: max_hp,
                energies: Energies::default(),
                cleanup_flag: false,
            },
            damage_hooks: InjectionTable::new(),
        }
    }

    /// Resolve a hit against this character.
    pub fn damage(&mut self, strike: &Strike, post_input: PostDamageInput) -> DamageReport {
        let mut value = f64::from(strike.amount);
        for (_, hook) in self.damage_hooks.hooks_mut(DamageFlow::PreDmg) {
            value = hook(&mut self.vitals, strike, value);
        }
        let after_hooks = value;

        let multiplier = self.vitals.instrument.multiplier_against(strike.instrument);
        let multiplied = after_hooks * multiplier;
        let dealt = multiplied as i32;
        self.vitals.hp -= dealt;

        let observed = match post_input {
            PostDamageInput::Raw => f64::from(strike.amount),
            PostDamageInput::Final => multiplied,
        };
        for (_, hook) in self.damage_hooks.hooks_mut(DamageFlow::PostDmg) {
            hook(&mut self.vitals, strike, observed);
        }

        debug!(
            target: "engine::damage",
            attacker = %strike.instrument,
            defender = %self.vitals.instrument,
            raw = strike.amount,
            after_hooks,
            multiplier,
            dealt,
            hp = self.vitals.hp,
            "damage resolved"
        );
        DamageReport { raw: strike.amount, after_hooks, multiplier, dealt }
    }
}

impl std::fmt::Debug for CharacterCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterCore")
            .field("vitals", &self.vitals)
            .field("damage_hooks", &self.damage_hooks)
            .finish()
    }
}

/// What a character ability may touch while it resolves.
pub struct AbilityContext<'a> {
    /// The acting card's own id, used as the key for anything it injects.
    pub uid: CardUid,
    /// The owning player's turn-phase hooks.
    pub flow_hooks: &'a mut InjectionTable<Flow, FlowHook>,
    /// The opponent's active character, if there is one.
    pub opponent: Option<&'a mut CharacterCore>,
    pub post_damage: PostDamageInput,
}

impl AbilityContext<'_> {
    /// Hit the opponent's active character.
    pub fn strike_opponent(&mut self, strike: Strike) -> Option<DamageReport> {
        let post_damage = self.post_damage;
        self.opponent.as_mut().map(|core| core.damage(&strike, post_damage))
    }
}

/// Behaviour of a character card.
///
/// A character declares exactly two of the four abilities through
/// `capabilities`. Ability methods are only ever called for declared
/// abilities; the defaults report failure.
pub trait Character {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn core(&self) -> &CharacterCore;

    fn core_mut(&mut self) -> &mut CharacterCore;

    /// Whether the ability's cost is currently met.
    fn can_play(&self, _action: ActionKind) -> bool {
        false
    }

    fn move_one(&mut self, _ctx: &mut AbilityContext<'_>) -> Result<bool> {
        Ok(false)
    }

    fn move_two(&mut self, _ctx: &mut AbilityContext<'_>) -> Result<bool> {
        Ok(false)
    }

    fn active_ability(&mut self, _ctx: &mut AbilityContext<'_>) -> Result<bool> {
        Ok(false)
    }

    fn passive(&mut self, _ctx: &mut AbilityContext<'_>) -> Result<bool> {
        Ok(false)
    }

    /// Whether the card has what it needs to retreat to the bench.
    fn can_swap(&self) -> bool {
        false
    }

    /// Pay the retreat cost. Returns whether it was paid.
    fn consume_energy_and_swap(&mut self) -> bool {
        false
    }

    /// Undo anything persistent this card installed. Returning `false`
    /// aborts the game.
    fn cleanup(&mut self, _uid: CardUid) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(instrument: Instrument, amount: i32) -> Strike {
        Strike::new(instrument, amount, ActionKind::MoveOne)
    }

    #[test]
    fn test_neutral_hit() {
        let mut core = CharacterCore::new(Instrument::String, 100);
        let report = core.damage(&strike(Instrument::Brass, 30), PostDamageInput::Raw);

        assert_eq!(report.multiplier, 1.0);
        assert_eq!(report.dealt, 30);
        assert_eq!(core.vitals.hp, 70);
    }

    #[test]
    fn test_weak_hit() {
        let mut core = CharacterCore::new(Instrument::String, 100);
        let report = core.damage(&strike(Instrument::Guitar, 50), PostDamageInput::Raw);

        assert_eq!(report.multiplier, 1.2);
        assert_eq!(core.vitals.hp, 40);
    }

    #[test]
    fn test_resisted_hit_truncates() {
        let mut core = CharacterCore::new(Instrument::String, 100);
        let report = core.damage(&strike(Instrument::Piano, 25), PostDamageInput::Raw);

        assert_eq!(report.dealt, 20);
        assert_eq!(core.vitals.hp, 80);

        core.damage(&strike(Instrument::Piano, 11), PostDamageInput::Raw);
        assert_eq!(core.vitals.hp, 72);
    }

    #[test]
    fn test_pre_hooks_compose_in_order() {
        let mut core = CharacterCore::new(Instrument::All, 100);
        core.damage_hooks
            .inject(CardUid(1), DamageFlow::PreDmg, Box::new(|_: &mut Vitals, _: &Strike, dmg: f64| dmg + 10.0));
        core.damage_hooks
            .inject(CardUid(2), DamageFlow::PreDmg, Box::new(|_: &mut Vitals, _: &Strike, dmg: f64| dmg * 2.0));

        let report = core.damage(&strike(Instrument::Guitar, 5), PostDamageInput::Raw);

        assert_eq!(report.after_hooks, 30.0);
        assert_eq!(core.vitals.hp, 70);
    }

    #[test]
    fn test_post_hook_input_is_configurable() {
        use std::cell::Cell;
        use std::rc::Rc;

        let seen = Rc::new(Cell::new(0.0));
        let mut core = CharacterCore::new(Instrument::String, 200);
        let probe = Rc::clone(&seen);
        core.damage_hooks.inject(
            CardUid(7),
            DamageFlow::PostDmg,
            Box::new(move |_: &mut Vitals, _: &Strike, dmg: f64| {
                probe.set(dmg);
                dmg
            }),
        );
        core.damage_hooks
            .inject(CardUid(8), DamageFlow::PreDmg, Box::new(|_: &mut Vitals, _: &Strike, dmg: f64| dmg / 2.0));

        core.damage(&strike(Instrument::Guitar, 50), PostDamageInput::Raw);
        assert_eq!(seen.get(), 50.0);

        core.damage(&strike(Instrument::Guitar, 50), PostDamageInput::Final);
        assert_eq!(seen.get(), 30.0);
    }

    #[test]
    fn test_energies_index() {
        let mut energies = Energies::default();
        energies[Instrument::All] += 2;
        energies[Instrument::Brass] += 1;
        assert_eq!(energies[Instrument::All], 2);
        assert_eq!(energies.total(), 3);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut core = CharacterCore::new(Instrument::Choir, 80);
        core.vitals.hp = 50;
        core.vitals.heal(100);
        assert_eq!(core.vitals.hp, 80);
        assert!(!core.vitals.is_knocked_out());
    }
}
