//! Two-player trading-card battler.
//!
//! Characters fight from an Active pile backed by a Bench; trainers and
//! energy cards support them. Each player's turn runs through the `Flow`
//! state machine in `BattlePlayer::action`, and `BattleGame` drives turns
//! and knock-out sweeps until one side reaches `kos_to_win` or runs out of
//! cards.
//!
//! ## Key Types
//!
//! - `BattleGame`: setup and the turn loop
//! - `BattlePlayer`: piles, counters, flow stack and flow hooks
//! - `CharacterCore`: vitals plus the damage pipeline
//! - `Character` / `Trainer`: card authoring traits
//! - `AverageJoe`: the reference character

mod card;
mod cards;
mod character;
mod config;
mod game;
mod player;
mod types;

pub use card::{can_use, declares, BattleCard, CardBody, Trainer, TrainerContext};
pub use cards::{starter_deck, AverageJoe, ConcertHall, Metronome, Rosin, SheetMusic};
pub use character::{
    AbilityContext, Character, CharacterCore, DamageHook, DamageReport, Energies, FlowHook, PostDamageInput, Strike,
    Vitals,
};
pub use config::BattleConfig;
pub use game::BattleGame;
pub use player::{BattlePlayer, Board, Counters, Stadium, TurnContext};
pub use types::{
    piles, ActionKind, AttackChoice, BattleQuery, Capabilities, DamageFlow, Flow, Instrument, PhaseTwoChoice,
    TrainerKind, IN_PLAY,
};
