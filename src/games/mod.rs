//! Games built on the engine.
//!
//! - `battler`: a two-player trading-card battler with a phase-driven turn
//! - `uno`: an UNO clone with a shared NPC deck

pub mod battler;
pub mod uno;
