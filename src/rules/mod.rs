//! Rules layer: participants, the environment that seats them, and results.
//!
//! Games implement `Participant` for their seats and drive play through a
//! `GameEnvironment`.

pub mod engine;
pub mod environment;

pub use engine::{ExitSignal, GameResult, Participant};
pub use environment::{GameEnvironment, TurnChange};
