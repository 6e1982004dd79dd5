//! Turn-flow machinery shared by every game.
//!
//! ## Key Types
//!
//! - `FlowStack`: pending phase tokens for the acting player
//! - `InjectionTable`: card-owned hooks keyed by phase
//! - `TurnSignal`: what a phase handler tells the turn driver
//!
//! Games choose their own phase enums; the engine only requires them to be
//! small `Copy` keys.

pub mod injection;
pub mod stack;

pub use injection::InjectionTable;
pub use stack::FlowStack;

/// Outcome of executing a single phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnSignal {
    /// Keep popping the flow stack.
    Continue,
    /// The acting player's turn is over.
    EndTurn,
}
