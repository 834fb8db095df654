//! Locomotion for an auto-running platformer character.
//!
//! [`fsm`] is a small generic state machine; [`player`] builds the runner's
//! Running / Jumping / Falling behaviour on top of it. [`level`] and [`sim`]
//! provide a reference mover and a headless host loop.

pub mod clock;
pub mod config;
pub mod fsm;
pub mod level;
pub mod player;
pub mod sim;

pub use config::MovementConfig;
pub use fsm::{FsmError, State, StateMachine};
pub use player::{InputFrame, Mover, Player, PlayerState};
