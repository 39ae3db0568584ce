//! Core engine types: identifiers, money, dice, RNG, players, constants.
//!
//! These are the building blocks every other module leans on. None of them
//! know about the board layout or the turn machine.

pub mod id;
pub mod money;
pub mod rng;
pub mod dice;
pub mod player;
pub mod constants;

pub use id::{GameId, PlayerId, PropertyId, TradeId};
pub use money::Money;
pub use rng::{GameRng, GameRngState};
pub use dice::DiceRoll;
pub use player::{Difficulty, Player};
