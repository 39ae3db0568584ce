//! Mutable game state: the `Game` aggregate, trades and the event log.

pub mod events;
pub mod trade;
pub mod game;

pub use events::{EventRecord, GameEvent};
pub use game::{Game, GameStatus, PropertyState, TurnPhase};
pub use trade::{TradeOffer, TradeProposal, TradeStatus};
