//! # fairway
//!
//! A turn-based, golf-themed property trading game engine for exactly two
//! participants (human or NPC).
//!
//! ## Design Principles
//!
//! 1. **Single writer per game**: all mutation flows through the
//!    [`Coordinator`], which serializes action submissions behind a
//!    per-game lock and commits clone-apply-swap, so a rejected action
//!    leaves state untouched.
//!
//! 2. **Errors as values**: every rule check returns a [`RuleViolation`]
//!    with a stable reason code. Nothing in the engine panics on bad
//!    player input.
//!
//! 3. **Deterministic**: dice and NPC decisions come from a seeded,
//!    serializable RNG, so a rehydrated snapshot replays the same game.
//!
//! ## Modules
//!
//! - `core`: ids, money, dice, RNG, players, rule constants
//! - `board`: the fixed 24-tile course layout and pricing tables
//! - `state`: the `Game` aggregate, trades, and the append-only event log
//! - `rules`: pure legality/effect functions (movement, rent, purchase,
//!   improvement, debt settlement, trades)
//! - `engine`: the turn state machine over the seven player actions
//! - `coordinator`: per-game session ownership, update records, snapshots
//! - `npc`: difficulty-tiered NPC policy
//! - `error`: the `RuleViolation` / `EngineError` / `InvariantBreach` taxonomy

pub mod core;
pub mod board;
pub mod error;
pub mod state;
pub mod rules;
pub mod engine;
pub mod coordinator;
pub mod npc;

// Re-export commonly used types
pub use crate::core::{
    Difficulty, DiceRoll, GameId, GameRng, GameRngState, Money, Player, PlayerId, PropertyId,
    TradeId,
};

pub use crate::board::{Board, CourseGroup, ImprovementLevel, PropertyDef, Tile, TileKind};

pub use crate::state::{
    EventRecord, Game, GameEvent, GameStatus, PropertyState, TradeOffer, TradeProposal,
    TradeStatus, TurnPhase,
};

pub use crate::engine::{apply_action, apply_roll, PlayerAction};

pub use crate::error::{EngineError, InvariantBreach, RuleViolation};

pub use crate::coordinator::{ActionOutcome, Coordinator, GameUpdate, UpdateKind};

pub use crate::npc::choose_action;
