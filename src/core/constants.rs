//! Rule constants shared across the engine.

use super::money::Money;

/// Currency each player starts with.
pub const STARTING_CURRENCY: Money = Money::from_dollars(1500);

/// Salary paid once per completed lap of the board.
pub const LAP_SALARY: Money = Money::from_dollars(200);

/// Penalty paid to the bank when landing on the water hazard.
pub const WATER_HAZARD_PENALTY: Money = Money::from_dollars(50);

/// Turns a player is stuck after entering the sand trap.
pub const SAND_TRAP_SENTENCE_TURNS: u8 = 3;

/// Consecutive doubles that send the roller to the sand trap.
pub const DOUBLES_TO_SAND_TRAP: u8 = 3;

/// Fixed two-player ruleset.
pub const MAX_PLAYERS: usize = 2;

/// Mortgage credits this fraction of the purchase price.
pub const MORTGAGE_RATE: f64 = 0.5;

/// Unmortgaging costs the mortgage value plus 10% interest.
pub const UNMORTGAGE_INTEREST: f64 = 1.1;

/// Selling an improvement refunds this fraction of its cost.
pub const IMPROVEMENT_RESALE_RATE: f64 = 0.5;

/// Safety cap on NPC actions driven within a single turn.
pub const MAX_NPC_ACTIONS_PER_TURN: usize = 20;
