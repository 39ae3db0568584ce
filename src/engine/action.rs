//! Player actions.
//!
//! One tagged union over the seven action kinds; each variant carries only
//! the fields it needs. This is the payload transports hand to the
//! coordinator.

use serde::{Deserialize, Serialize};

use crate::core::id::PropertyId;
use crate::state::TradeProposal;

/// An action a player can submit against a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PlayerAction {
    /// Roll the dice (or attempt a sand-trap escape).
    RollDice,
    /// Buy the unowned property the player is standing on.
    PurchaseProperty { property: PropertyId },
    /// Build one improvement step on an owned property.
    ImproveProperty { property: PropertyId },
    /// Offer the opponent a property/currency exchange.
    ProposeTrade(TradeProposal),
    /// Accept the pending trade (receiving player only).
    AcceptTrade,
    /// Reject the pending trade (receiving player only).
    RejectTrade,
    /// Finish the turn and hand off to the opponent.
    EndTurn,
}

impl PlayerAction {
    /// Stable action kind tag for transports and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            PlayerAction::RollDice => "ROLL_DICE",
            PlayerAction::PurchaseProperty { .. } => "PURCHASE_PROPERTY",
            PlayerAction::ImproveProperty { .. } => "IMPROVE_PROPERTY",
            PlayerAction::ProposeTrade(_) => "PROPOSE_TRADE",
            PlayerAction::AcceptTrade => "ACCEPT_TRADE",
            PlayerAction::RejectTrade => "REJECT_TRADE",
            PlayerAction::EndTurn => "END_TURN",
        }
    }
}
