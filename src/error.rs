//! Error taxonomy.
//!
//! Three classes, three fates:
//!
//! - [`RuleViolation`] — a player asked for something the rules forbid.
//!   Always recoverable; returned as a value with a stable reason code and
//!   a human-readable message, and the game state is left untouched.
//! - [`EngineError`] — the coordinator could not route the request
//!   (unknown game, player not seated, corrupt snapshot) or wraps a
//!   rejection.
//! - [`InvariantBreach`] — the engine caught itself in an impossible
//!   state. Fatal for that game: the coordinator halts it and surfaces the
//!   breach instead of continuing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::id::{GameId, PlayerId, PropertyId};
use crate::core::money::Money;
use crate::state::game::TurnPhase;

/// A rejected player action, identifying the precondition that failed.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleViolation {
    #[error("game has not started")]
    GameNotStarted,
    #[error("game is already over")]
    GameOver,
    #[error("game is not waiting for players")]
    NotJoinable,
    #[error("game already has two players")]
    GameFull,
    #[error("only a waiting game can be cancelled")]
    NotCancellable,
    #[error("player is not part of this game")]
    NotInGame,
    #[error("player is bankrupt")]
    PlayerBankrupt,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("action is not allowed in the {0} phase")]
    WrongPhase(TurnPhase),
    #[error("no property exists with id {0}")]
    UnknownProperty(PropertyId),
    #[error("property is already owned")]
    PropertyAlreadyOwned,
    #[error("you must be standing on a property to purchase it")]
    NotOnPropertyTile,
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Money, available: Money },
    #[error("you do not own this property")]
    NotPropertyOwner,
    #[error("property is already a resort")]
    AtMaxImprovement,
    #[error("the whole course group must be owned to improve")]
    GroupIncomplete,
    #[error("a mortgaged property in the group blocks improvement")]
    GroupMortgaged,
    #[error("a trade is already pending")]
    TradeAlreadyPending,
    #[error("no trade is pending")]
    NoPendingTrade,
    #[error("only the trade recipient can respond")]
    NotTradeRecipient,
    #[error("cannot trade with yourself")]
    TradeWithSelf,
    #[error("trade recipient is not in the game")]
    RecipientNotInGame,
    #[error("trade references a property not owned by the stated party")]
    TradeAssetMismatch,
    #[error("trade offers more currency than the party holds")]
    TradeCurrencyUnavailable,
}

impl RuleViolation {
    /// Stable machine-readable reason code for transports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            RuleViolation::GameNotStarted => "game-not-started",
            RuleViolation::GameOver => "game-over",
            RuleViolation::NotJoinable => "not-joinable",
            RuleViolation::GameFull => "game-full",
            RuleViolation::NotCancellable => "not-cancellable",
            RuleViolation::NotInGame => "not-in-game",
            RuleViolation::PlayerBankrupt => "player-bankrupt",
            RuleViolation::NotYourTurn => "not-your-turn",
            RuleViolation::WrongPhase(_) => "wrong-phase",
            RuleViolation::UnknownProperty(_) => "unknown-property",
            RuleViolation::PropertyAlreadyOwned => "already-owned",
            RuleViolation::NotOnPropertyTile => "not-on-tile",
            RuleViolation::InsufficientFunds { .. } => "insufficient-funds",
            RuleViolation::NotPropertyOwner => "not-owner",
            RuleViolation::AtMaxImprovement => "at-max-improvement",
            RuleViolation::GroupIncomplete => "group-incomplete",
            RuleViolation::GroupMortgaged => "group-mortgaged",
            RuleViolation::TradeAlreadyPending => "trade-pending",
            RuleViolation::NoPendingTrade => "no-pending-trade",
            RuleViolation::NotTradeRecipient => "not-trade-recipient",
            RuleViolation::TradeWithSelf => "trade-with-self",
            RuleViolation::RecipientNotInGame => "recipient-not-in-game",
            RuleViolation::TradeAssetMismatch => "trade-asset-mismatch",
            RuleViolation::TradeCurrencyUnavailable => "trade-currency-unavailable",
        }
    }
}

/// An impossible state detected defensively after a commit.
///
/// Must never occur under correct engine code; when it does, the game is
/// halted for investigation rather than silently continuing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantBreach {
    #[error("{0} has negative currency")]
    NegativeCurrency(PlayerId),
    #[error("{0} ownership is out of sync with player holdings")]
    OwnershipMismatch(PropertyId),
    #[error("current {0} is bankrupt")]
    BankruptOnTurn(PlayerId),
    #[error("current {0} is not seated in the game")]
    CurrentPlayerMissing(PlayerId),
    #[error("completed game has no winner")]
    MissingWinner,
    #[error("game has more than two seats")]
    TooManySeats,
    #[error("pending trade references a player outside the game")]
    TradePartyMissing,
}

/// Coordinator-boundary errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0} not found")]
    GameNotFound(GameId),
    #[error("{player} is not part of {game}")]
    PlayerNotInGame { game: GameId, player: PlayerId },
    #[error("action rejected: {0}")]
    Rejected(#[from] RuleViolation),
    #[error("{game} halted after invariant breach: {breach}")]
    Halted {
        game: GameId,
        breach: InvariantBreach,
    },
    #[error("snapshot could not be decoded")]
    SnapshotInvalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes_are_stable() {
        let violation = RuleViolation::InsufficientFunds {
            required: Money::from_dollars(200),
            available: Money::from_dollars(120),
        };
        assert_eq!(
            violation.to_string(),
            "insufficient funds: need $200.00, have $120.00"
        );
        assert_eq!(violation.code(), "insufficient-funds");

        assert_eq!(
            RuleViolation::WrongPhase(TurnPhase::Roll).to_string(),
            "action is not allowed in the Roll phase"
        );
    }

    #[test]
    fn test_rejection_wraps_violation() {
        let err: EngineError = RuleViolation::NotYourTurn.into();
        assert_eq!(
            err,
            EngineError::Rejected(RuleViolation::NotYourTurn)
        );
        assert_eq!(err.to_string(), "action rejected: it is not your turn");
    }

    #[test]
    fn test_violation_serialization() {
        let violation = RuleViolation::UnknownProperty(PropertyId::new(4));
        let json = serde_json::to_string(&violation).unwrap();
        let back: RuleViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(violation, back);
    }
}
