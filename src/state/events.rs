//! The append-only game event log.
//!
//! Every committed action appends typed events; clients use them for
//! feeds and observability. Records are never mutated after emission.

use serde::{Deserialize, Serialize};

use crate::board::ImprovementLevel;
use crate::core::dice::DiceRoll;
use crate::core::id::{PlayerId, PropertyId, TradeId};
use crate::core::money::Money;

/// A typed game event.
///
/// Property events carry the property's display name so a feed can be
/// rendered without a board lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameCreated {
        creator: PlayerId,
        vs_npc: bool,
    },
    PlayerJoined {
        player: PlayerId,
        name: String,
    },
    GameStarted {
        first_player: PlayerId,
    },
    DiceRolled {
        player: PlayerId,
        roll: DiceRoll,
    },
    PlayerMoved {
        player: PlayerId,
        from: u8,
        to: u8,
        laps: u8,
    },
    SalaryCollected {
        player: PlayerId,
        amount: Money,
    },
    PropertyPurchased {
        player: PlayerId,
        property: PropertyId,
        name: String,
        price: Money,
    },
    PropertyImproved {
        player: PlayerId,
        property: PropertyId,
        name: String,
        level: ImprovementLevel,
        cost: Money,
    },
    RentPaid {
        payer: PlayerId,
        owner: PlayerId,
        property: PropertyId,
        name: String,
        amount: Money,
    },
    PenaltyPaid {
        player: PlayerId,
        amount: Money,
        reason: String,
    },
    SentToSandTrap {
        player: PlayerId,
    },
    SandTrapEscaped {
        player: PlayerId,
    },
    ImprovementSold {
        player: PlayerId,
        property: PropertyId,
        name: String,
        level: ImprovementLevel,
        refund: Money,
    },
    PropertyMortgaged {
        player: PlayerId,
        property: PropertyId,
        name: String,
        value: Money,
    },
    TradeProposed {
        trade: TradeId,
        from: PlayerId,
        to: PlayerId,
    },
    TradeAccepted {
        trade: TradeId,
    },
    TradeRejected {
        trade: TradeId,
    },
    TradeCancelled {
        trade: TradeId,
    },
    PlayerBankrupt {
        player: PlayerId,
        creditor: Option<PlayerId>,
    },
    TurnEnded {
        player: PlayerId,
        turn_number: u32,
    },
    TurnStarted {
        player: PlayerId,
        turn_number: u32,
    },
    GameEnded {
        winner: PlayerId,
    },
}

impl GameEvent {
    /// Stable event type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameCreated { .. } => "GAME_CREATED",
            GameEvent::PlayerJoined { .. } => "PLAYER_JOINED",
            GameEvent::GameStarted { .. } => "GAME_STARTED",
            GameEvent::DiceRolled { .. } => "DICE_ROLLED",
            GameEvent::PlayerMoved { .. } => "PLAYER_MOVED",
            GameEvent::SalaryCollected { .. } => "SALARY_COLLECTED",
            GameEvent::PropertyPurchased { .. } => "PROPERTY_PURCHASED",
            GameEvent::PropertyImproved { .. } => "PROPERTY_IMPROVED",
            GameEvent::RentPaid { .. } => "RENT_PAID",
            GameEvent::PenaltyPaid { .. } => "PENALTY_PAID",
            GameEvent::SentToSandTrap { .. } => "SENT_TO_SAND_TRAP",
            GameEvent::SandTrapEscaped { .. } => "SAND_TRAP_ESCAPED",
            GameEvent::ImprovementSold { .. } => "IMPROVEMENT_SOLD",
            GameEvent::PropertyMortgaged { .. } => "PROPERTY_MORTGAGED",
            GameEvent::TradeProposed { .. } => "TRADE_PROPOSED",
            GameEvent::TradeAccepted { .. } => "TRADE_ACCEPTED",
            GameEvent::TradeRejected { .. } => "TRADE_REJECTED",
            GameEvent::TradeCancelled { .. } => "TRADE_CANCELLED",
            GameEvent::PlayerBankrupt { .. } => "PLAYER_BANKRUPT",
            GameEvent::TurnEnded { .. } => "TURN_ENDED",
            GameEvent::TurnStarted { .. } => "TURN_STARTED",
            GameEvent::GameEnded { .. } => "GAME_ENDED",
        }
    }

    /// Human-readable feed line.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            GameEvent::GameCreated { creator, vs_npc } => {
                if *vs_npc {
                    format!("{creator} created a game against an NPC")
                } else {
                    format!("{creator} created a game")
                }
            }
            GameEvent::PlayerJoined { name, .. } => format!("{name} joined the game"),
            GameEvent::GameStarted { first_player } => {
                format!("Game started; {first_player} to roll")
            }
            GameEvent::DiceRolled { player, roll } => format!("{player} rolled {roll}"),
            GameEvent::PlayerMoved { player, from, to, .. } => {
                format!("{player} moved from tile {from} to tile {to}")
            }
            GameEvent::SalaryCollected { player, amount } => {
                format!("{player} collected {amount} for completing a lap")
            }
            GameEvent::PropertyPurchased { player, name, price, .. } => {
                format!("{player} bought {name} for {price}")
            }
            GameEvent::PropertyImproved { player, name, level, .. } => {
                format!("{player} improved {name} to {level}")
            }
            GameEvent::RentPaid { payer, owner, name, amount, .. } => {
                format!("{payer} paid {amount} rent to {owner} for {name}")
            }
            GameEvent::PenaltyPaid { player, amount, reason } => {
                format!("{player} paid a {amount} penalty ({reason})")
            }
            GameEvent::SentToSandTrap { player } => {
                format!("{player} was sent to the sand trap")
            }
            GameEvent::SandTrapEscaped { player } => {
                format!("{player} escaped the sand trap")
            }
            GameEvent::ImprovementSold { player, name, refund, .. } => {
                format!("{player} sold an improvement on {name} for {refund}")
            }
            GameEvent::PropertyMortgaged { player, name, value, .. } => {
                format!("{player} mortgaged {name} for {value}")
            }
            GameEvent::TradeProposed { from, to, .. } => {
                format!("{from} proposed a trade to {to}")
            }
            GameEvent::TradeAccepted { .. } => "Trade accepted".to_string(),
            GameEvent::TradeRejected { .. } => "Trade rejected".to_string(),
            GameEvent::TradeCancelled { .. } => "Trade cancelled".to_string(),
            GameEvent::PlayerBankrupt { player, creditor } => match creditor {
                Some(creditor) => format!("{player} went bankrupt; assets pass to {creditor}"),
                None => format!("{player} went bankrupt; assets revert to the bank"),
            },
            GameEvent::TurnEnded { player, turn_number } => {
                format!("{player} ended turn {turn_number}")
            }
            GameEvent::TurnStarted { player, turn_number } => {
                format!("{player} began turn {turn_number}")
            }
            GameEvent::GameEnded { winner } => format!("{winner} wins the game"),
        }
    }
}

/// An event with its position in the game's log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the game's append-only log.
    pub sequence: u64,
    /// Turn during which the event was emitted.
    pub turn_number: u32,
    pub event: GameEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        let event = GameEvent::DiceRolled {
            player: PlayerId::new(0),
            roll: DiceRoll::of(3, 4),
        };
        assert_eq!(event.kind(), "DICE_ROLLED");
    }

    #[test]
    fn test_descriptions() {
        let rent = GameEvent::RentPaid {
            payer: PlayerId::new(0),
            owner: PlayerId::new(1),
            property: PropertyId::new(5),
            name: "Meadow Creek Hole 4".to_string(),
            amount: Money::from_dollars(16),
        };
        assert_eq!(
            rent.describe(),
            "Player 0 paid $16.00 rent to Player 1 for Meadow Creek Hole 4"
        );

        let bankrupt = GameEvent::PlayerBankrupt {
            player: PlayerId::new(1),
            creditor: None,
        };
        assert_eq!(
            bankrupt.describe(),
            "Player 1 went bankrupt; assets revert to the bank"
        );
    }

    #[test]
    fn test_record_serialization_is_tagged() {
        let record = EventRecord {
            sequence: 4,
            turn_number: 2,
            event: GameEvent::SalaryCollected {
                player: PlayerId::new(0),
                amount: Money::from_dollars(200),
            },
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"SalaryCollected\""));
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
