//! Typed identifiers.
//!
//! Every id is a thin newtype over an integer so the compiler keeps game,
//! player, property and trade handles from being mixed up. Player ids are
//! seat indices (0 or 1, seating order); property ids are the board
//! position of the property tile, which is stable because the board is
//! fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Game session identifier, allocated by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game-{}", self.0)
    }
}

/// Player identifier: the seat index in seating order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Property identifier: the board position of the property tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u8);

impl PropertyId {
    /// Create a new property ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// The board position this property sits on.
    #[must_use]
    pub const fn position(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "property-{}", self.0)
    }
}

/// Trade offer identifier, allocated per game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeId(pub u32);

impl TradeId {
    /// Create a new trade ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trade-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(format!("{}", GameId::new(7)), "game-7");
        assert_eq!(format!("{}", PlayerId::new(1)), "Player 1");
        assert_eq!(format!("{}", PropertyId::new(23)), "property-23");
        assert_eq!(format!("{}", TradeId::new(4)), "trade-4");
    }

    #[test]
    fn test_property_id_is_position() {
        assert_eq!(PropertyId::new(13).position(), 13);
    }

    #[test]
    fn test_id_serialization() {
        let id = PropertyId::new(9);
        let json = serde_json::to_string(&id).unwrap();
        let back: PropertyId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
