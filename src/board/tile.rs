//! Tiles and static property definitions.

use serde::Serialize;

use crate::core::constants::{IMPROVEMENT_RESALE_RATE, MORTGAGE_RATE, UNMORTGAGE_INTEREST};
use crate::core::id::PropertyId;
use crate::core::money::Money;

use super::group::CourseGroup;

/// What a tile does when landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TileKind {
    /// A purchasable hole.
    Property(PropertyId),
    /// Start tile; completing a lap past it pays the salary.
    ClubhouseHq,
    /// Safe tile.
    ProShop,
    /// Landing here (or a third consecutive doubles) traps the player.
    SandTrap,
    /// Landing here costs a fixed penalty to the bank.
    WaterHazard,
    /// Safe tile.
    MembersLounge,
}

/// A single tile on the course.
#[derive(Clone, Debug, Serialize)]
pub struct Tile {
    pub position: u8,
    pub name: &'static str,
    pub kind: TileKind,
}

impl Tile {
    #[must_use]
    pub const fn is_property(&self) -> bool {
        matches!(self.kind, TileKind::Property(_))
    }

    /// The property on this tile, if any.
    #[must_use]
    pub const fn property_id(&self) -> Option<PropertyId> {
        match self.kind {
            TileKind::Property(id) => Some(id),
            _ => None,
        }
    }
}

/// Static pricing definition of a property.
///
/// Immutable and shared across games; the per-game mutable part (owner,
/// improvement level, mortgage flag) lives on the `Game`.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyDef {
    pub id: PropertyId,
    pub name: &'static str,
    pub group: CourseGroup,
    pub position: u8,
    pub purchase_price: Money,
    pub base_rent: Money,
    pub improvement_cost: Money,
}

impl PropertyDef {
    /// Cash credited when the property is mortgaged.
    #[must_use]
    pub fn mortgage_value(&self) -> Money {
        self.purchase_price.scaled(MORTGAGE_RATE)
    }

    /// Cost to lift a mortgage (mortgage value plus interest).
    #[must_use]
    pub fn unmortgage_cost(&self) -> Money {
        self.mortgage_value().scaled(UNMORTGAGE_INTEREST)
    }

    /// Refund for selling one improvement step.
    #[must_use]
    pub fn improvement_resale(&self) -> Money {
        self.improvement_cost.scaled(IMPROVEMENT_RESALE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> PropertyDef {
        PropertyDef {
            id: PropertyId::new(1),
            name: "Dunes End Hole 1",
            group: CourseGroup::LinksNine,
            position: 1,
            purchase_price: Money::from_dollars(60),
            base_rent: Money::from_dollars(2),
            improvement_cost: Money::from_dollars(50),
        }
    }

    #[test]
    fn test_mortgage_math() {
        let def = def();
        assert_eq!(def.mortgage_value(), Money::from_dollars(30));
        assert_eq!(def.unmortgage_cost(), Money::from_dollars(33));
        assert_eq!(def.improvement_resale(), Money::from_dollars(25));
    }

    #[test]
    fn test_tile_property_accessor() {
        let tile = Tile {
            position: 1,
            name: "Dunes End Hole 1",
            kind: TileKind::Property(PropertyId::new(1)),
        };
        assert!(tile.is_property());
        assert_eq!(tile.property_id(), Some(PropertyId::new(1)));

        let lounge = Tile {
            position: 12,
            name: "Members Lounge",
            kind: TileKind::MembersLounge,
        };
        assert!(!lounge.is_property());
        assert_eq!(lounge.property_id(), None);
    }
}
