//! The standard course layout.
//!
//! 24 tiles: six groups of three holes interleaved with the start tile,
//! two pro shops, the sand trap, the water hazard and the members lounge.
//! Built once per process; every game shares the same `&'static Board`.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::core::id::PropertyId;
use crate::core::money::Money;

use super::group::CourseGroup;
use super::tile::{PropertyDef, Tile, TileKind};

/// Number of tiles on the course.
pub const BOARD_SIZE: u8 = 24;

/// Position of the start tile.
pub const HQ_POSITION: u8 = 0;

/// Position players are moved to when trapped.
pub const SAND_TRAP_POSITION: u8 = 8;

/// The immutable course: tiles plus property pricing definitions.
#[derive(Debug)]
pub struct Board {
    tiles: Vec<Tile>,
    properties: Vec<PropertyDef>,
    by_id: FxHashMap<PropertyId, usize>,
}

impl Board {
    /// The shared standard board, built on first use.
    #[must_use]
    pub fn standard() -> &'static Board {
        static BOARD: OnceLock<Board> = OnceLock::new();
        BOARD.get_or_init(Board::build_standard)
    }

    /// Tile at a position.
    ///
    /// Positions are always produced by the engine's modular movement, so
    /// an out-of-range value is a programming error, not a user error.
    #[must_use]
    pub fn tile_at(&self, position: u8) -> &Tile {
        &self.tiles[position as usize]
    }

    /// Static definition of a property, if the id exists.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<&PropertyDef> {
        self.by_id.get(&id).map(|&idx| &self.properties[idx])
    }

    /// All property definitions in board order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.iter()
    }

    /// Definitions of every property in a group.
    pub fn group_members(&self, group: CourseGroup) -> impl Iterator<Item = &PropertyDef> {
        self.properties.iter().filter(move |def| def.group == group)
    }

    /// All tiles in board order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    fn build_standard() -> Board {
        let mut builder = BoardBuilder::default();

        builder.special(TileKind::ClubhouseHq, "Fairway Start");

        builder.property("Dunes End Hole 1", CourseGroup::LinksNine, 60, 2, 50);
        builder.property("Dunes End Hole 2", CourseGroup::LinksNine, 60, 4, 50);
        builder.property("Dunes End Hole 3", CourseGroup::LinksNine, 80, 6, 50);

        builder.special(TileKind::ProShop, "Pro Shop");

        builder.property("Meadow Creek Hole 4", CourseGroup::PrairieNine, 100, 8, 50);
        builder.property("Meadow Creek Hole 5", CourseGroup::PrairieNine, 100, 8, 50);
        builder.property("Meadow Creek Hole 6", CourseGroup::PrairieNine, 120, 10, 50);

        builder.special(TileKind::SandTrap, "Bunker Beach");

        builder.property("Eagle Ridge Hole 7", CourseGroup::HighlandNine, 140, 12, 100);
        builder.property("Eagle Ridge Hole 8", CourseGroup::HighlandNine, 140, 12, 100);
        builder.property("Eagle Ridge Hole 9", CourseGroup::HighlandNine, 160, 14, 100);

        builder.special(TileKind::MembersLounge, "Members Lounge");

        builder.property("Oceanview Hole 10", CourseGroup::CoastalNine, 180, 16, 100);
        builder.property("Oceanview Hole 11", CourseGroup::CoastalNine, 180, 16, 100);
        builder.property("Oceanview Hole 12", CourseGroup::CoastalNine, 200, 18, 100);

        builder.special(TileKind::WaterHazard, "Lake Penalty");

        builder.property("Champion Oaks Hole 13", CourseGroup::ChampionshipNine, 220, 20, 150);
        builder.property("Champion Oaks Hole 14", CourseGroup::ChampionshipNine, 220, 20, 150);
        builder.property("Champion Oaks Hole 15", CourseGroup::ChampionshipNine, 240, 22, 150);

        builder.special(TileKind::ProShop, "Tournament Pro Shop");

        builder.property("Grand Pines Hole 16", CourseGroup::MastersNine, 260, 24, 200);
        builder.property("Grand Pines Hole 17", CourseGroup::MastersNine, 280, 26, 200);
        builder.property("Grand Pines Hole 18", CourseGroup::MastersNine, 300, 30, 200);

        builder.finish()
    }
}

#[derive(Default)]
struct BoardBuilder {
    tiles: Vec<Tile>,
    properties: Vec<PropertyDef>,
}

impl BoardBuilder {
    fn special(&mut self, kind: TileKind, name: &'static str) {
        let position = self.tiles.len() as u8;
        self.tiles.push(Tile {
            position,
            name,
            kind,
        });
    }

    fn property(
        &mut self,
        name: &'static str,
        group: CourseGroup,
        price_dollars: i64,
        rent_dollars: i64,
        improvement_dollars: i64,
    ) {
        let position = self.tiles.len() as u8;
        let id = PropertyId::new(position);
        self.properties.push(PropertyDef {
            id,
            name,
            group,
            position,
            purchase_price: Money::from_dollars(price_dollars),
            base_rent: Money::from_dollars(rent_dollars),
            improvement_cost: Money::from_dollars(improvement_dollars),
        });
        self.tiles.push(Tile {
            position,
            name,
            kind: TileKind::Property(id),
        });
    }

    fn finish(self) -> Board {
        assert_eq!(
            self.tiles.len(),
            BOARD_SIZE as usize,
            "standard board must have exactly {BOARD_SIZE} tiles"
        );
        let by_id = self
            .properties
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.id, idx))
            .collect();
        Board {
            tiles: self.tiles,
            properties: self.properties,
            by_id,
        }
    }
}
