//! Property improvement ladder.
//!
//! Six rungs: unimproved, four clubhouse tiers, then the terminal resort.
//! Each improvement action climbs exactly one rung. Rent scales by a fixed
//! multiplier per rung.

use serde::{Deserialize, Serialize};

/// Improvement level of a property.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ImprovementLevel {
    #[default]
    None,
    Level1,
    Level2,
    Level3,
    Level4,
    Resort,
}

impl ImprovementLevel {
    /// The ladder in ascending order.
    pub const LADDER: [ImprovementLevel; 6] = [
        ImprovementLevel::None,
        ImprovementLevel::Level1,
        ImprovementLevel::Level2,
        ImprovementLevel::Level3,
        ImprovementLevel::Level4,
        ImprovementLevel::Resort,
    ];

    /// Rent multiplier applied to the property's base rent.
    #[must_use]
    pub const fn rent_multiplier(self) -> i64 {
        match self {
            ImprovementLevel::None => 1,
            ImprovementLevel::Level1 => 3,
            ImprovementLevel::Level2 => 5,
            ImprovementLevel::Level3 => 8,
            ImprovementLevel::Level4 => 12,
            ImprovementLevel::Resort => 20,
        }
    }

    /// Number of improvement steps built so far (0-5).
    #[must_use]
    pub const fn steps(self) -> u8 {
        match self {
            ImprovementLevel::None => 0,
            ImprovementLevel::Level1 => 1,
            ImprovementLevel::Level2 => 2,
            ImprovementLevel::Level3 => 3,
            ImprovementLevel::Level4 => 4,
            ImprovementLevel::Resort => 5,
        }
    }

    #[must_use]
    pub const fn is_max(self) -> bool {
        matches!(self, ImprovementLevel::Resort)
    }

    /// The next rung up, or `None` at the resort.
    #[must_use]
    pub const fn next(self) -> Option<ImprovementLevel> {
        match self {
            ImprovementLevel::None => Some(ImprovementLevel::Level1),
            ImprovementLevel::Level1 => Some(ImprovementLevel::Level2),
            ImprovementLevel::Level2 => Some(ImprovementLevel::Level3),
            ImprovementLevel::Level3 => Some(ImprovementLevel::Level4),
            ImprovementLevel::Level4 => Some(ImprovementLevel::Resort),
            ImprovementLevel::Resort => None,
        }
    }

    /// The previous rung down, or `None` when unimproved.
    #[must_use]
    pub const fn previous(self) -> Option<ImprovementLevel> {
        match self {
            ImprovementLevel::None => None,
            ImprovementLevel::Level1 => Some(ImprovementLevel::None),
            ImprovementLevel::Level2 => Some(ImprovementLevel::Level1),
            ImprovementLevel::Level3 => Some(ImprovementLevel::Level2),
            ImprovementLevel::Level4 => Some(ImprovementLevel::Level3),
            ImprovementLevel::Resort => Some(ImprovementLevel::Level4),
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ImprovementLevel::None => "Unimproved",
            ImprovementLevel::Level1 => "Clubhouse I",
            ImprovementLevel::Level2 => "Clubhouse II",
            ImprovementLevel::Level3 => "Clubhouse III",
            ImprovementLevel::Level4 => "Clubhouse IV",
            ImprovementLevel::Resort => "Resort",
        }
    }
}

impl std::fmt::Display for ImprovementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
