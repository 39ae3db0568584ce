//! Course groups.
//!
//! Six groups of three holes each. Owning a whole group doubles base rent
//! on its unimproved tiles and unlocks improvements.

use serde::{Deserialize, Serialize};

/// One of the six course groups, cheapest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseGroup {
    LinksNine,
    PrairieNine,
    HighlandNine,
    CoastalNine,
    ChampionshipNine,
    MastersNine,
}

impl CourseGroup {
    /// All groups in board order.
    pub const ALL: [CourseGroup; 6] = [
        CourseGroup::LinksNine,
        CourseGroup::PrairieNine,
        CourseGroup::HighlandNine,
        CourseGroup::CoastalNine,
        CourseGroup::ChampionshipNine,
        CourseGroup::MastersNine,
    ];

    /// Properties per group.
    pub const SIZE: usize = 3;

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            CourseGroup::LinksNine => "Links Nine",
            CourseGroup::PrairieNine => "Prairie Nine",
            CourseGroup::HighlandNine => "Highland Nine",
            CourseGroup::CoastalNine => "Coastal Nine",
            CourseGroup::ChampionshipNine => "Championship Nine",
            CourseGroup::MastersNine => "Masters Nine",
        }
    }

    /// Display color used by clients.
    #[must_use]
    pub const fn hex_color(self) -> &'static str {
        match self {
            CourseGroup::LinksNine => "#8B4513",
            CourseGroup::PrairieNine => "#87CEEB",
            CourseGroup::HighlandNine => "#DDA0DD",
            CourseGroup::CoastalNine => "#FFA500",
            CourseGroup::ChampionshipNine => "#DC143C",
            CourseGroup::MastersNine => "#0000CD",
        }
    }
}

impl std::fmt::Display for CourseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
