//! Rent computation.

use crate::board::{ImprovementLevel, PropertyDef};
use crate::core::money::Money;
use crate::state::PropertyState;

/// Rent owed for landing on a property.
///
/// - Mortgaged properties collect nothing.
/// - Improved properties charge base rent times the level's multiplier.
/// - An unimproved property in a fully-owned group charges double base
///   rent (the monopoly bonus applies only before improvements exist).
#[must_use]
pub fn rent_due(def: &PropertyDef, state: &PropertyState, owner_has_group: bool) -> Money {
    if state.mortgaged {
        return Money::ZERO;
    }
    if owner_has_group && state.improvement == ImprovementLevel::None {
        return def.base_rent.times(2);
    }
    def.base_rent.times(state.improvement.rent_multiplier())
}
