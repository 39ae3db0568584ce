//! Property purchase.

use crate::board::Board;
use crate::core::id::{PlayerId, PropertyId};
use crate::error::RuleViolation;
use crate::state::{Game, GameEvent};

/// Buy the property the player is standing on.
///
/// Legal iff the id names a property, nobody owns it, the buyer stands on
/// its tile and can afford the price. All checks run before any mutation.
pub fn purchase(
    game: &mut Game,
    player_id: PlayerId,
    property_id: PropertyId,
) -> Result<(), RuleViolation> {
    let def = Board::standard()
        .property(property_id)
        .ok_or(RuleViolation::UnknownProperty(property_id))?;
    let state = game
        .property_state(property_id)
        .ok_or(RuleViolation::UnknownProperty(property_id))?;
    if state.owner.is_some() {
        return Err(RuleViolation::PropertyAlreadyOwned);
    }

    let player = game.player(player_id).ok_or(RuleViolation::NotInGame)?;
    if player.position != def.position {
        return Err(RuleViolation::NotOnPropertyTile);
    }
    if !player.can_afford(def.purchase_price) {
        return Err(RuleViolation::InsufficientFunds {
            required: def.purchase_price,
            available: player.currency,
        });
    }

    let price = def.purchase_price;
    let name = def.name.to_string();
    if let Some(player) = game.player_mut(player_id) {
        player.debit(price);
        player.owned_properties.insert(property_id);
    }
    if let Some(state) = game.property_state_mut(property_id) {
        state.owner = Some(player_id);
    }
    game.record(GameEvent::PropertyPurchased {
        player: player_id,
        property: property_id,
        name,
        price,
    });

    Ok(())
}
