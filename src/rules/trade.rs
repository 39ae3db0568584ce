//! Trade validation and execution.
//!
//! Validation runs both at proposal time and again at acceptance time:
//! the proposer may keep acting while the offer is pending, so the assets
//! must be re-checked before the swap.

use crate::core::id::{PlayerId, PropertyId};
use crate::core::money::Money;
use crate::error::RuleViolation;
use crate::state::{Game, TradeOffer};

/// Check that every referenced asset is really available.
///
/// Legal iff the parties are two distinct seated players, each listed
/// property is owned by the stated party, and neither side offers more
/// currency than it holds.
pub fn validate(game: &Game, offer: &TradeOffer) -> Result<(), RuleViolation> {
    if offer.offered_by == offer.offered_to {
        return Err(RuleViolation::TradeWithSelf);
    }
    let offering = game
        .player(offer.offered_by)
        .ok_or(RuleViolation::NotInGame)?;
    let receiving = game
        .player(offer.offered_to)
        .ok_or(RuleViolation::RecipientNotInGame)?;

    if offer.offered_properties.iter().any(|&id| !offering.owns(id)) {
        return Err(RuleViolation::TradeAssetMismatch);
    }
    if offer.requested_properties.iter().any(|&id| !receiving.owns(id)) {
        return Err(RuleViolation::TradeAssetMismatch);
    }

    if offer.offered_currency.is_negative() || offer.requested_currency.is_negative() {
        return Err(RuleViolation::TradeCurrencyUnavailable);
    }
    if offering.currency < offer.offered_currency {
        return Err(RuleViolation::TradeCurrencyUnavailable);
    }
    if receiving.currency < offer.requested_currency {
        return Err(RuleViolation::TradeCurrencyUnavailable);
    }

    Ok(())
}

/// Atomically swap the traded assets.
///
/// Re-validates first; on success ownership and currency move in both
/// directions, creating and destroying nothing.
pub fn execute(game: &mut Game, offer: &TradeOffer) -> Result<(), RuleViolation> {
    validate(game, offer)?;

    for &id in &offer.offered_properties {
        transfer(game, id, offer.offered_by, offer.offered_to);
    }
    for &id in &offer.requested_properties {
        transfer(game, id, offer.offered_to, offer.offered_by);
    }

    if offer.offered_currency.is_positive() {
        move_cash(game, offer.offered_by, offer.offered_to, offer.offered_currency);
    }
    if offer.requested_currency.is_positive() {
        move_cash(game, offer.offered_to, offer.offered_by, offer.requested_currency);
    }

    Ok(())
}

fn transfer(game: &mut Game, id: PropertyId, from: PlayerId, to: PlayerId) {
    if let Some(player) = game.player_mut(from) {
        player.owned_properties.remove(&id);
    }
    if let Some(player) = game.player_mut(to) {
        player.owned_properties.insert(id);
    }
    if let Some(state) = game.property_state_mut(id) {
        state.owner = Some(to);
    }
}

fn move_cash(game: &mut Game, from: PlayerId, to: PlayerId, amount: Money) {
    if let Some(player) = game.player_mut(from) {
        player.debit(amount);
    }
    if let Some(player) = game.player_mut(to) {
        player.credit(amount);
    }
}
