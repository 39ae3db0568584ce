//! Debt settlement: liquidation, then bankruptcy.
//!
//! Any payment obligation funnels through [`settle_debt`]. A debtor who
//! cannot cover the amount in cash is liquidated in a deterministic
//! order before bankruptcy is even considered, so committed currency
//! never goes negative and the outcome is identical on every replay.

use crate::board::Board;
use crate::core::id::{PlayerId, PropertyId};
use crate::core::money::Money;
use crate::state::{Game, GameEvent};

/// Why a payment is owed. Determines the creditor and the event emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DebtReason {
    /// Rent owed to the owner of a landed-on property.
    Rent {
        property: PropertyId,
        owner: PlayerId,
    },
    /// A fixed fee owed to the bank.
    Penalty { label: &'static str },
}

impl DebtReason {
    const fn creditor(&self) -> Option<PlayerId> {
        match self {
            DebtReason::Rent { owner, .. } => Some(*owner),
            DebtReason::Penalty { .. } => None,
        }
    }
}

/// Settle a payment obligation, liquidating and bankrupting as needed.
///
/// When liquid currency falls short the debtor's properties are visited in
/// ascending purchase-price order (property id breaks ties): improvements
/// are sold back one step at a time, then the property is mortgaged,
/// stopping as soon as the debt is covered. A debtor still insolvent after
/// exhausting every holding goes bankrupt: remaining cash and properties
/// pass to the creditor for a rent debt, or revert to the bank pristine
/// for a bank debt, and the player leaves the turn rotation.
pub fn settle_debt(game: &mut Game, debtor: PlayerId, amount: Money, reason: &DebtReason) {
    liquidate_until(game, debtor, amount);

    if covered(game, debtor, amount) {
        if let Some(player) = game.player_mut(debtor) {
            player.debit(amount);
        }
        match reason {
            DebtReason::Rent { property, owner } => {
                if let Some(owner_seat) = game.player_mut(*owner) {
                    owner_seat.credit(amount);
                }
                game.record(GameEvent::RentPaid {
                    payer: debtor,
                    owner: *owner,
                    property: *property,
                    name: property_name(*property),
                    amount,
                });
            }
            DebtReason::Penalty { label } => {
                game.record(GameEvent::PenaltyPaid {
                    player: debtor,
                    amount,
                    reason: (*label).to_string(),
                });
            }
        }
    } else {
        bankrupt(game, debtor, reason.creditor());
    }
}

fn covered(game: &Game, debtor: PlayerId, amount: Money) -> bool {
    game.player(debtor).is_some_and(|p| p.currency >= amount)
}

fn property_name(id: PropertyId) -> String {
    Board::standard()
        .property(id)
        .map_or_else(String::new, |def| def.name.to_string())
}

/// Raise cash until the target is covered or nothing is left to sell.
fn liquidate_until(game: &mut Game, debtor: PlayerId, target: Money) {
    let board = Board::standard();

    // Lowest purchase price first, id as tie-break.
    let mut plan: Vec<(Money, PropertyId)> = game
        .properties_of(debtor)
        .filter_map(|(id, _)| board.property(id).map(|def| (def.purchase_price, id)))
        .collect();
    plan.sort();

    for (_, id) in plan {
        if covered(game, debtor, target) {
            return;
        }
        let Some(def) = board.property(id) else {
            continue;
        };

        // Sell improvements one step at a time.
        while !covered(game, debtor, target) {
            let Some(level) = game.property_state(id).map(|st| st.improvement) else {
                break;
            };
            let Some(lower) = level.previous() else {
                break;
            };
            if let Some(state) = game.property_state_mut(id) {
                state.improvement = lower;
            }
            let refund = def.improvement_resale();
            if let Some(player) = game.player_mut(debtor) {
                player.credit(refund);
            }
            game.record(GameEvent::ImprovementSold {
                player: debtor,
                property: id,
                name: def.name.to_string(),
                level: lower,
                refund,
            });
        }
        if covered(game, debtor, target) {
            return;
        }

        // Then mortgage the stripped property.
        let already_mortgaged = game.property_state(id).map_or(true, |st| st.mortgaged);
        if !already_mortgaged {
            if let Some(state) = game.property_state_mut(id) {
                state.mortgaged = true;
            }
            let value = def.mortgage_value();
            if let Some(player) = game.player_mut(debtor) {
                player.credit(value);
            }
            game.record(GameEvent::PropertyMortgaged {
                player: debtor,
                property: id,
                name: def.name.to_string(),
                value,
            });
        }
    }
}

/// Remove the debtor from the game, forfeiting everything.
fn bankrupt(game: &mut Game, debtor: PlayerId, creditor: Option<PlayerId>) {
    let cash = game.player(debtor).map_or(Money::ZERO, |p| p.currency);
    if let Some(player) = game.player_mut(debtor) {
        player.currency = Money::ZERO;
        player.bankrupt = true;
    }
    if let Some(creditor_id) = creditor {
        if cash.is_positive() {
            if let Some(seat) = game.player_mut(creditor_id) {
                seat.credit(cash);
            }
        }
    }

    let mut forfeited: Vec<PropertyId> = game.properties_of(debtor).map(|(id, _)| id).collect();
    forfeited.sort();
    for id in forfeited {
        if let Some(player) = game.player_mut(debtor) {
            player.owned_properties.remove(&id);
        }
        match creditor {
            // Rent debt: the creditor takes the property as-is.
            Some(creditor_id) => {
                if let Some(state) = game.property_state_mut(id) {
                    state.owner = Some(creditor_id);
                }
                if let Some(seat) = game.player_mut(creditor_id) {
                    seat.owned_properties.insert(id);
                }
            }
            // Bank debt: back to the bank, pristine.
            None => {
                if let Some(state) = game.property_state_mut(id) {
                    state.reset();
                }
            }
        }
    }

    game.record(GameEvent::PlayerBankrupt {
        player: debtor,
        creditor,
    });
}
