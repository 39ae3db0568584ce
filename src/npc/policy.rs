//! The difficulty-tiered NPC policy.
//!
//! Decision order in the action phase:
//!
//! 1. Buy the landed-on property: always when it completes a group,
//!    otherwise with the tier's probability while keeping a cash reserve
//!    scaled to the opponent's best rent.
//! 2. Build the cheapest eligible improvement, gated by the tier's
//!    improvement probability.
//! 3. Ruthless only: bid cash for the single hole missing from a
//!    two-owned group, at most once per turn.
//! 4. End the turn.
//!
//! A pending trade addressed to the NPC is answered before anything else
//! using a value-parity comparison against the tier's threshold.

use smallvec::smallvec;

use crate::board::{Board, CourseGroup, PropertyDef, TileKind};
use crate::core::id::{PlayerId, PropertyId};
use crate::core::money::Money;
use crate::core::player::Difficulty;
use crate::core::rng::GameRng;
use crate::engine::PlayerAction;
use crate::rules;
use crate::state::{Game, GameEvent, TradeOffer, TradeProposal, TurnPhase};

/// Premium applied to a property's price when valuing trades.
const TRADE_VALUE_PREMIUM: f64 = 1.2;

/// Markup over purchase price when bidding for a group's missing hole.
const MISSING_HOLE_BID_RATE: f64 = 1.25;

/// Pick the NPC's next action for the current state.
#[must_use]
pub fn choose_action(game: &Game, npc_id: PlayerId, difficulty: Difficulty) -> PlayerAction {
    // Keyed by the commit counter: reproducible for a given snapshot,
    // fresh for every committed action.
    let mut rng = game.rng().for_context(&format!("npc-{}", game.version));

    if let Some(trade) = &game.pending_trade {
        if trade.is_pending() && trade.offered_to == npc_id {
            return respond_to_trade(trade, difficulty);
        }
    }

    match game.turn_phase {
        TurnPhase::Roll => PlayerAction::RollDice,
        TurnPhase::Action => action_phase(game, npc_id, difficulty, &mut rng),
    }
}

fn action_phase(
    game: &Game,
    npc_id: PlayerId,
    difficulty: Difficulty,
    rng: &mut GameRng,
) -> PlayerAction {
    let board = Board::standard();
    let Some(seat) = game.player(npc_id) else {
        return PlayerAction::EndTurn;
    };

    if let TileKind::Property(property_id) = board.tile_at(seat.position).kind {
        let available = game
            .property_state(property_id)
            .is_some_and(|st| st.owner.is_none());
        if available {
            if let Some(def) = board.property(property_id) {
                if seat.can_afford(def.purchase_price)
                    && should_purchase(game, npc_id, difficulty, def, rng)
                {
                    return PlayerAction::PurchaseProperty {
                        property: property_id,
                    };
                }
            }
        }
    }

    if let Some(property) = cheapest_improvable(game, npc_id) {
        if rng.gen_bool(difficulty.improve_probability()) {
            return PlayerAction::ImproveProperty { property };
        }
    }

    if difficulty.proposes_trades()
        && game.pending_trade.is_none()
        && !proposed_this_turn(game, npc_id)
    {
        if let Some(action) = propose_missing_hole_trade(game, npc_id) {
            return action;
        }
    }

    PlayerAction::EndTurn
}

fn should_purchase(
    game: &Game,
    npc_id: PlayerId,
    difficulty: Difficulty,
    def: &PropertyDef,
    rng: &mut GameRng,
) -> bool {
    // A group-completing hole is always worth it.
    if completes_group(game, npc_id, def) {
        return true;
    }

    let Some(seat) = game.player(npc_id) else {
        return false;
    };
    let reserve = opponent_max_rent(game, npc_id).scaled(difficulty.reserve_factor());
    if seat.currency - def.purchase_price < reserve {
        return false;
    }

    rng.gen_bool(difficulty.purchase_probability())
}

/// Whether buying this hole would give the NPC the whole group.
fn completes_group(game: &Game, npc_id: PlayerId, def: &PropertyDef) -> bool {
    Board::standard()
        .group_members(def.group)
        .filter(|member| member.id != def.id)
        .all(|member| {
            game.property_state(member.id)
                .is_some_and(|st| st.is_owned_by(npc_id))
        })
}

/// The highest rent the opponent could currently charge.
fn opponent_max_rent(game: &Game, npc_id: PlayerId) -> Money {
    let Some(opponent) = game.opponent_of(npc_id) else {
        return Money::ZERO;
    };
    let board = Board::standard();
    game.properties_of(opponent.id)
        .filter_map(|(id, state)| {
            board.property(id).map(|def| {
                let has_group = game.owns_complete_group(opponent.id, def.group);
                rules::rent::rent_due(def, state, has_group)
            })
        })
        .max()
        .unwrap_or(Money::ZERO)
}

/// Cheapest improvement the NPC could legally build right now.
fn cheapest_improvable(game: &Game, npc_id: PlayerId) -> Option<PropertyId> {
    let board = Board::standard();
    let seat = game.player(npc_id)?;

    let mut candidates: Vec<(Money, PropertyId)> = game
        .properties_of(npc_id)
        .filter_map(|(id, state)| {
            let def = board.property(id)?;
            if state.improvement.is_max()
                || !game.owns_complete_group(npc_id, def.group)
                || !game.group_unmortgaged(def.group)
                || !seat.can_afford(def.improvement_cost)
            {
                return None;
            }
            Some((def.improvement_cost, id))
        })
        .collect();
    candidates.sort();
    candidates.first().map(|&(_, id)| id)
}

/// One proposal per turn; checked against the event log.
fn proposed_this_turn(game: &Game, npc_id: PlayerId) -> bool {
    game.events()
        .iter()
        .rev()
        .take_while(|record| record.turn_number == game.turn_number)
        .any(|record| matches!(record.event, GameEvent::TradeProposed { from, .. } if from == npc_id))
}

/// Bid cash for the one hole the opponent holds out of a two-owned group.
fn propose_missing_hole_trade(game: &Game, npc_id: PlayerId) -> Option<PlayerAction> {
    let board = Board::standard();
    let seat = game.player(npc_id)?;
    let opponent = game.opponent_of(npc_id)?;
    if opponent.bankrupt {
        return None;
    }

    for group in CourseGroup::ALL {
        let mut owned_by_npc = 0;
        let mut held_by_opponent: Option<&PropertyDef> = None;
        for def in board.group_members(group) {
            match game.property_state(def.id).and_then(|st| st.owner) {
                Some(owner) if owner == npc_id => owned_by_npc += 1,
                Some(owner) if owner == opponent.id => held_by_opponent = Some(def),
                _ => {}
            }
        }
        if owned_by_npc != CourseGroup::SIZE - 1 {
            continue;
        }
        let Some(def) = held_by_opponent else {
            continue;
        };

        let bid = def.purchase_price.scaled(MISSING_HOLE_BID_RATE);
        if seat.can_afford(bid) {
            return Some(PlayerAction::ProposeTrade(TradeProposal {
                to: opponent.id,
                offered_properties: smallvec![],
                offered_currency: bid,
                requested_properties: smallvec![def.id],
                requested_currency: Money::ZERO,
            }));
        }
    }
    None
}

/// Accept when incoming value clears the tier's threshold over outgoing.
fn respond_to_trade(trade: &TradeOffer, difficulty: Difficulty) -> PlayerAction {
    // The receiver gives the requested side and gains the offered side.
    let giving = trade_value(&trade.requested_properties, trade.requested_currency);
    let receiving = trade_value(&trade.offered_properties, trade.offered_currency);

    if receiving >= giving * difficulty.trade_acceptance_threshold() {
        PlayerAction::AcceptTrade
    } else {
        PlayerAction::RejectTrade
    }
}

fn trade_value(properties: &[PropertyId], currency: Money) -> f64 {
    let board = Board::standard();
    let property_value: f64 = properties
        .iter()
        .filter_map(|&id| board.property(id))
        .map(|def| def.purchase_price.cents() as f64 * TRADE_VALUE_PREMIUM)
        .sum();
    property_value + currency.cents() as f64
}
