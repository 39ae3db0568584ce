//! Phase and turn enforcement plus action dispatch.
//!
//! The phase graph within a turn: `Roll` → (`Roll` on doubles)* →
//! `Action` → next player's `Roll`. Trade negotiation rides alongside
//! `Action` via `pending_trade`, and the handoff itself is momentary.
//!
//! Everything here mutates the game value it is handed and reports
//! illegality as a `RuleViolation`; the coordinator's clone-apply-swap
//! makes a rejection indistinguishable from never having tried.

use crate::board::{Board, TileKind, SAND_TRAP_POSITION};
use crate::core::constants::{DOUBLES_TO_SAND_TRAP, LAP_SALARY, WATER_HAZARD_PENALTY};
use crate::core::dice::DiceRoll;
use crate::core::id::{PlayerId, TradeId};
use crate::error::RuleViolation;
use crate::rules;
use crate::rules::settlement::DebtReason;
use crate::state::{Game, GameEvent, GameStatus, TradeOffer, TurnPhase};

use super::action::PlayerAction;

/// Apply one player action to the game.
///
/// Returns the dice roll when the action was a roll. Any violation is
/// returned as a value; the machine never panics on player input.
pub fn apply_action(
    game: &mut Game,
    player_id: PlayerId,
    action: &PlayerAction,
) -> Result<Option<DiceRoll>, RuleViolation> {
    preflight(game, player_id)?;

    match action {
        PlayerAction::RollDice => {
            require_turn(game, player_id)?;
            require_phase(game, TurnPhase::Roll)?;
            let roll = DiceRoll::roll(game.rng_mut());
            resolve_roll(game, player_id, roll);
            Ok(Some(roll))
        }
        PlayerAction::PurchaseProperty { property } => {
            require_turn(game, player_id)?;
            require_phase(game, TurnPhase::Action)?;
            rules::purchase::purchase(game, player_id, *property)?;
            Ok(None)
        }
        PlayerAction::ImproveProperty { property } => {
            require_turn(game, player_id)?;
            require_phase(game, TurnPhase::Action)?;
            rules::improve::improve(game, player_id, *property)?;
            Ok(None)
        }
        PlayerAction::ProposeTrade(proposal) => {
            require_turn(game, player_id)?;
            require_phase(game, TurnPhase::Action)?;
            if game
                .pending_trade
                .as_ref()
                .is_some_and(TradeOffer::is_pending)
            {
                return Err(RuleViolation::TradeAlreadyPending);
            }

            // Validate with a probe id so a rejection leaves no trace.
            let mut offer =
                TradeOffer::from_proposal(TradeId::new(0), player_id, proposal.clone());
            rules::trade::validate(game, &offer)?;

            offer.id = game.allocate_trade_id();
            game.record(GameEvent::TradeProposed {
                trade: offer.id,
                from: player_id,
                to: offer.offered_to,
            });
            game.pending_trade = Some(offer);
            Ok(None)
        }
        PlayerAction::AcceptTrade => {
            let offer = pending_trade_for(game, player_id)?;
            rules::trade::execute(game, &offer)?;
            game.record(GameEvent::TradeAccepted { trade: offer.id });
            game.pending_trade = None;
            Ok(None)
        }
        PlayerAction::RejectTrade => {
            let offer = pending_trade_for(game, player_id)?;
            game.record(GameEvent::TradeRejected { trade: offer.id });
            game.pending_trade = None;
            Ok(None)
        }
        PlayerAction::EndTurn => {
            require_turn(game, player_id)?;
            require_phase(game, TurnPhase::Action)?;
            advance_turn(game, player_id);
            Ok(None)
        }
    }
}

/// Apply a predetermined roll instead of drawing from the game RNG.
///
/// Same validations as a submitted `RollDice`; used when the dice are
/// supplied externally (scripted scenarios, deterministic tests).
pub fn apply_roll(
    game: &mut Game,
    player_id: PlayerId,
    roll: DiceRoll,
) -> Result<(), RuleViolation> {
    preflight(game, player_id)?;
    require_turn(game, player_id)?;
    require_phase(game, TurnPhase::Roll)?;
    resolve_roll(game, player_id, roll);
    Ok(())
}

// === Validation helpers ===

fn preflight(game: &Game, player_id: PlayerId) -> Result<(), RuleViolation> {
    match game.status {
        GameStatus::Waiting => return Err(RuleViolation::GameNotStarted),
        GameStatus::Completed | GameStatus::Cancelled => return Err(RuleViolation::GameOver),
        GameStatus::InProgress => {}
    }
    let player = game.player(player_id).ok_or(RuleViolation::NotInGame)?;
    if player.bankrupt {
        return Err(RuleViolation::PlayerBankrupt);
    }
    Ok(())
}

fn require_turn(game: &Game, player_id: PlayerId) -> Result<(), RuleViolation> {
    if game.current_player != player_id {
        return Err(RuleViolation::NotYourTurn);
    }
    Ok(())
}

fn require_phase(game: &Game, expected: TurnPhase) -> Result<(), RuleViolation> {
    if game.turn_phase != expected {
        return Err(RuleViolation::WrongPhase(game.turn_phase));
    }
    Ok(())
}

fn pending_trade_for(game: &Game, player_id: PlayerId) -> Result<TradeOffer, RuleViolation> {
    let offer = game
        .pending_trade
        .clone()
        .filter(TradeOffer::is_pending)
        .ok_or(RuleViolation::NoPendingTrade)?;
    if offer.offered_to != player_id {
        return Err(RuleViolation::NotTradeRecipient);
    }
    Ok(offer)
}

// === Roll resolution ===

fn resolve_roll(game: &mut Game, player_id: PlayerId, roll: DiceRoll) {
    game.last_roll = Some(roll);
    game.record(GameEvent::DiceRolled {
        player: player_id,
        roll,
    });

    let trapped = game
        .player(player_id)
        .is_some_and(|p| p.is_in_sand_trap());
    if trapped {
        sand_trap_roll(game, player_id, roll);
    } else {
        resolve_movement(game, player_id, roll);
    }
}

/// A trapped player escapes on doubles or once the sentence expires;
/// otherwise movement is skipped and the phase falls through to `Action`.
fn sand_trap_roll(game: &mut Game, player_id: PlayerId, roll: DiceRoll) {
    if roll.is_doubles() {
        if let Some(player) = game.player_mut(player_id) {
            player.escape_sand_trap();
        }
        game.record(GameEvent::SandTrapEscaped { player: player_id });
        resolve_movement(game, player_id, roll);
        return;
    }

    let mut served = false;
    if let Some(player) = game.player_mut(player_id) {
        player.sand_trap_turns = player.sand_trap_turns.saturating_sub(1);
        served = player.sand_trap_turns == 0;
    }
    if served {
        game.record(GameEvent::SandTrapEscaped { player: player_id });
        resolve_movement(game, player_id, roll);
    } else {
        game.turn_phase = TurnPhase::Action;
    }
}

fn resolve_movement(game: &mut Game, player_id: PlayerId, roll: DiceRoll) {
    if roll.is_doubles() {
        let mut count = 0;
        if let Some(player) = game.player_mut(player_id) {
            player.consecutive_doubles += 1;
            count = player.consecutive_doubles;
        }
        if count >= DOUBLES_TO_SAND_TRAP {
            // Third consecutive doubles: straight to the trap, turn over.
            send_to_sand_trap(game, player_id);
            advance_turn(game, player_id);
            return;
        }
    } else if let Some(player) = game.player_mut(player_id) {
        player.consecutive_doubles = 0;
    }

    let from = game.player(player_id).map_or(0, |p| p.position);
    let (to, laps) = rules::movement::advance(from, roll.total());
    if let Some(player) = game.player_mut(player_id) {
        player.position = to;
    }
    if laps > 0 {
        let salary = LAP_SALARY.times(i64::from(laps));
        if let Some(player) = game.player_mut(player_id) {
            player.credit(salary);
        }
        game.record(GameEvent::SalaryCollected {
            player: player_id,
            amount: salary,
        });
    }
    game.record(GameEvent::PlayerMoved {
        player: player_id,
        from,
        to,
        laps,
    });

    apply_landing(game, player_id, to);
    check_win(game);

    // Doubles grant an immediate re-roll unless the landing trapped the
    // roller or ended the game.
    let trapped = game
        .player(player_id)
        .is_some_and(|p| p.is_in_sand_trap());
    if game.status == GameStatus::InProgress && roll.is_doubles() && !trapped {
        game.turn_phase = TurnPhase::Roll;
    }
}

fn apply_landing(game: &mut Game, player_id: PlayerId, position: u8) {
    let board = Board::standard();
    match board.tile_at(position).kind {
        TileKind::Property(property_id) => {
            let charge = game.property_state(property_id).copied().and_then(|state| {
                let owner = state.owner?;
                if owner == player_id || state.mortgaged {
                    return None;
                }
                let def = board.property(property_id)?;
                let has_group = game.owns_complete_group(owner, def.group);
                let rent = rules::rent::rent_due(def, &state, has_group);
                rent.is_positive().then_some((rent, owner))
            });
            if let Some((rent, owner)) = charge {
                rules::settlement::settle_debt(
                    game,
                    player_id,
                    rent,
                    &DebtReason::Rent {
                        property: property_id,
                        owner,
                    },
                );
            }
            game.turn_phase = TurnPhase::Action;
        }
        TileKind::SandTrap => send_to_sand_trap(game, player_id),
        TileKind::WaterHazard => {
            rules::settlement::settle_debt(
                game,
                player_id,
                WATER_HAZARD_PENALTY,
                &DebtReason::Penalty {
                    label: "Water Hazard",
                },
            );
            game.turn_phase = TurnPhase::Action;
        }
        TileKind::ClubhouseHq | TileKind::ProShop | TileKind::MembersLounge => {
            game.turn_phase = TurnPhase::Action;
        }
    }
}

fn send_to_sand_trap(game: &mut Game, player_id: PlayerId) {
    if let Some(player) = game.player_mut(player_id) {
        player.position = SAND_TRAP_POSITION;
        player.enter_sand_trap();
        player.consecutive_doubles = 0;
    }
    game.record(GameEvent::SentToSandTrap { player: player_id });
    game.turn_phase = TurnPhase::Action;
}

/// Completion supersedes every other transition.
fn check_win(game: &mut Game) {
    if game.status != GameStatus::InProgress {
        return;
    }
    let active: Vec<PlayerId> = game.active_players().map(|p| p.id).collect();
    if let [winner] = active.as_slice() {
        game.winner = Some(*winner);
        game.status = GameStatus::Completed;
        game.record(GameEvent::GameEnded { winner: *winner });
    }
}

/// Hand the turn to the next non-bankrupt player.
///
/// Cancels any pending trade, resets the doubles chain and re-enters the
/// next player's `Roll`.
fn advance_turn(game: &mut Game, player_id: PlayerId) {
    if game.status != GameStatus::InProgress {
        return;
    }

    if let Some(offer) = game.pending_trade.take() {
        if offer.is_pending() {
            game.record(GameEvent::TradeCancelled { trade: offer.id });
        }
    }
    if let Some(player) = game.player_mut(player_id) {
        player.consecutive_doubles = 0;
    }
    game.record(GameEvent::TurnEnded {
        player: player_id,
        turn_number: game.turn_number,
    });
    game.last_roll = None;

    let active: Vec<PlayerId> = game.active_players().map(|p| p.id).collect();
    if active.is_empty() {
        return;
    }
    let current_idx = active
        .iter()
        .position(|&id| id == game.current_player)
        .unwrap_or(0);
    let next = active[(current_idx + 1) % active.len()];

    game.current_player = next;
    game.turn_phase = TurnPhase::Roll;
    game.turn_number += 1;
    game.record(GameEvent::TurnStarted {
        player: next,
        turn_number: game.turn_number,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::{GameId, PropertyId};
    use crate::core::money::Money;
    use crate::core::player::Difficulty;

    fn started_game() -> Game {
        Game::create(GameId::new(1), "Alice", Some(Difficulty::Easy), 42)
    }

    #[test]
    fn test_actions_rejected_before_start() {
        let mut game = Game::create(GameId::new(1), "Alice", None, 42);
        assert_eq!(
            apply_action(&mut game, PlayerId::new(0), &PlayerAction::RollDice),
            Err(RuleViolation::GameNotStarted)
        );
    }

    #[test]
    fn test_wrong_player_and_wrong_phase() {
        let mut game = started_game();

        assert_eq!(
            apply_action(&mut game, PlayerId::new(1), &PlayerAction::RollDice),
            Err(RuleViolation::NotYourTurn)
        );
        assert_eq!(
            apply_action(&mut game, PlayerId::new(0), &PlayerAction::EndTurn),
            Err(RuleViolation::WrongPhase(TurnPhase::Roll))
        );
    }

    #[test]
    fn test_plain_roll_moves_and_enters_action_phase() {
        let mut game = started_game();
        let alice = PlayerId::new(0);

        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();

        assert_eq!(game.player(alice).unwrap().position, 7);
        assert_eq!(game.turn_phase, TurnPhase::Action);
        assert_eq!(game.last_roll, Some(DiceRoll::of(3, 4)));
    }

    #[test]
    fn test_doubles_grant_a_re_roll() {
        let mut game = started_game();
        let alice = PlayerId::new(0);

        apply_roll(&mut game, alice, DiceRoll::of(1, 1)).unwrap();

        assert_eq!(game.turn_phase, TurnPhase::Roll);
        assert_eq!(game.player(alice).unwrap().consecutive_doubles, 1);
        assert_eq!(game.current_player, alice);
    }

    #[test]
    fn test_third_doubles_traps_and_ends_turn() {
        let mut game = started_game();
        let alice = PlayerId::new(0);

        apply_roll(&mut game, alice, DiceRoll::of(1, 1)).unwrap();
        apply_roll(&mut game, alice, DiceRoll::of(2, 2)).unwrap();
        apply_roll(&mut game, alice, DiceRoll::of(3, 3)).unwrap();

        let seat = game.player(alice).unwrap();
        assert!(seat.is_in_sand_trap());
        assert_eq!(seat.position, SAND_TRAP_POSITION);
        assert_eq!(seat.consecutive_doubles, 0);
        // Turn passed to the opponent automatically
        assert_eq!(game.current_player, PlayerId::new(1));
        assert_eq!(game.turn_phase, TurnPhase::Roll);
        assert_eq!(game.turn_number, 2);
    }

    #[test]
    fn test_sand_trap_escape_with_doubles_moves_and_re_rolls() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = SAND_TRAP_POSITION;
        game.player_mut(alice).unwrap().enter_sand_trap();

        apply_roll(&mut game, alice, DiceRoll::of(2, 2)).unwrap();

        let seat = game.player(alice).unwrap();
        assert!(!seat.is_in_sand_trap());
        assert_eq!(seat.position, 12); // 8 + 4
        // Escape roll was doubles, chain continues
        assert_eq!(game.turn_phase, TurnPhase::Roll);
    }

    #[test]
    fn test_sand_trap_failed_escape_skips_movement() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = SAND_TRAP_POSITION;
        game.player_mut(alice).unwrap().enter_sand_trap();

        apply_roll(&mut game, alice, DiceRoll::of(1, 2)).unwrap();

        let seat = game.player(alice).unwrap();
        assert!(seat.is_in_sand_trap());
        assert_eq!(seat.sand_trap_turns, 2);
        assert_eq!(seat.position, SAND_TRAP_POSITION);
        assert_eq!(game.turn_phase, TurnPhase::Action);
    }

    #[test]
    fn test_sand_trap_sentence_expiry_releases_with_movement() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = SAND_TRAP_POSITION;
        game.player_mut(alice).unwrap().sand_trap_turns = 1;

        apply_roll(&mut game, alice, DiceRoll::of(1, 2)).unwrap();

        let seat = game.player(alice).unwrap();
        assert!(!seat.is_in_sand_trap());
        assert_eq!(seat.position, 11);
        assert_eq!(game.turn_phase, TurnPhase::Action);
    }

    #[test]
    fn test_lap_salary_paid_once_per_wrap() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = 20;

        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();

        let seat = game.player(alice).unwrap();
        assert_eq!(seat.position, 3);
        assert_eq!(seat.currency, Money::from_dollars(1700));
    }

    #[test]
    fn test_landing_exactly_on_start_pays_salary() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = 14;

        apply_roll(&mut game, alice, DiceRoll::of(4, 6)).unwrap();

        let seat = game.player(alice).unwrap();
        assert_eq!(seat.position, 0);
        assert_eq!(seat.currency, Money::from_dollars(1700));
    }

    #[test]
    fn test_water_hazard_charges_penalty() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = 12;

        apply_roll(&mut game, alice, DiceRoll::of(1, 3)).unwrap();

        let seat = game.player(alice).unwrap();
        assert_eq!(seat.position, 16);
        assert_eq!(seat.currency, Money::from_dollars(1450));
    }

    #[test]
    fn test_landing_on_sand_trap_tile_traps_without_ending_turn() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().position = 5;

        apply_roll(&mut game, alice, DiceRoll::of(1, 2)).unwrap();

        let seat = game.player(alice).unwrap();
        assert!(seat.is_in_sand_trap());
        assert_eq!(game.current_player, alice);
        assert_eq!(game.turn_phase, TurnPhase::Action);
    }

    #[test]
    fn test_end_turn_hands_off_and_resets() {
        let mut game = started_game();
        let alice = PlayerId::new(0);

        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();
        apply_action(&mut game, alice, &PlayerAction::EndTurn).unwrap();

        assert_eq!(game.current_player, PlayerId::new(1));
        assert_eq!(game.turn_phase, TurnPhase::Roll);
        assert_eq!(game.turn_number, 2);
        assert_eq!(game.last_roll, None);
    }

    #[test]
    fn test_rent_flows_on_landing() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        let npc = PlayerId::new(1);

        let hole = PropertyId::new(7); // $10 base rent
        game.property_state_mut(hole).unwrap().owner = Some(npc);
        game.player_mut(npc).unwrap().owned_properties.insert(hole);

        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();

        assert_eq!(
            game.player(alice).unwrap().currency,
            Money::from_dollars(1490)
        );
        assert_eq!(
            game.player(npc).unwrap().currency,
            Money::from_dollars(1510)
        );
    }

    #[test]
    fn test_no_rent_on_own_or_mortgaged_property() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        let npc = PlayerId::new(1);

        let hole = PropertyId::new(7);
        game.property_state_mut(hole).unwrap().owner = Some(npc);
        game.property_state_mut(hole).unwrap().mortgaged = true;
        game.player_mut(npc).unwrap().owned_properties.insert(hole);

        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();

        assert_eq!(
            game.player(alice).unwrap().currency,
            Money::from_dollars(1500)
        );
    }

    #[test]
    fn test_bankrupting_rent_completes_the_game() {
        let mut game = started_game();
        let alice = PlayerId::new(0);
        let npc = PlayerId::new(1);

        let hole = PropertyId::new(7);
        game.property_state_mut(hole).unwrap().owner = Some(npc);
        game.property_state_mut(hole).unwrap().improvement =
            crate::board::ImprovementLevel::Resort;
        game.player_mut(npc).unwrap().owned_properties.insert(hole);
        game.player_mut(alice).unwrap().currency = Money::from_dollars(1);

        // Resort rent on a $10-base hole is $200; Alice cannot pay
        apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();

        assert!(game.player(alice).unwrap().bankrupt);
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.winner, Some(npc));
        assert!(game.audit_invariants().is_ok());

        // Terminal game rejects everything
        assert_eq!(
            apply_action(&mut game, npc, &PlayerAction::RollDice),
            Err(RuleViolation::GameOver)
        );
    }
}
