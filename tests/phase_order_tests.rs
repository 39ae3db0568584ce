//! Phase-graph conformance tests.
//!
//! Illegal-phase actions must be rejected with the committed state left
//! byte-for-byte unchanged, and legal sequences must walk the
//! Roll -> Action -> handoff graph and nothing else.

use fairway::{
    apply_action, apply_roll, DiceRoll, Difficulty, Game, GameId, Money, PlayerAction, PlayerId,
    PropertyId, RuleViolation, TradeProposal, TurnPhase,
};
use smallvec::smallvec;

fn two_human_game() -> Game {
    let mut game = Game::create(GameId::new(1), "Alice", None, 42);
    game.join("Bob").unwrap();
    game
}

fn all_actions() -> Vec<PlayerAction> {
    vec![
        PlayerAction::RollDice,
        PlayerAction::PurchaseProperty {
            property: PropertyId::new(7),
        },
        PlayerAction::ImproveProperty {
            property: PropertyId::new(7),
        },
        PlayerAction::ProposeTrade(TradeProposal {
            to: PlayerId::new(1),
            offered_properties: smallvec![],
            offered_currency: Money::from_dollars(10),
            requested_properties: smallvec![],
            requested_currency: Money::ZERO,
        }),
        PlayerAction::AcceptTrade,
        PlayerAction::RejectTrade,
        PlayerAction::EndTurn,
    ]
}

#[test]
fn rejected_actions_leave_state_untouched() {
    let mut game = two_human_game();
    let bob = PlayerId::new(1);

    // It is Alice's Roll phase: everything Bob tries must bounce, and
    // everything but RollDice must bounce for Alice too.
    let before = bincode::serialize(&game).unwrap();
    for action in all_actions() {
        assert!(
            apply_action(&mut game, bob, &action).is_err(),
            "{} should be rejected for the off-turn player",
            action.kind()
        );
        assert_eq!(
            bincode::serialize(&game).unwrap(),
            before,
            "{} rejection must not mutate state",
            action.kind()
        );
    }
    for action in all_actions() {
        if action == PlayerAction::RollDice {
            continue;
        }
        assert!(apply_action(&mut game, PlayerId::new(0), &action).is_err());
        assert_eq!(bincode::serialize(&game).unwrap(), before);
    }
}

#[test]
fn roll_is_illegal_in_action_phase() {
    let mut game = two_human_game();
    let alice = PlayerId::new(0);

    apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();
    assert_eq!(game.turn_phase, TurnPhase::Action);

    assert_eq!(
        apply_action(&mut game, alice, &PlayerAction::RollDice),
        Err(RuleViolation::WrongPhase(TurnPhase::Action))
    );
}

#[test]
fn full_turn_walks_roll_action_handoff() {
    let mut game = two_human_game();
    let alice = PlayerId::new(0);
    let bob = PlayerId::new(1);

    assert_eq!(game.turn_phase, TurnPhase::Roll);
    assert_eq!(game.current_player, alice);

    apply_roll(&mut game, alice, DiceRoll::of(2, 3)).unwrap();
    assert_eq!(game.turn_phase, TurnPhase::Action);

    apply_action(&mut game, alice, &PlayerAction::EndTurn).unwrap();
    assert_eq!(game.current_player, bob);
    assert_eq!(game.turn_phase, TurnPhase::Roll);
    assert_eq!(game.turn_number, 2);
}

#[test]
fn scenario_roll_then_purchase_landed_tile() {
    // Player A at position 0 with $1500 rolls (3,4): engine moves A to
    // tile 7, phase becomes Action; tile 7 is an unowned $120 property,
    // so the purchase succeeds and ownership plus the debit stick.
    let mut game = two_human_game();
    let alice = PlayerId::new(0);

    apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();
    assert_eq!(game.player(alice).unwrap().position, 7);
    assert_eq!(game.turn_phase, TurnPhase::Action);

    apply_action(
        &mut game,
        alice,
        &PlayerAction::PurchaseProperty {
            property: PropertyId::new(7),
        },
    )
    .unwrap();

    let seat = game.player(alice).unwrap();
    assert_eq!(seat.currency, Money::from_dollars(1380));
    assert!(game
        .property_state(PropertyId::new(7))
        .unwrap()
        .is_owned_by(alice));
}

#[test]
fn purchase_is_idempotent_safe() {
    let mut game = two_human_game();
    let alice = PlayerId::new(0);

    apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();
    let buy = PlayerAction::PurchaseProperty {
        property: PropertyId::new(7),
    };

    assert!(apply_action(&mut game, alice, &buy).is_ok());
    let after_first = bincode::serialize(&game).unwrap();

    assert_eq!(
        apply_action(&mut game, alice, &buy),
        Err(RuleViolation::PropertyAlreadyOwned)
    );
    assert_eq!(bincode::serialize(&game).unwrap(), after_first);
}

#[test]
fn triple_doubles_always_ends_in_the_sand_trap() {
    // Regardless of what the first two doubles landed on, the third
    // consecutive doubles traps the roller and hands the turn over.
    let mut game = two_human_game();
    let alice = PlayerId::new(0);

    apply_roll(&mut game, alice, DiceRoll::of(2, 2)).unwrap();
    assert_eq!(game.turn_phase, TurnPhase::Roll);
    apply_roll(&mut game, alice, DiceRoll::of(5, 5)).unwrap();
    assert_eq!(game.turn_phase, TurnPhase::Roll);
    apply_roll(&mut game, alice, DiceRoll::of(4, 4)).unwrap();

    let seat = game.player(alice).unwrap();
    assert!(seat.is_in_sand_trap());
    assert_eq!(seat.position, 8);
    assert_eq!(game.current_player, PlayerId::new(1));
    assert_eq!(game.turn_phase, TurnPhase::Roll);
}

#[test]
fn doubles_escape_keeps_the_consecutive_count() {
    let mut game = two_human_game();
    let alice = PlayerId::new(0);
    game.player_mut(alice).unwrap().position = 8;
    game.player_mut(alice).unwrap().enter_sand_trap();
    game.player_mut(alice).unwrap().consecutive_doubles = 2;

    // The escape roll is doubles number three: straight back in.
    apply_roll(&mut game, alice, DiceRoll::of(6, 6)).unwrap();

    let seat = game.player(alice).unwrap();
    assert!(seat.is_in_sand_trap());
    assert_eq!(game.current_player, PlayerId::new(1));
}

#[test]
fn completed_game_rejects_every_action() {
    let mut game = Game::create(GameId::new(2), "Alice", Some(Difficulty::Easy), 42);
    let alice = PlayerId::new(0);
    let npc = PlayerId::new(1);

    // Hand the NPC a resort and starve Alice so one rent ends the game.
    let hole = PropertyId::new(7);
    game.property_state_mut(hole).unwrap().owner = Some(npc);
    game.property_state_mut(hole).unwrap().improvement = fairway::ImprovementLevel::Resort;
    game.player_mut(npc).unwrap().owned_properties.insert(hole);
    game.player_mut(alice).unwrap().currency = Money::ZERO;

    apply_roll(&mut game, alice, DiceRoll::of(3, 4)).unwrap();
    assert_eq!(game.winner, Some(npc));

    for action in all_actions() {
        for player in [alice, npc] {
            assert_eq!(
                apply_action(&mut game, player, &action),
                Err(RuleViolation::GameOver)
            );
        }
    }
}
