//! Property improvement.

use crate::board::Board;
use crate::core::id::{PlayerId, PropertyId};
use crate::error::RuleViolation;
use crate::state::{Game, GameEvent};

/// Build the next improvement step on an owned property.
///
/// Legal iff the owner holds the whole course group, nothing in the group
/// is mortgaged, the property is below resort and the owner can afford
/// one step. Levels climb exactly one rung per call.
pub fn improve(
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

    if !state.is_owned_by(player_id) {
        return Err(RuleViolation::NotPropertyOwner);
    }
    let Some(next_level) = state.improvement.next() else {
        return Err(RuleViolation::AtMaxImprovement);
    };
    if !game.owns_complete_group(player_id, def.group) {
        return Err(RuleViolation::GroupIncomplete);
    }
    if !game.group_unmortgaged(def.group) {
        return Err(RuleViolation::GroupMortgaged);
    }

    let player = game.player(player_id).ok_or(RuleViolation::NotInGame)?;
    if !player.can_afford(def.improvement_cost) {
        return Err(RuleViolation::InsufficientFunds {
            required: def.improvement_cost,
            available: player.currency,
        });
    }

    let cost = def.improvement_cost;
    let name = def.name.to_string();
    if let Some(player) = game.player_mut(player_id) {
        player.debit(cost);
    }
    if let Some(state) = game.property_state_mut(property_id) {
        state.improvement = next_level;
    }
    game.record(GameEvent::PropertyImproved {
        player: player_id,
        property: property_id,
        name,
        level: next_level,
        cost,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CourseGroup, ImprovementLevel};
    use crate::core::id::GameId;
    use crate::core::money::Money;
    use crate::core::player::Difficulty;

    fn game_with_links_monopoly() -> Game {
        let mut game = Game::create(GameId::new(1), "Alice", Some(Difficulty::Easy), 42);
        let alice = PlayerId::new(0);
        for pos in [1u8, 2, 3] {
            let id = PropertyId::new(pos);
            game.property_state_mut(id).unwrap().owner = Some(alice);
            game.player_mut(alice).unwrap().owned_properties.insert(id);
        }
        game
    }

    #[test]
    fn test_improvement_climbs_one_step() {
        let mut game = game_with_links_monopoly();
        let alice = PlayerId::new(0);
        let id = PropertyId::new(1);

        improve(&mut game, alice, id).unwrap();

        assert_eq!(
            game.property_state(id).unwrap().improvement,
            ImprovementLevel::Level1
        );
        assert_eq!(
            game.player(alice).unwrap().currency,
            Money::from_dollars(1450)
        );

        improve(&mut game, alice, id).unwrap();
        assert_eq!(
            game.property_state(id).unwrap().improvement,
            ImprovementLevel::Level2
        );
    }

    #[test]
    fn test_resort_is_terminal() {
        let mut game = game_with_links_monopoly();
        let alice = PlayerId::new(0);
        let id = PropertyId::new(1);
        game.property_state_mut(id).unwrap().improvement = ImprovementLevel::Resort;

        assert_eq!(
            improve(&mut game, alice, id),
            Err(RuleViolation::AtMaxImprovement)
        );
    }

    #[test]
    fn test_requires_complete_group() {
        let mut game = Game::create(GameId::new(2), "Alice", Some(Difficulty::Easy), 42);
        let alice = PlayerId::new(0);
        let id = PropertyId::new(1);
        game.property_state_mut(id).unwrap().owner = Some(alice);
        game.player_mut(alice).unwrap().owned_properties.insert(id);

        assert_eq!(
            improve(&mut game, alice, id),
            Err(RuleViolation::GroupIncomplete)
        );
    }

    #[test]
    fn test_mortgage_anywhere_in_group_blocks() {
        let mut game = game_with_links_monopoly();
        let alice = PlayerId::new(0);
        game.property_state_mut(PropertyId::new(2)).unwrap().mortgaged = true;

        assert_eq!(
            improve(&mut game, alice, PropertyId::new(1)),
            Err(RuleViolation::GroupMortgaged)
        );
        assert!(game.group_unmortgaged(CourseGroup::PrairieNine));
    }

    #[test]
    fn test_requires_ownership_and_funds() {
        let mut game = game_with_links_monopoly();
        let npc = PlayerId::new(1);

        assert_eq!(
            improve(&mut game, npc, PropertyId::new(1)),
            Err(RuleViolation::NotPropertyOwner)
        );

        let alice = PlayerId::new(0);
        game.player_mut(alice).unwrap().currency = Money::from_dollars(10);
        assert_eq!(
            improve(&mut game, alice, PropertyId::new(1)),
            Err(RuleViolation::InsufficientFunds {
                required: Money::from_dollars(50),
                available: Money::from_dollars(10),
            })
        );
    }
}
