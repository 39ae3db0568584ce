//! Player seat state and NPC difficulty tiers.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};

use super::constants::{SAND_TRAP_SENTENCE_TURNS, STARTING_CURRENCY};
use super::id::{PlayerId, PropertyId};
use super::money::Money;

/// NPC difficulty tier.
///
/// Each tier is a named persona with fixed heuristic parameters; the NPC
/// policy is a pure function of `(state, difficulty)` so the tier fully
/// determines behavior for a given game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Ruthless,
}

impl Difficulty {
    /// All tiers, weakest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Ruthless,
    ];

    /// Persona name shown as the NPC's display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Casual Caddie",
            Difficulty::Medium => "Club Pro",
            Difficulty::Hard => "Tour Veteran",
            Difficulty::Ruthless => "Championship Mind",
        }
    }

    /// Chance of buying an affordable property that does not complete a group.
    #[must_use]
    pub const fn purchase_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 0.85,
            Difficulty::Ruthless => 0.95,
        }
    }

    /// Cash reserve kept as a multiple of the opponent's best rent.
    #[must_use]
    pub const fn reserve_factor(self) -> f64 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 2.0,
            Difficulty::Hard => 1.5,
            Difficulty::Ruthless => 1.0,
        }
    }

    /// Chance of spending on an eligible improvement this action.
    #[must_use]
    pub const fn improve_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Medium => 0.4,
            Difficulty::Hard => 0.6,
            Difficulty::Ruthless => 0.8,
        }
    }

    /// Incoming/outgoing value ratio required to accept a trade.
    #[must_use]
    pub const fn trade_acceptance_threshold(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Ruthless => 1.5,
        }
    }

    /// Only the top tier initiates trades of its own.
    #[must_use]
    pub const fn proposes_trades(self) -> bool {
        matches!(self, Difficulty::Ruthless)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A player's state within one game.
///
/// Mutated only by rules functions running inside a locked game
/// transaction; the owned-property set is an `im` set so cloning the whole
/// game for the commit step stays cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub currency: Money,
    /// Board position, 0-23.
    pub position: u8,
    pub owned_properties: ImHashSet<PropertyId>,
    /// `Some` for NPC seats, `None` for humans.
    pub npc: Option<Difficulty>,
    pub bankrupt: bool,
    /// Turns remaining in the sand trap; 0 means free.
    pub sand_trap_turns: u8,
    pub consecutive_doubles: u8,
}

impl Player {
    /// Create a player at the start position with the standard bankroll.
    pub fn new(id: PlayerId, display_name: impl Into<String>, npc: Option<Difficulty>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            currency: STARTING_CURRENCY,
            position: 0,
            owned_properties: ImHashSet::new(),
            npc,
            bankrupt: false,
            sand_trap_turns: 0,
            consecutive_doubles: 0,
        }
    }

    #[must_use]
    pub const fn is_npc(&self) -> bool {
        self.npc.is_some()
    }

    #[must_use]
    pub fn can_afford(&self, amount: Money) -> bool {
        self.currency >= amount
    }

    pub fn credit(&mut self, amount: Money) {
        self.currency += amount;
    }

    /// Subtract from the balance. Callers validate affordability first;
    /// the post-commit invariant audit catches any slip.
    pub fn debit(&mut self, amount: Money) {
        self.currency -= amount;
        debug_assert!(!self.currency.is_negative(), "debit overdrew {}", self.id);
    }

    #[must_use]
    pub fn owns(&self, property: PropertyId) -> bool {
        self.owned_properties.contains(&property)
    }

    #[must_use]
    pub const fn is_in_sand_trap(&self) -> bool {
        self.sand_trap_turns > 0
    }

    pub fn enter_sand_trap(&mut self) {
        self.sand_trap_turns = SAND_TRAP_SENTENCE_TURNS;
    }

    pub fn escape_sand_trap(&mut self) {
        self.sand_trap_turns = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new(PlayerId::new(0), "Alice", None);

        assert_eq!(player.currency, STARTING_CURRENCY);
        assert_eq!(player.position, 0);
        assert!(player.owned_properties.is_empty());
        assert!(!player.is_npc());
        assert!(!player.bankrupt);
        assert!(!player.is_in_sand_trap());
    }

    #[test]
    fn test_credit_debit() {
        let mut player = Player::new(PlayerId::new(0), "Alice", None);

        player.debit(Money::from_dollars(200));
        assert_eq!(player.currency, Money::from_dollars(1300));

        player.credit(Money::from_dollars(50));
        assert_eq!(player.currency, Money::from_dollars(1350));

        assert!(player.can_afford(Money::from_dollars(1350)));
        assert!(!player.can_afford(Money::from_cents(135_001)));
    }

    #[test]
    fn test_sand_trap_counters() {
        let mut player = Player::new(PlayerId::new(1), "Bob", None);

        player.enter_sand_trap();
        assert!(player.is_in_sand_trap());
        assert_eq!(player.sand_trap_turns, SAND_TRAP_SENTENCE_TURNS);

        player.escape_sand_trap();
        assert!(!player.is_in_sand_trap());
    }

    #[test]
    fn test_difficulty_monotonicity() {
        let mut last_buy = 0.0;
        let mut last_improve = 0.0;
        let mut last_threshold = 0.0;
        for tier in Difficulty::ALL {
            assert!(tier.purchase_probability() > last_buy);
            assert!(tier.improve_probability() > last_improve);
            assert!(tier.trade_acceptance_threshold() > last_threshold);
            last_buy = tier.purchase_probability();
            last_improve = tier.improve_probability();
            last_threshold = tier.trade_acceptance_threshold();
        }
        assert!(Difficulty::Ruthless.proposes_trades());
        assert!(!Difficulty::Hard.proposes_trades());
    }

    #[test]
    fn test_npc_display_names() {
        assert_eq!(Difficulty::Easy.to_string(), "Casual Caddie");
        assert_eq!(Difficulty::Ruthless.to_string(), "Championship Mind");
    }

    #[test]
    fn test_player_serialization() {
        let mut player = Player::new(PlayerId::new(1), "Club Pro", Some(Difficulty::Medium));
        player.owned_properties.insert(PropertyId::new(3));

        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
