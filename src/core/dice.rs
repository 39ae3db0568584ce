//! Dice roll value object.
//!
//! Two six-sided dice. A roll is ephemeral: it lives in the current turn's
//! event log and action result, nothing else.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// A roll of two six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
}

impl DiceRoll {
    /// Roll two dice from the game's RNG.
    #[must_use]
    pub fn roll(rng: &mut GameRng) -> Self {
        let die1 = rng.gen_range(1..7) as u8;
        let die2 = rng.gen_range(1..7) as u8;
        Self { die1, die2 }
    }

    /// Build a roll from known die values (1-6 each).
    #[must_use]
    pub fn of(die1: u8, die2: u8) -> Self {
        assert!(
            (1..=6).contains(&die1) && (1..=6).contains(&die2),
            "die values must be between 1 and 6"
        );
        Self { die1, die2 }
    }

    /// Combined value of both dice.
    #[must_use]
    pub const fn total(self) -> u8 {
        self.die1 + self.die2
    }

    /// Whether both dice show the same value.
    #[must_use]
    pub const fn is_doubles(self) -> bool {
        self.die1 == self.die2
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {} = {}", self.die1, self.die2, self.total())?;
        if self.is_doubles() {
            write!(f, " (doubles)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_doubles() {
        let roll = DiceRoll::of(3, 4);
        assert_eq!(roll.total(), 7);
        assert!(!roll.is_doubles());

        let doubles = DiceRoll::of(5, 5);
        assert_eq!(doubles.total(), 10);
        assert!(doubles.is_doubles());
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = GameRng::new(42);
        for _ in 0..200 {
            let roll = DiceRoll::roll(&mut rng);
            assert!((1..=6).contains(&roll.die1));
            assert!((1..=6).contains(&roll.die2));
            assert!((2..=12).contains(&roll.total()));
        }
    }

    #[test]
    fn test_rolls_are_deterministic() {
        let mut rng1 = GameRng::new(9);
        let mut rng2 = GameRng::new(9);
        for _ in 0..20 {
            assert_eq!(DiceRoll::roll(&mut rng1), DiceRoll::roll(&mut rng2));
        }
    }

    #[test]
    #[should_panic(expected = "die values must be between 1 and 6")]
    fn test_invalid_die_value() {
        let _ = DiceRoll::of(0, 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DiceRoll::of(3, 4)), "3 + 4 = 7");
        assert_eq!(format!("{}", DiceRoll::of(2, 2)), "2 + 2 = 4 (doubles)");
    }
}
