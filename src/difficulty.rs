//! Level-scaled game rules.
//!
//! Every rule that grows harder with the level lives here, so the generator, the hazard placer,
//! the fog and the session all read their tuning from one place.

use std::time::Duration;

/// Side length of the level one grid.
pub const BASE_GRID_SIZE: usize = 11;

/// Largest side length a grid ever reaches.
pub const MAX_GRID_SIZE: usize = 31;

/// First level that places traps on the solution path.
pub const TRAP_LEVEL: u32 = 3;

/// First level that gates the exit behind a key and a door.
pub const GATED_LEVEL: u32 = 5;

/// Traps are never placed on a cell whose coordinates add up to this value or less.
pub const SPAWN_SAFE_SUM: usize = 4;

/// Maximum number of path cells highlighted by a hint.
pub const HINT_LENGTH: usize = 15;

/// How long a hint stays on screen.
pub const HINT_DURATION: Duration = Duration::from_secs(3);

/// Difficulty tier derived from a level number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Difficulty {
    /// Level number, always at least one.
    level: u32,
}

impl Difficulty {
    /// Builds the tier for a level. Level zero is treated as level one.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self {
            level: if level == 0 { 1 } else { level },
        }
    }

    /// Returns the level number.
    #[must_use]
    pub const fn level(self) -> u32 {
        self.level
    }

    /// Returns the tier of the following level.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.level.saturating_add(1))
    }

    /// Returns the grid side length: `min(31, 11 + (level - 1) * 2)`, rounded up to an odd number.
    #[must_use]
    pub fn grid_size(self) -> usize {
        let growth = usize::try_from(self.level - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(2);
        let size = BASE_GRID_SIZE.saturating_add(growth).min(MAX_GRID_SIZE);

        size | 1
    }

    /// Returns the fog reveal radius: 5 below level 3, 4 below level 6, 3 after that.
    #[must_use]
    pub const fn reveal_radius(self) -> usize {
        if self.level < 3 {
            5
        } else if self.level < 6 {
            4
        } else {
            3
        }
    }

    /// Returns whether the spanning tree gets extra loop connections.
    #[must_use]
    pub const fn braids(self) -> bool {
        self.level > 1
    }

    /// Returns the chance that a lattice cell which is not a dead end still gets a loop.
    #[must_use]
    pub const fn braid_chance(self) -> f64 {
        if self.level > 5 {
            0.3
        } else {
            0.1
        }
    }

    /// Returns how many traps the level places: `floor(level / 2)` from level 3 on.
    #[must_use]
    pub fn trap_count(self) -> usize {
        if self.level < TRAP_LEVEL {
            0
        } else {
            usize::try_from(self.level / 2).unwrap_or(usize::MAX)
        }
    }

    /// Returns whether the exit is guarded by a key and a door.
    #[must_use]
    pub const fn is_gated(self) -> bool {
        self.level >= GATED_LEVEL
    }

    /// Returns the hint cooldown in seconds: `30 + level * 2`.
    #[must_use]
    pub const fn hint_cooldown_secs(self) -> u32 {
        self.level.saturating_mul(2).saturating_add(30)
    }

    /// Returns the experience awarded for clearing the level: `50 + level * 15`.
    #[must_use]
    pub const fn victory_xp(self) -> u32 {
        self.level.saturating_mul(15).saturating_add(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_scenarios() {
        assert_eq!(Difficulty::new(1).grid_size(), 11);
        assert_eq!(Difficulty::new(6).grid_size(), 21);
        assert_eq!(Difficulty::new(11).grid_size(), 31);
        assert_eq!(Difficulty::new(40).grid_size(), 31);
    }

    #[test]
    fn test_grid_size_is_always_odd() {
        for level in 1..=50 {
            assert_eq!(
                Difficulty::new(level).grid_size() % 2,
                1,
                "level {level} should produce an odd grid"
            );
        }
    }

    #[test]
    fn test_level_zero_is_level_one() {
        assert_eq!(Difficulty::new(0), Difficulty::new(1));
        assert_eq!(Difficulty::new(0).level(), 1);
    }

    #[test]
    fn test_reveal_radius_steps() {
        assert_eq!(Difficulty::new(1).reveal_radius(), 5);
        assert_eq!(Difficulty::new(2).reveal_radius(), 5);
        assert_eq!(Difficulty::new(3).reveal_radius(), 4);
        assert_eq!(Difficulty::new(5).reveal_radius(), 4);
        assert_eq!(Difficulty::new(6).reveal_radius(), 3);
    }

    #[test]
    fn test_hazard_tiers() {
        assert_eq!(Difficulty::new(2).trap_count(), 0);
        assert_eq!(Difficulty::new(3).trap_count(), 1);
        assert_eq!(Difficulty::new(6).trap_count(), 3);
        assert!(!Difficulty::new(4).is_gated(), "level 4 should not be gated");
        assert!(Difficulty::new(5).is_gated(), "level 5 should be gated");
        assert!(!Difficulty::new(1).braids(), "level 1 should be a perfect maze");
        assert!(Difficulty::new(2).braids(), "level 2 should braid");
    }

    #[test]
    fn test_rewards_and_cooldowns() {
        assert_eq!(Difficulty::new(3).victory_xp(), 95);
        assert_eq!(Difficulty::new(1).hint_cooldown_secs(), 32);
        assert_eq!(Difficulty::new(10).hint_cooldown_secs(), 50);
        assert_eq!(Difficulty::new(3).next().level(), 4);
    }
}
