//! Starter team configuration.

use rosterforge_protocol::PlayerType;
use serde::{Deserialize, Serialize};

/// How a freshly signed-up user's team is generated.
///
/// Operators can override any field from configuration; missing fields
/// fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamComposition {
    pub goal_keepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub attackers: usize,

    /// Youngest age a generated player can have (inclusive).
    pub min_age: u32,

    /// Oldest age a generated player can have (inclusive).
    pub max_age: u32,

    /// Asset value of every generated player.
    pub asset_value: i64,

    /// Starting balance of a generated team.
    pub balance: i64,
}

impl Default for TeamComposition {
    fn default() -> Self {
        Self {
            goal_keepers: 3,
            defenders: 6,
            midfielders: 6,
            attackers: 5,
            min_age: 18,
            max_age: 40,
            asset_value: 1_000_000,
            balance: 5_000_000,
        }
    }
}

impl TeamComposition {
    /// Number of players of `kind` in a starter team.
    pub fn count_for(&self, kind: PlayerType) -> usize {
        match kind {
            PlayerType::GoalKeeper => self.goal_keepers,
            PlayerType::Defender => self.defenders,
            PlayerType::Midfielder => self.midfielders,
            PlayerType::Attacker => self.attackers,
        }
    }

    /// Total number of players in a starter team.
    pub fn roster_size(&self) -> usize {
        PlayerType::ALL.iter().map(|k| self.count_for(*k)).sum()
    }

    /// The age range, ordered even if min and max were configured swapped.
    pub(crate) fn age_range(&self) -> std::ops::RangeInclusive<u32> {
        if self.min_age <= self.max_age {
            self.min_age..=self.max_age
        } else {
            self.max_age..=self.min_age
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_composition_default_roster_size_is_twenty() {
        let config = TeamComposition::default();
        assert_eq!(config.roster_size(), 20);
        assert_eq!(config.count_for(PlayerType::GoalKeeper), 3);
        assert_eq!(config.count_for(PlayerType::Attacker), 5);
        assert_eq!(config.balance, 5_000_000);
    }

    #[test]
    fn test_team_composition_age_range_tolerates_swapped_bounds() {
        let config = TeamComposition {
            min_age: 30,
            max_age: 20,
            ..TeamComposition::default()
        };
        assert_eq!(config.age_range(), 20..=30);
    }
}
