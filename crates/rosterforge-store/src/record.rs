//! Plain rows exchanged with the store.

use std::fmt;

use rosterforge_protocol::{PlayerId, PlayerType, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// Which table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Team,
    Player,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Team => "team",
            Self::Player => "player",
        };
        f.write_str(name)
    }
}

/// A user row. Primary key: `user_id`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub password: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// A team row. Primary key: `team_id`. `user_id` is the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub user_id: UserId,
    pub team_id: TeamId,
    pub name: String,
    pub country: String,
    pub balance: i64,
}

/// A player row. Primary key: `player_id`. `team_id` is the current team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub player_type: PlayerType,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub age: u32,
    pub asset_value: i64,
    pub transfer_value: i64,
    pub team_id: TeamId,
}
