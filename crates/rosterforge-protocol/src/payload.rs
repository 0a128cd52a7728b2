//! Snapshots handed out by the team layer and request payloads handed in
//! by the routing layer.
//!
//! Snapshots are detached copies: holding one never holds a team lock, and
//! the team may have moved on by the time the caller reads it.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, PlayerType, TeamId};

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One player's attributes at the instant the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub player_type: PlayerType,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub age: u32,
    pub asset_value: i64,
    /// Zero when the player is not listed on the market.
    pub transfer_value: i64,
    /// The team the player belonged to when the snapshot was taken.
    pub team_id: TeamId,
}

impl PlayerSnapshot {
    /// Whether the player was listed for transfer.
    pub fn is_in_market(&self) -> bool {
        self.transfer_value > 0
    }
}

/// A team and (part of) its roster.
///
/// Full team retrievals carry every player sorted by [`PlayerId`];
/// market listings carry only the in-market players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_id: TeamId,
    pub name: String,
    pub country: String,
    pub balance: i64,
    pub players: Vec<PlayerSnapshot>,
}

impl TeamSnapshot {
    /// Finds a player in this snapshot by id.
    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}

/// Every other team's in-market players, as seen by one requester.
///
/// Built without cross-team locking, so a listed player may already have
/// been sold. The transfer itself re-validates everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub teams: Vec<TeamSnapshot>,
}

impl Market {
    /// Total number of listed players across all teams.
    pub fn listed_count(&self) -> usize {
        self.teams.iter().map(|t| t.players.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// New identity for a team. `team_id` must match the addressed team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub team_id: TeamId,
    pub name: String,
    pub country: String,
}

/// New editable attributes for a player. `player_id` must match the
/// addressed player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub player_id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    /// Positive lists the player on the market, zero withdraws it.
    pub transfer_value: i64,
}

/// Buy `player_id` from `team_id` into the caller's own team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub team_id: TeamId,
    pub player_id: PlayerId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(transfer_value: i64) -> PlayerSnapshot {
        PlayerSnapshot {
            player_id: PlayerId::random(),
            player_type: PlayerType::Defender,
            first_name: "firstName_1".into(),
            last_name: "lastName_1".into(),
            country: "country_1".into(),
            age: 21,
            asset_value: 1_000_000,
            transfer_value,
            team_id: TeamId::random(),
        }
    }

    #[test]
    fn test_player_snapshot_is_in_market_only_when_positive() {
        assert!(!player(0).is_in_market());
        assert!(player(1).is_in_market());
    }

    #[test]
    fn test_team_snapshot_player_lookup() {
        let p = player(0);
        let id = p.player_id;
        let team = TeamSnapshot {
            team_id: p.team_id,
            name: "name_1".into(),
            country: "country_1".into(),
            balance: 5_000_000,
            players: vec![p],
        };
        assert!(team.player(id).is_some());
        assert!(team.player(PlayerId::random()).is_none());
    }

    #[test]
    fn test_market_listed_count_sums_all_teams() {
        let team = |n: usize| TeamSnapshot {
            team_id: TeamId::random(),
            name: String::new(),
            country: String::new(),
            balance: 0,
            players: (0..n).map(|_| player(10)).collect(),
        };
        let market = Market {
            teams: vec![team(2), team(3)],
        };
        assert_eq!(market.listed_count(), 5);
        assert_eq!(Market::default().listed_count(), 0);
    }

    #[test]
    fn test_transfer_request_json_field_names() {
        let req = TransferRequest {
            team_id: TeamId::random(),
            player_id: PlayerId::random(),
        };
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["team_id"], req.team_id.to_string());
        assert_eq!(json["player_id"], req.player_id.to_string());
    }
}
