//! Business outcomes.
//!
//! An outcome is a *successful* protocol result that may still report a
//! failed business operation through its `error` field. Callers have to
//! inspect `error` (or [`is_ok`](TransferOutcome::is_ok)) rather than rely
//! on the call returning `Ok`.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, TeamId};

/// Result of attaching a team to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTeamOutcome {
    pub team_id: TeamId,
    pub error: Option<String>,
}

impl CreateTeamOutcome {
    pub fn ok(team_id: TeamId) -> Self {
        Self { team_id, error: None }
    }

    pub fn failed(team_id: TeamId, error: impl Into<String>) -> Self {
        Self {
            team_id,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of renaming or relocating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTeamOutcome {
    pub team_id: TeamId,
    pub error: Option<String>,
}

impl UpdateTeamOutcome {
    pub fn ok(team_id: TeamId) -> Self {
        Self { team_id, error: None }
    }

    pub fn failed(team_id: TeamId, error: impl Into<String>) -> Self {
        Self {
            team_id,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of editing a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlayerOutcome {
    pub player_id: PlayerId,
    pub error: Option<String>,
}

impl UpdatePlayerOutcome {
    pub fn ok(player_id: PlayerId) -> Self {
        Self {
            player_id,
            error: None,
        }
    }

    pub fn failed(player_id: PlayerId, error: impl Into<String>) -> Self {
        Self {
            player_id,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a transfer.
///
/// On success `team_id` is the buying team (the player's new home). On
/// failure it is the team the player was to be bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub error: Option<String>,
}

impl TransferOutcome {
    pub fn ok(team_id: TeamId, player_id: PlayerId) -> Self {
        Self {
            team_id,
            player_id,
            error: None,
        }
    }

    pub fn failed(
        team_id: TeamId,
        player_id: PlayerId,
        error: impl Into<String>,
    ) -> Self {
        Self {
            team_id,
            player_id,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_outcome_ok_has_no_error() {
        let outcome = TransferOutcome::ok(TeamId::random(), PlayerId::random());
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_transfer_outcome_failed_carries_message() {
        let outcome = TransferOutcome::failed(
            TeamId::random(),
            PlayerId::random(),
            "Balance is not enough",
        );
        assert!(!outcome.is_ok());
        assert_eq!(outcome.error.as_deref(), Some("Balance is not enough"));
    }

    #[test]
    fn test_update_player_outcome_serializes_null_error() {
        let outcome = UpdatePlayerOutcome::ok(PlayerId::random());
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_update_team_outcome_failed_keeps_team_id() {
        let id = TeamId::random();
        let outcome = UpdateTeamOutcome::failed(id, "TeamId does not match");
        assert_eq!(outcome.team_id, id);
        assert!(!outcome.is_ok());
    }
}
