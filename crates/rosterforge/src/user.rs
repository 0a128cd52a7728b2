//! A registered user and their (at most one) team.

use std::fmt;
use std::sync::{Arc, OnceLock};

use rosterforge_protocol::{CreateTeamOutcome, TeamId, UserId};
use rosterforge_store::{Store, UserRecord};
use rosterforge_team::Team;

use crate::RosterError;

const TEAM_PERSIST_FAILED: &str = "Persist of team in store failed";

/// A user account.
///
/// The team slot is set at most once and never cleared, so a reference
/// obtained from [`team`](Self::team) stays valid for the user's lifetime
/// without any lock.
pub struct User {
    id: UserId,
    password: String,
    team: OnceLock<Arc<Team>>,
}

impl User {
    pub fn new(id: UserId, password: impl Into<String>) -> Self {
        Self {
            id,
            password: password.into(),
            team: OnceLock::new(),
        }
    }

    pub fn from_record(record: &UserRecord) -> Self {
        Self::new(record.user_id.clone(), record.password.clone())
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Compares `candidate` with the stored password.
    ///
    /// Visits every byte of the longer input whether or not an earlier
    /// byte differs.
    pub fn credentials_match(&self, candidate: &str) -> bool {
        let stored = self.password.as_bytes();
        let given = candidate.as_bytes();
        let mut diff = stored.len() ^ given.len();
        for i in 0..stored.len().max(given.len()) {
            let a = stored.get(i).copied().unwrap_or(0);
            let b = given.get(i).copied().unwrap_or(0);
            diff |= usize::from(a ^ b);
        }
        diff == 0
    }

    /// Gives this user their team.
    ///
    /// # Errors
    /// [`RosterError::TeamAlreadyAssigned`] if a team is already set,
    /// including when another thread won a race to set it.
    pub fn assign_team(&self, team: Arc<Team>) -> Result<(), RosterError> {
        let team_id = team.id();
        self.team
            .set(team)
            .map_err(|_| RosterError::TeamAlreadyAssigned(self.id.clone()))?;
        tracing::debug!(user_id = %self.id, %team_id, "team assigned");
        Ok(())
    }

    pub fn team(&self) -> Option<&Arc<Team>> {
        self.team.get()
    }

    /// Whether this user owns the team `team_id`.
    pub fn has_team(&self, team_id: TeamId) -> bool {
        self.team().is_some_and(|t| t.id() == team_id)
    }

    pub fn has_no_team(&self) -> bool {
        self.team.get().is_none()
    }

    /// Assigns `team` and writes it with its whole roster.
    ///
    /// # Errors
    /// Assignment conflicts abort with [`RosterError::TeamAlreadyAssigned`].
    /// A failed write is reported in the outcome; the team stays assigned.
    pub fn create_team(
        &self,
        team: Arc<Team>,
        store: &dyn Store,
    ) -> Result<CreateTeamOutcome, RosterError> {
        let team_id = team.id();
        self.assign_team(Arc::clone(&team))?;
        if let Err(e) = team.persist(true, &self.id, store) {
            tracing::warn!(user_id = %self.id, %team_id, error = %e, "team not persisted");
            return Ok(CreateTeamOutcome::failed(team_id, TEAM_PERSIST_FAILED));
        }
        Ok(CreateTeamOutcome::ok(team_id))
    }

    /// Writes the user row.
    pub fn persist(&self, store: &dyn Store) -> Result<(), RosterError> {
        store.store_user_record(&self.to_record())?;
        Ok(())
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            user_id: self.id.clone(),
            password: self.password.clone(),
        }
    }
}

/// Keeps the password out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("team", &self.team().map(|t| t.id()))
            .finish_non_exhaustive()
    }
}
