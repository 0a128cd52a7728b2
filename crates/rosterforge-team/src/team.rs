//! A team: identity, balance, and roster behind one lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};
use rosterforge_protocol::{
    PlayerId, PlayerSnapshot, PlayerType, PlayerUpdate, TeamId, TeamSnapshot,
    TeamUpdate, UpdatePlayerOutcome, UpdateTeamOutcome, UserId,
};
use rosterforge_store::{PlayerRecord, Store, TeamRecord};

use crate::{Player, TeamComposition, TeamError};

pub(crate) const TEAM_ID_MISMATCH: &str = "TeamId does not match";
pub(crate) const PLAYER_NOT_FOUND: &str = "Player does not exist";
pub(crate) const TEAM_PERSIST_FAILED: &str = "Persist of team in store failed";
pub(crate) const PLAYER_PERSIST_FAILED: &str =
    "Persist of player in store failed";

/// Numbering for generated names: `name_<n>` for teams, `firstName_<n>`
/// for players. Each directory owns one, so separate directories never
/// share a counter.
#[derive(Debug)]
pub struct NameSequence {
    teams: AtomicU64,
    players: AtomicU64,
}

impl NameSequence {
    pub fn new() -> Self {
        Self {
            teams: AtomicU64::new(1),
            players: AtomicU64::new(1),
        }
    }

    fn next_team(&self) -> u64 {
        self.teams.fetch_add(1, Ordering::Relaxed)
    }

    fn next_player(&self) -> u64 {
        self.players.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for NameSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything about a team that can change. Only reachable through
/// [`Team::lock`].
#[derive(Debug, Clone)]
pub(crate) struct TeamInner {
    pub(crate) name: String,
    pub(crate) country: String,
    pub(crate) balance: i64,
    pub(crate) roster: BTreeMap<PlayerId, Player>,
}

impl TeamInner {
    pub(crate) fn to_record(&self, id: TeamId, owner: &UserId) -> TeamRecord {
        TeamRecord {
            user_id: owner.clone(),
            team_id: id,
            name: self.name.clone(),
            country: self.country.clone(),
            balance: self.balance,
        }
    }
}

/// A team and its roster.
///
/// The id never changes. Every other field lives behind a
/// `parking_lot::Mutex`; each method takes the lock once and releases it
/// on every exit path when the guard drops.
#[derive(Debug)]
pub struct Team {
    id: TeamId,
    inner: Mutex<TeamInner>,
}

impl Team {
    /// Builds a team from its parts.
    ///
    /// # Errors
    /// [`TeamError::DuplicatePlayer`] if two players share an id.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        country: impl Into<String>,
        balance: i64,
        players: impl IntoIterator<Item = Player>,
    ) -> Result<Self, TeamError> {
        let mut roster = BTreeMap::new();
        for player in players {
            let player_id = player.id();
            if roster.insert(player_id, player).is_some() {
                return Err(TeamError::DuplicatePlayer(player_id));
            }
        }
        Ok(Self {
            id,
            inner: Mutex::new(TeamInner {
                name: name.into(),
                country: country.into(),
                balance,
                roster,
            }),
        })
    }

    /// Rebuilds a team from its stored row and the rows of its players.
    pub fn from_records<'a>(
        record: &TeamRecord,
        players: impl IntoIterator<Item = &'a PlayerRecord>,
    ) -> Result<Self, TeamError> {
        Self::new(
            record.team_id,
            record.name.clone(),
            record.country.clone(),
            record.balance,
            players.into_iter().map(Player::from_record),
        )
    }

    /// Generates a starter team for a new user, numbered from `names`.
    pub fn random(composition: &TeamComposition, names: &NameSequence) -> Self {
        let index = names.next_team();
        let mut roster = BTreeMap::new();
        for kind in PlayerType::ALL {
            for _ in 0..composition.count_for(kind) {
                let n = names.next_player();
                let player = Player::random(kind, n, composition);
                roster.insert(player.id(), player);
            }
        }
        Self {
            id: TeamId::random(),
            inner: Mutex::new(TeamInner {
                name: format!("name_{index}"),
                country: format!("country_{index}"),
                balance: composition.balance,
                roster,
            }),
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn balance(&self) -> i64 {
        self.lock().balance
    }

    pub fn roster_len(&self) -> usize {
        self.lock().roster.len()
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.lock().roster.contains_key(&player_id)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, TeamInner> {
        self.inner.lock()
    }

    #[cfg(test)]
    pub(crate) fn inner_is_unlocked(&self) -> bool {
        !self.inner.is_locked()
    }

    /// Writes the team row and, with `include_roster`, every player row.
    ///
    /// Stops at the first failed write. Rows written before it stay
    /// written.
    pub fn persist(
        &self,
        include_roster: bool,
        owner: &UserId,
        store: &dyn Store,
    ) -> Result<(), TeamError> {
        let inner = self.lock();
        store.store_team_record(&inner.to_record(self.id, owner))?;
        if include_roster {
            for player in inner.roster.values() {
                store.store_player_record(&player.to_record(self.id))?;
            }
        }
        tracing::debug!(
            team_id = %self.id,
            %owner,
            include_roster,
            "team persisted"
        );
        Ok(())
    }

    /// Copy of the whole team, roster sorted by player id.
    ///
    /// # Errors
    /// [`TeamError::TeamMismatch`] when `filter` names another team.
    pub fn snapshot(
        &self,
        filter: Option<TeamId>,
    ) -> Result<TeamSnapshot, TeamError> {
        self.check_id(filter)?;
        let inner = self.lock();
        Ok(self.build_snapshot(&inner, |_| true))
    }

    /// Renames or relocates the team.
    ///
    /// The new row is written before the change becomes visible, so a
    /// failed write leaves the team as it was.
    pub fn update_identity(
        &self,
        update: &TeamUpdate,
        owner: &UserId,
        store: &dyn Store,
    ) -> UpdateTeamOutcome {
        if update.team_id != self.id {
            return UpdateTeamOutcome::failed(update.team_id, TEAM_ID_MISMATCH);
        }

        let mut inner = self.lock();
        let mut record = inner.to_record(self.id, owner);
        record.name.clone_from(&update.name);
        record.country.clone_from(&update.country);
        if let Err(e) = store.store_team_record(&record) {
            tracing::warn!(team_id = %self.id, error = %e, "team update not persisted");
            return UpdateTeamOutcome::failed(self.id, TEAM_PERSIST_FAILED);
        }

        inner.name = record.name;
        inner.country = record.country;
        tracing::info!(team_id = %self.id, "team updated");
        UpdateTeamOutcome::ok(self.id)
    }

    /// Edits one player of the roster.
    ///
    /// The edit is applied to a copy, persisted, and only then swapped
    /// into the roster.
    pub fn update_player(
        &self,
        update: &PlayerUpdate,
        store: &dyn Store,
    ) -> UpdatePlayerOutcome {
        let player_id = update.player_id;
        let mut inner = self.lock();
        let Some(current) = inner.roster.get(&player_id) else {
            return UpdatePlayerOutcome::failed(player_id, PLAYER_NOT_FOUND);
        };

        let mut edited = current.clone();
        if let Err(e) = edited.update_attributes(update) {
            return UpdatePlayerOutcome::failed(player_id, e.to_string());
        }
        if let Err(e) = store.store_player_record(&edited.to_record(self.id)) {
            tracing::warn!(%player_id, error = %e, "player update not persisted");
            return UpdatePlayerOutcome::failed(player_id, PLAYER_PERSIST_FAILED);
        }

        let listed = edited.is_in_market();
        inner.roster.insert(player_id, edited);
        tracing::info!(team_id = %self.id, %player_id, listed, "player updated");
        UpdatePlayerOutcome::ok(player_id)
    }

    /// The players this team has on the market, or `None` if there are
    /// none.
    pub fn market_listing(&self) -> Option<TeamSnapshot> {
        let inner = self.lock();
        let listing = self.build_snapshot(&inner, Player::is_in_market);
        if listing.players.is_empty() {
            None
        } else {
            Some(listing)
        }
    }

    fn check_id(&self, requested: Option<TeamId>) -> Result<(), TeamError> {
        match requested {
            Some(requested) if requested != self.id => {
                Err(TeamError::TeamMismatch {
                    requested,
                    actual: self.id,
                })
            }
            _ => Ok(()),
        }
    }

    fn build_snapshot(
        &self,
        inner: &TeamInner,
        keep: impl Fn(&Player) -> bool,
    ) -> TeamSnapshot {
        let players: Vec<PlayerSnapshot> = inner
            .roster
            .values()
            .filter(|p| keep(*p))
            .map(|p| p.snapshot(self.id))
            .collect();
        TeamSnapshot {
            team_id: self.id,
            name: inner.name.clone(),
            country: inner.country.clone(),
            balance: inner.balance,
            players,
        }
    }
}
