//! `Directory` builder and request operations.
//!
//! The directory is the entry point a transport layer calls into. It ties
//! together all the layers: session → user → team → store.
//!
//! Every operation is a plain synchronous `fn`. Store calls block the
//! caller; an async transport runs them on a blocking worker.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use rosterforge_protocol::{
    Credential, Market, PlayerId, PlayerUpdate, SessionToken, TeamId,
    TeamSnapshot, TeamUpdate, TransferOutcome, TransferRequest,
    UpdatePlayerOutcome, UpdateTeamOutcome, UserId,
};
use rosterforge_session::{
    SessionConfig, SessionRegistry, SweeperHandle, spawn_sweeper,
};
use rosterforge_store::{PlayerRecord, Store};
use rosterforge_team::{NameSequence, Team, TeamComposition};

use crate::{RosterConfig, RosterError, User};

const TEAM_NOT_DEFINED: &str = "Team for this user is not defined";
const SELLER_NOT_DEFINED: &str = "User of team to transfer from is not defined";

/// Builder for configuring a [`Directory`].
///
/// # Example
///
/// ```rust,ignore
/// let directory = Directory::builder()
///     .session_config(SessionConfig { timeout_secs: 60 })
///     .build(Arc::new(MemoryStore::new()))?;
/// directory.restore()?;
/// ```
pub struct DirectoryBuilder {
    session_config: SessionConfig,
    composition: TeamComposition,
}

impl DirectoryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            composition: TeamComposition::default(),
        }
    }

    /// Takes the session and team sections of a loaded configuration.
    pub fn config(self, config: &RosterConfig) -> Self {
        self.session_config(config.session.clone())
            .team_composition(config.team.clone())
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets how starter teams are generated at sign-up.
    pub fn team_composition(mut self, composition: TeamComposition) -> Self {
        self.composition = composition;
        self
    }

    /// Starts `store` and builds an empty directory on top of it.
    ///
    /// Call [`Directory::restore`] afterwards to load persisted users.
    pub fn build(self, store: Arc<dyn Store>) -> Result<Directory, RosterError> {
        store.start()?;
        tracing::info!(
            session_timeout_secs = self.session_config.timeout_secs,
            roster_size = self.composition.roster_size(),
            "directory built"
        );
        Ok(Directory {
            users: DashMap::new(),
            sessions: Arc::new(SessionRegistry::new(self.session_config)),
            store,
            composition: self.composition,
            names: NameSequence::new(),
            sweeper: Mutex::new(None),
        })
    }
}

impl Default for DirectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Every user, every session, and the store they persist to.
///
/// Shared across request workers behind an `Arc`.
pub struct Directory {
    users: DashMap<UserId, Arc<User>>,
    sessions: Arc<SessionRegistry<Arc<User>>>,
    store: Arc<dyn Store>,
    composition: TeamComposition,
    names: NameSequence,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl Directory {
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::new()
    }

    // -- Accounts ---------------------------------------------------------

    /// Registers a new user, gives them a starter team, and opens a
    /// session.
    ///
    /// # Errors
    /// - [`RosterError::Protocol`]: malformed id or weak password
    /// - [`RosterError::DuplicateUser`]: the id is taken
    /// - store and team creation failures
    pub fn sign_up(
        &self,
        credential: &Credential,
    ) -> Result<SessionToken, RosterError> {
        let user_id = credential.validate()?;
        let user = Arc::new(User::new(user_id.clone(), credential.password.clone()));

        match self.users.entry(user_id.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(%user_id, "sign-up rejected, user exists");
                return Err(RosterError::DuplicateUser(user_id));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(&user));
            }
        }

        if let Err(e) = user.persist(self.store.as_ref()) {
            tracing::warn!(%user_id, error = %e, "user not persisted");
            self.users.remove(&user_id);
            return Err(e);
        }

        let token = self.sessions.create(Arc::clone(&user))?;
        let team = Arc::new(Team::random(&self.composition, &self.names));
        let team_id = team.id();
        let outcome = user.create_team(team, self.store.as_ref())?;
        if let Some(error) = outcome.error {
            return Err(RosterError::TeamCreation(error));
        }

        tracing::info!(%user_id, %team_id, session = %token, "user signed up");
        Ok(token)
    }

    /// Opens a new session for an existing user. Earlier sessions stay
    /// valid.
    ///
    /// # Errors
    /// [`RosterError::InvalidCredentials`] for an unknown id or a wrong
    /// password.
    pub fn login(
        &self,
        credential: &Credential,
    ) -> Result<SessionToken, RosterError> {
        let user = UserId::parse(&credential.user_id)
            .ok()
            .and_then(|id| self.users.get(&id).map(|u| Arc::clone(u.value())))
            .filter(|u| u.credentials_match(&credential.password))
            .ok_or_else(|| {
                tracing::debug!(user_id = %credential.user_id, "login rejected");
                RosterError::InvalidCredentials
            })?;

        let token = self.sessions.create(Arc::clone(&user))?;
        tracing::info!(user_id = %user.id(), session = %token, "user logged in");
        Ok(token)
    }

    /// Resolves a session without doing anything else, and returns whose
    /// it is.
    pub fn validate_token(
        &self,
        token: &SessionToken,
    ) -> Result<UserId, RosterError> {
        Ok(self.resolve(token)?.id().clone())
    }

    // -- Teams ------------------------------------------------------------

    /// The caller's team, optionally checked against `team_id`.
    pub fn get_team(
        &self,
        token: &SessionToken,
        team_id: Option<TeamId>,
    ) -> Result<TeamSnapshot, RosterError> {
        let user = self.resolve(token)?;
        let team = user
            .team()
            .ok_or_else(|| RosterError::NoTeam(user.id().clone()))?;
        Ok(team.snapshot(team_id)?)
    }

    /// Renames or relocates the caller's team.
    ///
    /// # Errors
    /// [`RosterError::IdMismatch`] when `path_team_id` is not the id in
    /// `update`. Everything else is reported in the outcome.
    pub fn update_team(
        &self,
        token: &SessionToken,
        path_team_id: TeamId,
        update: &TeamUpdate,
    ) -> Result<UpdateTeamOutcome, RosterError> {
        let user = self.resolve(token)?;
        check_path_id(path_team_id, update.team_id)?;
        let Some(team) = user.team() else {
            return Ok(UpdateTeamOutcome::failed(update.team_id, TEAM_NOT_DEFINED));
        };
        Ok(team.update_identity(update, user.id(), self.store.as_ref()))
    }

    /// Edits a player of the caller's team, including listing it on or
    /// withdrawing it from the market.
    pub fn update_player(
        &self,
        token: &SessionToken,
        path_player_id: PlayerId,
        update: &PlayerUpdate,
    ) -> Result<UpdatePlayerOutcome, RosterError> {
        let user = self.resolve(token)?;
        check_path_id(path_player_id, update.player_id)?;
        let Some(team) = user.team() else {
            return Ok(UpdatePlayerOutcome::failed(update.player_id, TEAM_NOT_DEFINED));
        };
        Ok(team.update_player(update, self.store.as_ref()))
    }

    // -- Market -----------------------------------------------------------

    /// Listed players of every team except the caller's.
    ///
    /// Each team is read under its own lock, one after the other, so the
    /// result is not one consistent cut across teams: a transfer running
    /// meanwhile may show up in one listing and not yet in another.
    pub fn get_market(&self, token: &SessionToken) -> Result<Market, RosterError> {
        let caller = self.resolve(token)?;
        let teams: Vec<Arc<Team>> = self
            .users
            .iter()
            .filter(|entry| !Arc::ptr_eq(entry.value(), &caller))
            .filter_map(|entry| entry.value().team().cloned())
            .collect();

        let mut listings: Vec<TeamSnapshot> =
            teams.iter().filter_map(|team| team.market_listing()).collect();
        listings.sort_by_key(|t| t.team_id);
        Ok(Market { teams: listings })
    }

    /// Buys a listed player into the caller's team.
    ///
    /// Business failures (caller has no team, unknown seller team, player
    /// not listed, not enough balance, store write failures) come back as
    /// an `Ok` outcome with an error message.
    pub fn transfer(
        &self,
        token: &SessionToken,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, RosterError> {
        let buyer = self.resolve(token)?;
        let Some(buyer_team) = buyer.team() else {
            return Ok(TransferOutcome::failed(
                request.team_id,
                request.player_id,
                TEAM_NOT_DEFINED,
            ));
        };

        let Some(seller) = self.owner_of(request.team_id) else {
            return Ok(TransferOutcome::failed(
                request.team_id,
                request.player_id,
                SELLER_NOT_DEFINED,
            ));
        };
        let Some(seller_team) = seller.team() else {
            return Ok(TransferOutcome::failed(
                request.team_id,
                request.player_id,
                SELLER_NOT_DEFINED,
            ));
        };

        Ok(buyer_team.transfer_player(
            seller.id(),
            seller_team,
            buyer.id(),
            request.player_id,
            self.store.as_ref(),
        ))
    }

    // -- Lifecycle --------------------------------------------------------

    /// Loads every user, team, and player from the store.
    ///
    /// Nothing is added to the directory unless the stored data is
    /// consistent: every player belongs to a stored team, every team to a
    /// stored user, and every user has exactly one team.
    ///
    /// Returns the number of users loaded.
    pub fn restore(&self) -> Result<usize, RosterError> {
        let store = self.store.as_ref();
        let user_rows = store.load_user_records()?;
        let team_rows = store.load_team_records()?;
        let player_rows = store.load_player_records()?;

        let mut users: HashMap<UserId, Arc<User>> = HashMap::new();
        for row in &user_rows {
            let user = Arc::new(User::from_record(row));
            if users.insert(row.user_id.clone(), user).is_some() {
                return Err(RosterError::DuplicateUser(row.user_id.clone()));
            }
        }

        let mut rosters: HashMap<TeamId, Vec<PlayerRecord>> = HashMap::new();
        for row in player_rows {
            rosters.entry(row.team_id).or_default().push(row);
        }

        for row in &team_rows {
            let owner = users.get(&row.user_id).ok_or_else(|| {
                RosterError::Integrity(format!(
                    "team {} belongs to unknown user {}",
                    row.team_id, row.user_id
                ))
            })?;
            let roster = rosters.remove(&row.team_id).unwrap_or_default();
            let team = Team::from_records(row, &roster)?;
            owner.assign_team(Arc::new(team))?;
        }

        if let Some((team_id, orphans)) = rosters.iter().next() {
            return Err(RosterError::Integrity(format!(
                "{} player(s) belong to unknown team {team_id}",
                orphans.len()
            )));
        }
        if let Some(user) = users.values().find(|u| u.has_no_team()) {
            return Err(RosterError::Integrity(format!(
                "user {} has no team",
                user.id()
            )));
        }

        if let Some(existing) = users.keys().find(|id| self.users.contains_key(*id)) {
            return Err(RosterError::DuplicateUser(existing.clone()));
        }

        let count = users.len();
        for (user_id, user) in users {
            self.users.insert(user_id, user);
        }
        tracing::info!(
            users = count,
            teams = team_rows.len(),
            "directory restored"
        );
        Ok(count)
    }

    /// Starts the background session sweeper, replacing (and stopping)
    /// any earlier one.
    ///
    /// # Panics
    /// Outside a tokio runtime.
    pub fn start_sweeper(&self) {
        let handle = spawn_sweeper(Arc::clone(&self.sessions));
        if let Some(old) = self.sweeper.lock().replace(handle) {
            old.stop();
        }
    }

    /// Stops the sweeper and the store. With `drop_on_stop` the store also
    /// discards its data.
    pub fn shutdown(&self, drop_on_stop: bool) -> Result<(), RosterError> {
        if let Some(sweeper) = self.sweeper.lock().take() {
            sweeper.stop();
        }
        self.store.stop(drop_on_stop)?;
        tracing::info!(drop_on_stop, "directory shut down");
        Ok(())
    }

    // -- Introspection ----------------------------------------------------

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Registered sessions, including expired ones not yet swept.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Runs one sweep pass now and returns how many sessions it removed.
    pub fn sweep_sessions(&self) -> usize {
        self.sessions.sweep()
    }

    pub fn user(&self, user_id: &UserId) -> Option<Arc<User>> {
        self.users.get(user_id).map(|u| Arc::clone(u.value()))
    }

    // -- Helpers ----------------------------------------------------------

    fn resolve(&self, token: &SessionToken) -> Result<Arc<User>, RosterError> {
        self.sessions.lookup(token).map_err(|e| {
            tracing::debug!(session = %token, "session rejected");
            RosterError::from(e)
        })
    }

    /// Linear scan for the user owning `team_id`.
    fn owner_of(&self, team_id: TeamId) -> Option<Arc<User>> {
        self.users
            .iter()
            .find(|entry| entry.value().has_team(team_id))
            .map(|entry| Arc::clone(entry.value()))
    }
}

fn check_path_id<T>(path: T, payload: T) -> Result<(), RosterError>
where
    T: PartialEq + std::fmt::Display,
{
    if path == payload {
        Ok(())
    } else {
        Err(RosterError::IdMismatch {
            path: path.to_string(),
            payload: payload.to_string(),
        })
    }
}
