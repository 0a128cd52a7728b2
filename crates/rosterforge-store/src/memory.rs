//! In-memory [`Store`] implementation.
//!
//! Rows live in ordered maps behind one `parking_lot::Mutex`, so loads
//! come back in primary-key order. A failure plan can make writes of a
//! given record kind start failing after a number of successes, which is
//! how tests exercise mid-operation persistence failures.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use rosterforge_protocol::{PlayerId, TeamId, UserId};

use crate::{
    PlayerRecord, RecordKind, Store, StoreError, TeamRecord, UserRecord,
};

#[derive(Default)]
struct Tables {
    running: bool,
    users: BTreeMap<UserId, UserRecord>,
    teams: BTreeMap<TeamId, TeamRecord>,
    players: BTreeMap<PlayerId, PlayerRecord>,
}

/// A [`Store`] that keeps every row in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Remaining successful writes per record kind. A kind with no entry
    /// never fails.
    failure_plan: Mutex<HashMap<RecordKind, usize>>,
}

impl MemoryStore {
    /// Creates an empty, stopped store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that is already running.
    pub fn started() -> Self {
        let store = Self::new();
        store.tables.lock().running = true;
        store
    }

    /// Lets the next `successes` writes of `kind` succeed, then fails every
    /// following write of that kind until [`clear_failures`](Self::clear_failures).
    pub fn fail_after(&self, kind: RecordKind, successes: usize) {
        self.failure_plan.lock().insert(kind, successes);
    }

    /// Removes every planned failure.
    pub fn clear_failures(&self) {
        self.failure_plan.lock().clear();
    }

    pub fn is_running(&self) -> bool {
        self.tables.lock().running
    }

    pub fn user_record(&self, user_id: &UserId) -> Option<UserRecord> {
        self.tables.lock().users.get(user_id).cloned()
    }

    pub fn team_record(&self, team_id: TeamId) -> Option<TeamRecord> {
        self.tables.lock().teams.get(&team_id).cloned()
    }

    pub fn player_record(&self, player_id: PlayerId) -> Option<PlayerRecord> {
        self.tables.lock().players.get(&player_id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().users.len()
    }

    pub fn team_count(&self) -> usize {
        self.tables.lock().teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.tables.lock().players.len()
    }

    /// Consumes one unit of the failure budget for `kind`. Called with the
    /// tables lock held, after the running check.
    fn check_write(&self, kind: RecordKind) -> Result<(), StoreError> {
        let mut plan = self.failure_plan.lock();
        if let Some(remaining) = plan.get_mut(&kind) {
            if *remaining == 0 {
                tracing::warn!(%kind, "injected store failure");
                return Err(StoreError::Injected(kind));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    fn running_tables(
        &self,
    ) -> Result<parking_lot::MutexGuard<'_, Tables>, StoreError> {
        let tables = self.tables.lock();
        if !tables.running {
            return Err(StoreError::NotRunning);
        }
        Ok(tables)
    }
}

impl Store for MemoryStore {
    fn start(&self) -> Result<(), StoreError> {
        self.tables.lock().running = true;
        tracing::info!("memory store started");
        Ok(())
    }

    fn stop(&self, drop_on_stop: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.running = false;
        if drop_on_stop {
            tables.users.clear();
            tables.teams.clear();
            tables.players.clear();
        }
        tracing::info!(drop_on_stop, "memory store stopped");
        Ok(())
    }

    fn store_user_record(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut tables = self.running_tables()?;
        self.check_write(RecordKind::User)?;
        tables.users.insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    fn load_user_records(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.running_tables()?.users.values().cloned().collect())
    }

    fn store_team_record(&self, record: &TeamRecord) -> Result<(), StoreError> {
        let mut tables = self.running_tables()?;
        self.check_write(RecordKind::Team)?;
        tables.teams.insert(record.team_id, record.clone());
        Ok(())
    }

    fn load_team_records(&self) -> Result<Vec<TeamRecord>, StoreError> {
        Ok(self.running_tables()?.teams.values().cloned().collect())
    }

    fn store_player_record(
        &self,
        record: &PlayerRecord,
    ) -> Result<(), StoreError> {
        let mut tables = self.running_tables()?;
        self.check_write(RecordKind::Player)?;
        tables.players.insert(record.player_id, record.clone());
        Ok(())
    }

    fn load_player_records(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.running_tables()?.players.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            user_id: UserId::parse(&format!("{name}@soccer.com")).unwrap(),
            password: "a2TT&d3mn".into(),
        }
    }

    fn team() -> TeamRecord {
        TeamRecord {
            user_id: UserId::parse("owner@soccer.com").unwrap(),
            team_id: TeamId::random(),
            name: "name_1".into(),
            country: "country_1".into(),
            balance: 5_000_000,
        }
    }

    #[test]
    fn test_new_store_is_stopped() {
        let store = MemoryStore::new();
        assert!(!store.is_running());
        assert_eq!(
            store.store_user_record(&user("a")),
            Err(StoreError::NotRunning)
        );
    }

    #[test]
    fn test_store_user_record_upserts_by_id() {
        let store = MemoryStore::started();
        let mut record = user("a");
        store.store_user_record(&record).unwrap();
        record.password = "b3UU&e4no".into();
        store.store_user_record(&record).unwrap();

        assert_eq!(store.user_count(), 1);
        let loaded = store.user_record(&record.user_id).unwrap();
        assert_eq!(loaded.password, "b3UU&e4no");
    }

    #[test]
    fn test_fail_after_counts_successes_then_fails() {
        let store = MemoryStore::started();
        store.fail_after(RecordKind::User, 1);

        assert!(store.store_user_record(&user("a")).is_ok());
        assert_eq!(
            store.store_user_record(&user("b")),
            Err(StoreError::Injected(RecordKind::User))
        );
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_fail_after_stopped_store_keeps_budget() {
        let store = MemoryStore::new();
        store.fail_after(RecordKind::Team, 1);

        assert_eq!(
            store.store_user_record(&user("a")),
            Err(StoreError::NotRunning)
        );
        assert_eq!(
            store.store_team_record(&team()),
            Err(StoreError::NotRunning)
        );

        store.start().unwrap();
        assert!(store.store_team_record(&team()).is_ok());
        assert_eq!(
            store.store_team_record(&team()),
            Err(StoreError::Injected(RecordKind::Team))
        );
    }

    #[test]
    fn test_clear_failures_restores_writes() {
        let store = MemoryStore::started();
        store.fail_after(RecordKind::User, 0);
        assert!(store.store_user_record(&user("a")).is_err());

        store.clear_failures();
        assert!(store.store_user_record(&user("a")).is_ok());
    }

    #[test]
    fn test_user_record_debug_hides_password() {
        let printed = format!("{:?}", user("a"));
        assert!(!printed.contains("a2TT&d3mn"));
    }
}
