//! Storage abstraction for Rosterforge.
//!
//! Provides the [`Store`] trait the domain layer persists through, plus the
//! plain record types that cross it. A relational adapter lives outside
//! this workspace; the in-memory [`MemoryStore`] backs tests and demos.
//!
//! # Contract
//!
//! Every call is synchronous and all-or-nothing. `store_*` calls are
//! upserts keyed by the record's primary id. The domain layer never
//! retries a failed call; it aborts the enclosing operation instead.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-memory store guarded by `parking_lot` mutexes

mod error;
#[cfg(feature = "memory")]
mod memory;
mod record;

pub use error::StoreError;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use record::{PlayerRecord, RecordKind, TeamRecord, UserRecord};

/// The storage collaborator the domain layer writes through.
///
/// `Send + Sync` because a single store is shared by every worker that
/// runs a request; implementations synchronize internally.
pub trait Store: Send + Sync + 'static {
    /// Prepares the backing storage (creates it if needed).
    fn start(&self) -> Result<(), StoreError>;

    /// Releases the backing storage. With `drop_on_stop` the stored data
    /// is discarded as well.
    fn stop(&self, drop_on_stop: bool) -> Result<(), StoreError>;

    /// Inserts or updates a user row.
    fn store_user_record(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Loads every user row.
    fn load_user_records(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Inserts or updates a team row.
    fn store_team_record(&self, record: &TeamRecord) -> Result<(), StoreError>;

    /// Loads every team row.
    fn load_team_records(&self) -> Result<Vec<TeamRecord>, StoreError>;

    /// Inserts or updates a player row.
    fn store_player_record(
        &self,
        record: &PlayerRecord,
    ) -> Result<(), StoreError>;

    /// Loads every player row.
    fn load_player_records(&self) -> Result<Vec<PlayerRecord>, StoreError>;
}
