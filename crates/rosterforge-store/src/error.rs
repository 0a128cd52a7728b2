use crate::RecordKind;

/// Errors that can occur in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store was used before `start()` or after `stop()`.
    #[error("store is not running")]
    NotRunning,

    /// The backend rejected or failed the call.
    #[error("store backend failed: {0}")]
    Backend(String),

    /// A write failed on purpose (in-memory store failure plan).
    #[error("injected failure writing {0} record")]
    Injected(RecordKind),
}
