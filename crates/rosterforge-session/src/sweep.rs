//! Background session sweeping.
//!
//! One tokio task per registry: sweep, sleep one timeout interval, repeat.
//! Lookups already reject expired sessions, so the sweeper only bounds
//! memory held by sessions nobody presents again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::SessionRegistry;

/// Shortest pause between two sweeps, used when the timeout is zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the sweeper task. Stopping or dropping the handle aborts it.
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Aborts the sweeper. Idempotent.
    pub fn stop(&self) {
        if !self.task.is_finished() {
            self.task.abort();
            tracing::info!("session sweeper stopped");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the recurring sweep of `registry` on the current tokio runtime.
///
/// # Panics
/// Outside a tokio runtime, like `tokio::spawn`.
pub fn spawn_sweeper<U>(registry: Arc<SessionRegistry<U>>) -> SweeperHandle
where
    U: Clone + Send + Sync + 'static,
{
    let interval = registry.config().timeout().max(MIN_SWEEP_INTERVAL);
    tracing::info!(interval_secs = interval.as_secs(), "session sweeper started");

    let task = tokio::spawn(async move {
        loop {
            let removed = registry.sweep();
            tracing::trace!(removed, "sweep pass");
            tokio::time::sleep(interval).await;
        }
    });
    SweeperHandle { task }
}
