//! Supervised background tasks
//!
//! Cache population after a miss runs here instead of on the request's own
//! task, so it completes even when the caller is cancelled or times out.

use crate::utils::error::Result;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Pool of detached tasks whose failures are logged, never propagated
#[derive(Debug, Clone, Default)]
pub struct BackgroundTasks {
    set: Arc<Mutex<JoinSet<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task; an error it returns is logged at `warn`
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let mut set = self.set.lock();
        while let Some(finished) = set.try_join_next() {
            if let Err(e) = finished {
                warn!("Background task panicked: {}", e);
            }
        }
        set.spawn(async move {
            match task.await {
                Ok(()) => debug!("Background task {} finished", name),
                Err(e) => warn!("Background task {} failed: {}", name, e),
            }
        });
    }

    /// Number of tasks not yet reaped
    pub fn len(&self) -> usize {
        self.set.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every task spawned so far
    pub async fn drain(&self) {
        let mut set = std::mem::take(&mut *self.set.lock());
        while let Some(finished) = set.join_next().await {
            if let Err(e) = finished {
                warn!("Background task panicked: {}", e);
            }
        }
    }
}
