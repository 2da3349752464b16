//! Expired session sweep.

use std::sync::Arc;

use tracing::{debug, info};

use playhub_core::result::AppResult;

use crate::store::SessionStore;

/// Runs expiry sweeps against a session store.
#[derive(Debug, Clone)]
pub struct SessionSweeper {
    /// The store to sweep.
    store: Arc<SessionStore>,
}

impl SessionSweeper {
    /// Create a new sweeper.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Run one sweep cycle, returning the number of records removed.
    pub async fn run_sweep(&self) -> AppResult<u64> {
        let count = self.store.sweep_expired().await?;

        if count > 0 {
            info!(count = count, "Sweep cycle removed expired sessions");
        } else {
            debug!("Sweep cycle found nothing to remove");
        }

        Ok(count)
    }
}
