//! In-memory storage of open costing drafts using moka
//!
//! A draft lives here while an operator creates or edits a package. Drafts
//! are never persisted: an abandoned edit simply expires, and nothing is
//! stored until the caller saves the submitted profile and totals.
//!
//! Each draft sits behind its own lock. Edits to one draft are serialized and
//! a closed draft stays closed, even for edits that were already waiting.

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::pricing::{CostingError, CostingSession};

/// Latest snapshot of one draft. `None` once the draft is closed.
type DraftSlot = Arc<Mutex<Option<Arc<CostingSession>>>>;

/// Open drafts keyed by draft id
#[derive(Clone)]
pub struct DraftCache {
    drafts: Cache<Uuid, DraftSlot>,
}

impl DraftCache {
    /// Create a draft cache sized and timed from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            drafts: Cache::builder()
                .max_capacity(config.draft_capacity)
                .time_to_live(config.draft_ttl)
                .time_to_idle(config.draft_idle)
                .build(),
        }
    }

    /// Store a freshly opened session
    pub async fn open(&self, session: CostingSession) -> Arc<CostingSession> {
        let session = Arc::new(session);
        let slot = Arc::new(Mutex::new(Some(session.clone())));
        self.drafts.insert(session.id(), slot).await;
        info!(draft_id = %session.id(), origin = ?session.origin(), "Costing draft opened");
        session
    }

    pub async fn get(&self, draft_id: Uuid) -> Result<Arc<CostingSession>, CostingError> {
        let snapshot = match self.drafts.get(&draft_id).await {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        };
        match snapshot {
            Some(session) => {
                debug!("Cache HIT for draft: {}", draft_id);
                Ok(session)
            }
            None => {
                debug!("Cache MISS for draft: {}", draft_id);
                Err(CostingError::DraftNotFound(draft_id))
            }
        }
    }

    /// Apply an edit to a draft and store the result.
    ///
    /// The draft stays locked for the whole edit. The stored snapshot is
    /// replaced wholesale; a failed edit leaves it as it was.
    pub async fn edit<T, F>(
        &self,
        draft_id: Uuid,
        f: F,
    ) -> Result<(T, Arc<CostingSession>), CostingError>
    where
        F: FnOnce(&mut CostingSession) -> Result<T, CostingError>,
    {
        let slot = self
            .drafts
            .get(&draft_id)
            .await
            .ok_or(CostingError::DraftNotFound(draft_id))?;
        let mut guard = slot.lock().await;
        let current = guard
            .as_ref()
            .ok_or(CostingError::DraftNotFound(draft_id))?;

        let mut session = (**current).clone();
        let outcome = f(&mut session)?;

        let session = Arc::new(session);
        *guard = Some(session.clone());
        Ok((outcome, session))
    }

    /// Drop a draft. Returns the latest session if it was still open.
    ///
    /// Waits for an edit in progress, so the returned snapshot includes it.
    pub async fn close(&self, draft_id: Uuid) -> Option<Arc<CostingSession>> {
        let slot = self.drafts.remove(&draft_id).await?;
        let removed = slot.lock().await.take();
        if removed.is_some() {
            info!(draft_id = %draft_id, "Costing draft closed");
        }
        removed
    }

    /// Close a draft only if `check` accepts its latest snapshot.
    ///
    /// Runs under the draft's lock, so no edit can land between the check
    /// and the close. A rejected draft stays open and unchanged.
    pub async fn close_if<T, F>(&self, draft_id: Uuid, check: F) -> Result<T, CostingError>
    where
        F: FnOnce(&CostingSession) -> Result<T, CostingError>,
    {
        let slot = self
            .drafts
            .get(&draft_id)
            .await
            .ok_or(CostingError::DraftNotFound(draft_id))?;
        let mut guard = slot.lock().await;
        let current = guard
            .as_ref()
            .ok_or(CostingError::DraftNotFound(draft_id))?;

        let outcome = check(current)?;
        guard.take();
        self.drafts.invalidate(&draft_id).await;
        info!(draft_id = %draft_id, "Costing draft closed");
        Ok(outcome)
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            open_drafts: self.drafts.entry_count(),
        }
    }
}

impl Default for DraftCache {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub open_drafts: u64,
}
