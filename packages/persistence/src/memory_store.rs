//! In-process project store.

use crate::errors::StoreError;
use crate::identity::Identity;
use crate::store::{sort_recent_first, NewProject, ProjectRecord, ProjectStore, ProjectSummary};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Projects kept in a map, with knobs for exercising failure paths
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, ProjectRecord>>>,
    save_calls: Arc<AtomicUsize>,
    failing_saves: Arc<AtomicUsize>,
    save_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every save sleeps this long (on the tokio clock) before writing
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Make the next `count` saves fail with a backend error
    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }

    /// Number of save calls received, successful or not
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Insert a row directly, bypassing ownership checks
    pub fn insert(&self, record: ProjectRecord) {
        self.write().insert(record.id.clone(), record);
    }

    /// Raw row lookup, bypassing ownership checks
    pub fn get(&self, id: &str) -> Option<ProjectRecord> {
        self.read().get(id).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, ProjectRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, ProjectRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, user: &Identity, project: NewProject) -> Result<ProjectRecord, StoreError> {
        let record = project.into_record(user, Utc::now())?;
        self.write().insert(record.id.clone(), record.clone());
        debug!(project_id = %record.id, "Created project");
        Ok(record)
    }

    async fn load(&self, user: &Identity, id: &str) -> Result<ProjectRecord, StoreError> {
        let record = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.ensure_owner(user)?;
        Ok(record)
    }

    async fn save(&self, user: &Identity, mut record: ProjectRecord) -> Result<ProjectRecord, StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.take_injected_failure() {
            return Err(StoreError::Backend("injected save failure".to_string()));
        }

        let mut records = self.write();
        if let Some(existing) = records.get(&record.id) {
            existing.ensure_owner(user)?;
            record.created_at = existing.created_at;
        }
        record.user_id = user.user_id.clone();
        record.updated_at = Utc::now();

        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list(&self, user: &Identity) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut summaries: Vec<ProjectSummary> = self
            .read()
            .values()
            .filter(|r| r.user_id == user.user_id)
            .map(ProjectRecord::summary)
            .collect();
        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, user: &Identity, id: &str) -> Result<(), StoreError> {
        let mut records = self.write();
        let record = records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.ensure_owner(user)?;
        records.remove(id);
        Ok(())
    }
}
