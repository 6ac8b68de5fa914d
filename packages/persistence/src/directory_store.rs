//! Project store backed by a directory of JSON files.
//!
//! Each project lives in `<root>/<id>.json`. Ids are restricted to
//! `[A-Za-z0-9_-]` so a record can never address a path outside the root.

use crate::errors::StoreError;
use crate::identity::Identity;
use crate::store::{sort_recent_first, NewProject, ProjectRecord, ProjectStore, ProjectSummary};
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Validation(format!("invalid project id: {}", id)));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    async fn read_record(&self, id: &str) -> Result<ProjectRecord, StoreError> {
        let path = self.path_for(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_record(&self, record: &ProjectRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id)?;
        tokio::fs::create_dir_all(&self.root).await?;

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(project_id = %record.id, path = %path.display(), "Wrote project");
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for DirectoryStore {
    async fn create(&self, user: &Identity, project: NewProject) -> Result<ProjectRecord, StoreError> {
        let record = project.into_record(user, Utc::now())?;
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn load(&self, user: &Identity, id: &str) -> Result<ProjectRecord, StoreError> {
        let record = self.read_record(id).await?;
        record.ensure_owner(user)?;
        Ok(record)
    }

    async fn save(&self, user: &Identity, mut record: ProjectRecord) -> Result<ProjectRecord, StoreError> {
        match self.read_record(&record.id).await {
            Ok(existing) => {
                existing.ensure_owner(user)?;
                record.created_at = existing.created_at;
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        record.user_id = user.user_id.clone();
        record.updated_at = Utc::now();
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn list(&self, user: &Identity) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<ProjectRecord>(&bytes) {
                Ok(record) if record.user_id == user.user_id => summaries.push(record.summary()),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable project file"),
            }
        }

        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, user: &Identity, id: &str) -> Result<(), StoreError> {
        let record = self.read_record(id).await?;
        record.ensure_owner(user)?;
        tokio::fs::remove_file(self.path_for(id)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookforge_editor::ProjectType;

    #[tokio::test]
    async fn test_round_trip_through_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirectoryStore::new(dir.path().join("projects"));
        let owner = Identity::new("u1");

        assert!(store.list(&owner).await?.is_empty());

        let created = store
            .create(&owner, NewProject::new("Poetry", ProjectType::Workbook))
            .await?;
        assert!(dir.path().join("projects").join(format!("{}.json", created.id)).exists());

        let mut edited = created.clone();
        edited.title = "Poetry II".to_string();
        store.save(&owner, edited).await?;

        let loaded = store.load(&owner, &created.id).await?;
        assert_eq!(loaded.title, "Poetry II");
        assert_eq!(loaded.created_at, created.created_at);

        let listed = store.list(&owner).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Poetry II");

        store.delete(&owner, &created.id).await?;
        assert!(matches!(
            store.load(&owner, &created.id).await,
            Err(StoreError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_other_owner_is_denied() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirectoryStore::new(dir.path());
        let created = store
            .create(&Identity::new("u1"), NewProject::new("Mine", ProjectType::Textbook))
            .await?;

        let stranger = Identity::new("u2");
        assert!(matches!(
            store.load(&stranger, &created.id).await,
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(store.list(&stranger).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        let owner = Identity::new("u1");

        assert!(matches!(
            store.load(&owner, "../escape").await,
            Err(StoreError::Validation(_))
        ));
    }
}
