//! # Project Store
//!
//! Boundary to the hosted backend that keeps projects. Every call is scoped
//! to the signed-in owner; a record owned by someone else is reported as
//! [`StoreError::PermissionDenied`], the way row-level security would.
//!
//! Implementations:
//! - [`MemoryStore`](crate::MemoryStore): in-process, with failure injection
//! - [`DirectoryStore`](crate::DirectoryStore): one JSON file per project

use crate::errors::StoreError;
use crate::identity::Identity;
use async_trait::async_trait;
use bookforge_editor::{new_page_id, page_title, Page, Project, ProjectMetadata, ProjectType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row shape of a stored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_type: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub template_type: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Row for saving `project` on behalf of `owner`
    pub fn from_project(project: &Project, owner: &Identity, now: DateTime<Utc>) -> Self {
        let meta = &project.metadata;
        Self {
            id: project.id.clone(),
            user_id: owner.user_id.clone(),
            title: project.title.clone(),
            project_type: project.project_type,
            author: meta.author.clone(),
            description: meta.description.clone(),
            cover_type: meta.cover_type.clone(),
            cover_image_url: meta.cover_image_url.clone(),
            template_type: meta.template_type.clone(),
            pages: project.pages.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Editor document for this row; a project without pages gets one
    pub fn into_project(self) -> Project {
        Project {
            id: self.id,
            title: self.title,
            project_type: self.project_type,
            metadata: ProjectMetadata {
                author: self.author,
                description: self.description,
                cover_type: self.cover_type,
                cover_image_url: self.cover_image_url,
                template_type: self.template_type,
            },
            pages: self.pages,
        }
        .normalized()
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            project_type: self.project_type,
            page_count: self.pages.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn ensure_owner(&self, user: &Identity) -> Result<(), StoreError> {
        if self.user_id == user.user_id {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied(self.id.clone()))
        }
    }
}

/// Dashboard listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub project_type: ProjectType,
    pub page_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input of the "new project" flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub cover_type: Option<String>,
    #[serde(default)]
    pub template_type: Option<String>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, project_type: ProjectType) -> Self {
        Self {
            title: title.into(),
            project_type,
            ..Default::default()
        }
    }

    /// Build the initial row: trimmed title, one empty page
    pub fn into_record(self, owner: &Identity, now: DateTime<Utc>) -> Result<ProjectRecord, StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title must not be empty".to_string()));
        }

        Ok(ProjectRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner.user_id.clone(),
            title: title.to_string(),
            project_type: self.project_type,
            author: None,
            description: None,
            cover_type: self.cover_type,
            cover_image_url: None,
            template_type: self.template_type,
            pages: vec![Page::new(new_page_id(), page_title(1))],
            created_at: now,
            updated_at: now,
        })
    }
}

/// Remote persistence collaborator
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project for `user`
    async fn create(&self, user: &Identity, project: NewProject) -> Result<ProjectRecord, StoreError>;

    async fn load(&self, user: &Identity, id: &str) -> Result<ProjectRecord, StoreError>;

    /// Upsert by id. `created_at` of an existing row is kept and
    /// `updated_at` is stamped by the store.
    async fn save(&self, user: &Identity, record: ProjectRecord) -> Result<ProjectRecord, StoreError>;

    /// The user's projects, most recently updated first
    async fn list(&self, user: &Identity) -> Result<Vec<ProjectSummary>, StoreError>;

    async fn delete(&self, user: &Identity, id: &str) -> Result<(), StoreError>;
}

/// Order summaries the way the dashboard shows them
pub(crate) fn sort_recent_first(summaries: &mut [ProjectSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_requires_title() {
        let owner = Identity::new("u1");
        let result = NewProject::new("   ", ProjectType::Textbook).into_record(&owner, Utc::now());
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_new_project_record() {
        let owner = Identity::new("u1");
        let mut new = NewProject::new("  Chemistry  ", ProjectType::Workbook);
        new.cover_type = Some("science".to_string());

        let record = new.into_record(&owner, Utc::now()).unwrap();
        assert_eq!(record.title, "Chemistry");
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.pages.len(), 1);
        assert_eq!(record.pages[0].title, "Page 1");
        assert_eq!(record.cover_type.as_deref(), Some("science"));
    }

    #[test]
    fn test_record_without_pages_normalizes() {
        let owner = Identity::new("u1");
        let mut record = NewProject::new("Empty", ProjectType::Textbook)
            .into_record(&owner, Utc::now())
            .unwrap();
        record.pages.clear();

        let project = record.into_project();
        assert_eq!(project.pages.len(), 1);
    }

    #[test]
    fn test_record_round_trips_metadata() {
        let owner = Identity::new("u1");
        let mut project = Project::new("p", "Atlas", ProjectType::Textbook);
        project.metadata.author = Some("Cartographer".to_string());
        project.metadata.template_type = Some("modern".to_string());

        let record = ProjectRecord::from_project(&project, &owner, Utc::now());
        assert_eq!(record.into_project(), project);
    }

    #[test]
    fn test_record_json_uses_snake_case_columns() {
        let owner = Identity::new("u1");
        let project = Project::new("p", "Atlas", ProjectType::Workbook);
        let json = serde_json::to_value(ProjectRecord::from_project(&project, &owner, Utc::now())).unwrap();

        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["project_type"], "workbook");
        assert!(json.get("updated_at").is_some());
    }
}
