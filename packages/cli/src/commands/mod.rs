pub mod delete;
pub mod edit;
pub mod list;
pub mod new;
pub mod show;

pub use delete::{delete, DeleteArgs};
pub use edit::{edit, EditArgs};
pub use list::list;
pub use new::{new, NewArgs};
pub use show::{show, ShowArgs};

use crate::config::BookforgeConfig;
use anyhow::{anyhow, Result};
use bookforge_persistence::{
    AutosaveConfig, DirectoryStore, EditorController, Identity, SessionProvider, StaticSession,
    SystemClock,
};
use std::path::Path;
use std::sync::Arc;

/// Shared state of one CLI invocation
#[derive(Debug)]
pub struct Context {
    pub autosave: AutosaveConfig,
    pub store: Arc<DirectoryStore>,
    pub session: Arc<StaticSession>,
}

impl Context {
    pub fn new(config: &BookforgeConfig, cwd: &Path, user: Option<String>) -> Self {
        let session = match user {
            Some(user) => StaticSession::signed_in(user),
            None => StaticSession::anonymous(),
        };

        Self {
            autosave: config.autosave(),
            store: Arc::new(DirectoryStore::new(config.data_dir(cwd))),
            session: Arc::new(session),
        }
    }

    /// The acting user, required by every store operation
    pub fn identity(&self) -> Result<Identity> {
        self.session
            .current_user()
            .ok_or_else(|| anyhow!("No user given; pass --user or set BOOKFORGE_USER"))
    }

    pub fn controller(&self) -> EditorController<DirectoryStore> {
        EditorController::new(
            Arc::clone(&self.store),
            self.session.clone(),
            Arc::new(SystemClock),
            self.autosave,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookforge_editor::ProjectType;
    use bookforge_persistence::ProjectStore;

    fn context(dir: &Path, user: Option<&str>) -> Context {
        Context::new(&BookforgeConfig::default(), dir, user.map(str::to_string))
    }

    #[test]
    fn test_missing_user_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = context(dir.path(), None).identity().unwrap_err();
        assert!(err.to_string().contains("BOOKFORGE_USER"));
    }

    #[tokio::test]
    async fn test_new_edit_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Some("author"));

        new(
            NewArgs {
                title: "Ocean Life".to_string(),
                project_type: ProjectType::Workbook,
                cover: Some("science".to_string()),
                template: None,
            },
            &ctx,
        )
        .await
        .unwrap();

        let user = ctx.identity().unwrap();
        let projects = ctx.store.list(&user).await.unwrap();
        assert_eq!(projects.len(), 1);
        let id = projects[0].id.clone();

        let script_path = dir.path().join("script.json");
        std::fs::write(
            &script_path,
            r#"[
                { "command": "addPage" },
                { "command": "addComponent", "kind": "image" },
                { "command": "updateProject", "patch": { "author": "Marine Lab" } }
            ]"#,
        )
        .unwrap();
        edit(
            EditArgs {
                id: id.clone(),
                script: script_path,
            },
            &ctx,
        )
        .await
        .unwrap();

        let project = ctx.store.load(&user, &id).await.unwrap().into_project();
        assert_eq!(project.pages.len(), 2);
        assert_eq!(project.pages[1].components.len(), 1);
        assert_eq!(project.metadata.author.as_deref(), Some("Marine Lab"));
        assert_eq!(project.metadata.cover_type.as_deref(), Some("science"));

        show(ShowArgs { id: id.clone(), json: false }, &ctx).await.unwrap();

        delete(DeleteArgs { id: id.clone() }, &ctx).await.unwrap();
        assert!(ctx.store.list(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_project_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let owner = context(dir.path(), Some("owner"));
        new(
            NewArgs {
                title: "Private".to_string(),
                project_type: ProjectType::Textbook,
                cover: None,
                template: None,
            },
            &owner,
        )
        .await
        .unwrap();
        let id = owner.store.list(&owner.identity().unwrap()).await.unwrap()[0]
            .id
            .clone();

        let intruder = context(dir.path(), Some("intruder"));
        assert!(show(ShowArgs { id: id.clone(), json: true }, &intruder).await.is_err());
        assert!(delete(DeleteArgs { id }, &intruder).await.is_err());
    }
}
