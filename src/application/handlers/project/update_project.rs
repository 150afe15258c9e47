//! UpdateProjectHandler - Command handler for partial project updates.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{ProjectId, Timestamp, UserId};
use crate::domain::project::{MemberRole, Project, ProjectError, ProjectPatch, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to update project name, description, status, or settings.
#[derive(Debug, Clone)]
pub struct UpdateProjectCommand {
    pub user: UserId,
    pub project_id: ProjectId,
    pub patch: ProjectPatch,
}

/// Handler for updating projects. Admin only.
pub struct UpdateProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl UpdateProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateProjectCommand) -> Result<Project, ProjectError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut project = self
                .repository
                .find_by_id(&cmd.project_id)
                .await
                .map_err(ProjectError::from)?
                .filter(|p| p.status != ProjectStatus::Deleted)
                .ok_or(ProjectError::NotFound(cmd.project_id))?;

            if !project.has_permission(&cmd.user, MemberRole::Admin) {
                return Err(ProjectError::permission_denied(MemberRole::Admin));
            }

            let expected_version = project.version;
            project.apply_update(cmd.patch.clone(), Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => {
                    project.version = expected_version + 1;
                    return Ok(project);
                }
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "project update lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::project::test_support::{
        test_project, test_user, InMemoryProjectRepository,
    };

    fn rename_patch(name: &str) -> ProjectPatch {
        ProjectPatch {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn admin_can_rename_project() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = UpdateProjectHandler::new(repo.clone());

        let updated = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-creator"),
                project_id: id,
                patch: rename_patch("Renamed"),
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.version, 2);
        assert_eq!(repo.get(&id).unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn non_admin_cannot_update() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = UpdateProjectHandler::new(repo);

        let result = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-stranger"),
                project_id: id,
                patch: rename_patch("Hijacked"),
            })
            .await;
        assert_eq!(
            result,
            Err(ProjectError::permission_denied(MemberRole::Admin))
        );
    }

    #[tokio::test]
    async fn archives_via_status_patch() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = UpdateProjectHandler::new(repo.clone());

        let updated = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-creator"),
                project_id: id,
                patch: ProjectPatch {
                    status: Some(ProjectStatus::Archived),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Archived);
    }

    #[tokio::test]
    async fn retries_after_version_conflict() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        repo.inject_conflicts(1);
        let handler = UpdateProjectHandler::new(repo.clone());

        let updated = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-creator"),
                project_id: id,
                patch: rename_patch("Renamed"),
            })
            .await;
        assert!(updated.is_ok());
        assert_eq!(repo.get(&id).unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn surfaces_conflict_after_retries_exhausted() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        repo.inject_conflicts(MAX_CONFLICT_RETRIES);
        let handler = UpdateProjectHandler::new(repo);

        let result = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-creator"),
                project_id: id,
                patch: rename_patch("Renamed"),
            })
            .await;
        assert!(matches!(result, Err(ProjectError::VersionConflict { .. })));
    }

    #[tokio::test]
    async fn validation_error_is_not_retried() {
        let project = test_project("u-creator", "AAAA1111");
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = UpdateProjectHandler::new(repo);

        let result = handler
            .handle(UpdateProjectCommand {
                user: test_user("u-creator"),
                project_id: id,
                patch: rename_patch("ab"),
            })
            .await;
        assert!(matches!(result, Err(ProjectError::ValidationFailed { .. })));
    }
}
