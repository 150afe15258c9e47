//! DeleteProjectHandler - Command handler for soft-deleting projects.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{ProjectId, Timestamp, UserId};
use crate::domain::project::{MemberRole, ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to soft-delete a project.
#[derive(Debug, Clone)]
pub struct DeleteProjectCommand {
    pub user: UserId,
    pub project_id: ProjectId,
}

/// Handler for deleting projects.
///
/// Creator only - deletion is not delegable to other admins. The delete is
/// a terminal status flag; the row and its roster are retained.
pub struct DeleteProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl DeleteProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteProjectCommand) -> Result<(), ProjectError> {
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

            if project.created_by != cmd.user {
                return Err(ProjectError::permission_denied(MemberRole::Admin));
            }

            let expected_version = project.version;
            project.soft_delete(Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "project delete lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
