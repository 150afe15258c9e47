//! LeaveProjectHandler - Command handler for self-removal.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{ProjectId, Timestamp, UserId};
use crate::domain::project::{ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to leave a project.
#[derive(Debug, Clone)]
pub struct LeaveProjectCommand {
    pub user: UserId,
    pub project_id: ProjectId,
}

/// Handler for leaving projects. The creator can never leave, and leaving
/// is subject to the last-admin guard like any other removal.
pub struct LeaveProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl LeaveProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: LeaveProjectCommand) -> Result<(), ProjectError> {
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

            let expected_version = project.version;
            project.leave(&cmd.user, Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "leave lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
