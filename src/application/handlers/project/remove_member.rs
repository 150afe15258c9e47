//! RemoveMemberHandler - Command handler for removing members.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{MemberId, ProjectId, Timestamp, UserId};
use crate::domain::project::{ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to remove a member from a project.
#[derive(Debug, Clone)]
pub struct RemoveMemberCommand {
    pub user: UserId,
    pub project_id: ProjectId,
    pub member_id: MemberId,
}

/// Handler for removing members. Admins may remove anyone; members may
/// remove themselves. Removal is terminal and audit-preserving.
pub struct RemoveMemberHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl RemoveMemberHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RemoveMemberCommand) -> Result<(), ProjectError> {
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
            project.remove_member(cmd.member_id, &cmd.user, Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "member removal lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
