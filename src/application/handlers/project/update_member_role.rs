//! UpdateMemberRoleHandler - Command handler for role changes.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{MemberId, ProjectId, Timestamp, UserId};
use crate::domain::project::{Member, MemberRole, ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to change a member's role.
#[derive(Debug, Clone)]
pub struct UpdateMemberRoleCommand {
    pub user: UserId,
    pub project_id: ProjectId,
    pub member_id: MemberId,
    pub role: MemberRole,
}

/// Handler for role changes. Admin only; the last-admin guard is enforced
/// by the aggregate and re-checked on every conflict retry.
pub struct UpdateMemberRoleHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl UpdateMemberRoleHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateMemberRoleCommand) -> Result<Member, ProjectError> {
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
            project.update_role(cmd.member_id, cmd.role, &cmd.user, Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => {
                    let member = project
                        .members()
                        .iter()
                        .find(|m| m.id == cmd.member_id)
                        .cloned()
                        .ok_or(ProjectError::MemberNotFound(cmd.member_id))?;
                    return Ok(member);
                }
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "role update lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
