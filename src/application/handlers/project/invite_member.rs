//! InviteMemberHandler - Command handler for inviting members.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{ProjectId, Timestamp, UserId};
use crate::domain::project::{Member, MemberIdentity, MemberRole, ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to invite an identity onto a project roster.
#[derive(Debug, Clone)]
pub struct InviteMemberCommand {
    pub user: UserId,
    pub project_id: ProjectId,
    pub identity: MemberIdentity,
    pub role: MemberRole,
}

/// Handler for inviting members.
///
/// All guards (permission, invite setting, capacity, identity uniqueness)
/// live on the aggregate; on a version conflict the whole invite is
/// re-applied against refreshed state so they are re-checked.
pub struct InviteMemberHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl InviteMemberHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: InviteMemberCommand) -> Result<Member, ProjectError> {
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
            let outcome = project.invite(
                cmd.identity.clone(),
                cmd.role,
                &cmd.user,
                Timestamp::now(),
            )?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => {
                    let member = project
                        .members()
                        .iter()
                        .find(|m| m.id == outcome.member_id())
                        .cloned()
                        .ok_or_else(|| {
                            ProjectError::infrastructure("invited member missing from roster")
                        })?;
                    return Ok(member);
                }
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(project_id = %cmd.project_id, attempt, "invite lost to concurrent writer, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
