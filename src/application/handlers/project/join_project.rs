//! JoinProjectHandler - Command handler for joining via invitation code.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{EmailAddress, Timestamp, UserId};
use crate::domain::project::{InvitationCode, Member, Project, ProjectError};
use crate::ports::ProjectRepository;

use super::MAX_CONFLICT_RETRIES;

/// Command to join a project by invitation code.
#[derive(Debug, Clone)]
pub struct JoinProjectCommand {
    pub user: UserId,
    /// The principal's email, used to claim a pending invite.
    pub email: Option<EmailAddress>,
    pub code: InvitationCode,
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinProjectResult {
    pub project: Project,
    pub member: Member,
}

/// Handler for joining projects.
///
/// The code resolves the project; the aggregate then decides whether this
/// is a pending-invite claim (merge) or an open join on a public project.
pub struct JoinProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl JoinProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: JoinProjectCommand) -> Result<JoinProjectResult, ProjectError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut project = self
                .repository
                .find_by_code(&cmd.code)
                .await
                .map_err(ProjectError::from)?
                .ok_or_else(|| ProjectError::invalid_code(cmd.code.as_str()))?;

            let expected_version = project.version;
            let member_id =
                project.join(cmd.user.clone(), cmd.email.as_ref(), Timestamp::now())?;

            match self.repository.update(&project, expected_version).await {
                Ok(()) => {
                    project.version = expected_version + 1;
                    let member = project
                        .members()
                        .iter()
                        .find(|m| m.id == member_id)
                        .cloned()
                        .ok_or_else(|| {
                            ProjectError::infrastructure("joined member missing from roster")
                        })?;
                    return Ok(JoinProjectResult { project, member });
                }
                Err(err) => {
                    let err = ProjectError::from(err);
                    if err.is_retryable() && attempt < MAX_CONFLICT_RETRIES {
                        warn!(code = %cmd.code, attempt, "join lost to concurrent writer, retrying");
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
        test_code, test_project, test_user, InMemoryProjectRepository,
    };
    use crate::domain::project::{MemberIdentity, MemberRole, MemberStatus};

    fn email(addr: &str) -> EmailAddress {
        EmailAddress::new(addr).unwrap()
    }

    #[tokio::test]
    async fn claims_pending_invite_and_merges_records() {
        let mut project = test_project("u-creator", "AAAA1111");
        project
            .invite(
                MemberIdentity::pending(email("invitee@test.com")),
                MemberRole::Member,
                &test_user("u-creator"),
                Timestamp::now(),
            )
            .unwrap();
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo.clone());

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-invitee"),
                email: Some(email("Invitee@Test.com")),
                code: test_code("AAAA1111"),
            })
            .await
            .unwrap();

        assert_eq!(result.member.status, MemberStatus::Active);
        assert!(result.member.is_user(&test_user("u-invitee")));
        // One record, not two: the pending invite was merged.
        assert_eq!(repo.get(&id).unwrap().members().len(), 2);
    }

    #[tokio::test]
    async fn open_join_on_public_project() {
        let mut project = test_project("u-creator", "AAAA1111");
        project.settings.is_public = true;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo);

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-drop-in"),
                email: Some(email("dropin@test.com")),
                code: test_code("AAAA1111"),
            })
            .await
            .unwrap();

        assert_eq!(result.member.role, MemberRole::Member);
        assert_eq!(result.member.status, MemberStatus::Active);
    }

    #[tokio::test]
    async fn unknown_code_is_rejected() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        let handler = JoinProjectHandler::new(repo);

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-1"),
                email: None,
                code: test_code("ZZZZ9999"),
            })
            .await;

        assert_eq!(result, Err(ProjectError::invalid_code("ZZZZ9999")));
    }

    #[tokio::test]
    async fn private_project_rejects_uninvited_joiner() {
        let project = test_project("u-creator", "AAAA1111");
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo);

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-stranger"),
                email: Some(email("stranger@test.com")),
                code: test_code("AAAA1111"),
            })
            .await;

        assert_eq!(
            result,
            Err(ProjectError::permission_denied(MemberRole::Member))
        );
    }

    #[tokio::test]
    async fn double_join_fails_with_already_member() {
        let mut project = test_project("u-creator", "AAAA1111");
        project.settings.is_public = true;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo);

        let cmd = JoinProjectCommand {
            user: test_user("u-drop-in"),
            email: None,
            code: test_code("AAAA1111"),
        };
        handler.handle(cmd.clone()).await.unwrap();
        let result = handler.handle(cmd).await;

        assert_eq!(result, Err(ProjectError::AlreadyMember));
    }

    #[tokio::test]
    async fn deleted_project_code_no_longer_resolves() {
        let mut project = test_project("u-creator", "AAAA1111");
        project.soft_delete(Timestamp::now()).unwrap();
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo);

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-1"),
                email: None,
                code: test_code("AAAA1111"),
            })
            .await;

        assert_eq!(result, Err(ProjectError::invalid_code("AAAA1111")));
    }

    #[tokio::test]
    async fn archived_project_rejects_join() {
        let mut project = test_project("u-creator", "AAAA1111");
        let project_id = project.id;
        project.archive(Timestamp::now()).unwrap();
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        let handler = JoinProjectHandler::new(repo);

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-1"),
                email: None,
                code: test_code("AAAA1111"),
            })
            .await;

        assert_eq!(result, Err(ProjectError::project_archived(project_id)));
    }

    #[tokio::test]
    async fn retries_after_version_conflict() {
        let mut project = test_project("u-creator", "AAAA1111");
        project.settings.is_public = true;
        let id = project.id;
        let repo = Arc::new(InMemoryProjectRepository::with_project(project));
        repo.inject_conflicts(1);
        let handler = JoinProjectHandler::new(repo.clone());

        let result = handler
            .handle(JoinProjectCommand {
                user: test_user("u-drop-in"),
                email: None,
                code: test_code("AAAA1111"),
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(repo.get(&id).unwrap().members().len(), 2);
    }
}
