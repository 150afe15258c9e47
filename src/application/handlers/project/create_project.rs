//! CreateProjectHandler - Command handler for creating projects.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::project::{
    InvitationCode, NewProject, Project, ProjectError, ProjectSettings, TaskMetadata,
};
use crate::ports::ProjectRepository;

/// How many invitation codes are drawn before giving up. At 36^8 possible
/// codes, exhausting this means the store or the RNG is broken, not that
/// the keyspace is full.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Command to create a project.
#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub creator: UserId,
    pub name: String,
    pub description: Option<String>,
    pub settings: ProjectSettings,
    pub metadata: TaskMetadata,
}

/// Handler for creating projects.
///
/// Owns the invitation-code uniqueness loop: generate, insert-or-fail,
/// regenerate on a duplicate-code conflict. There is no check-then-insert;
/// the store's unique constraint is the only uniqueness authority.
pub struct CreateProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl CreateProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateProjectCommand) -> Result<Project, ProjectError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = InvitationCode::generate(&mut rand::thread_rng());
            let project = Project::create(
                NewProject {
                    name: cmd.name.clone(),
                    description: cmd.description.clone(),
                    settings: cmd.settings.clone(),
                    metadata: cmd.metadata,
                },
                cmd.creator.clone(),
                code,
                Timestamp::now(),
            )?;

            match self.repository.insert(&project).await {
                Ok(()) => return Ok(project),
                Err(err) => {
                    let err = ProjectError::from(err);
                    if matches!(err, ProjectError::DuplicateCode(_))
                        && attempt < MAX_CODE_ATTEMPTS
                    {
                        debug!(attempt, "invitation code collided, regenerating");
                        continue;
                    }
                    if matches!(err, ProjectError::DuplicateCode(_)) {
                        return Err(ProjectError::code_generation_exhausted(MAX_CODE_ATTEMPTS));
                    }
                    return Err(err);
                }
            }
        }
        Err(ProjectError::code_generation_exhausted(MAX_CODE_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::project::test_support::{
        test_user, InMemoryProjectRepository,
    };
    use crate::domain::project::{MemberRole, MemberStatus, ProjectStatus, CODE_LENGTH};

    fn command(name: &str) -> CreateProjectCommand {
        CreateProjectCommand {
            creator: test_user("u-creator"),
            name: name.to_string(),
            description: None,
            settings: ProjectSettings::default(),
            metadata: TaskMetadata::default(),
        }
    }

    #[tokio::test]
    async fn creates_project_with_creator_as_sole_admin() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        let handler = CreateProjectHandler::new(repo.clone());

        let project = handler.handle(command("Launch Plan")).await.unwrap();

        assert_eq!(project.name, "Launch Plan");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.members().len(), 1);
        assert_eq!(project.members()[0].role, MemberRole::Admin);
        assert_eq!(project.members()[0].status, MemberStatus::Active);
        assert_eq!(repo.stored_count(), 1);
    }

    #[tokio::test]
    async fn generated_code_is_well_formed() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        let handler = CreateProjectHandler::new(repo);

        let project = handler.handle(command("Launch Plan")).await.unwrap();

        let code = project.invitation_code.as_str();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[tokio::test]
    async fn regenerates_code_on_duplicate_conflict() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        repo.reject_inserts_as_duplicate(2);
        let handler = CreateProjectHandler::new(repo.clone());

        let project = handler.handle(command("Launch Plan")).await;

        assert!(project.is_ok());
        assert_eq!(repo.stored_count(), 1);
    }

    #[tokio::test]
    async fn exhausts_after_bounded_attempts() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        repo.reject_inserts_as_duplicate(MAX_CODE_ATTEMPTS);
        let handler = CreateProjectHandler::new(repo.clone());

        let result = handler.handle(command("Launch Plan")).await;

        assert_eq!(
            result.unwrap_err(),
            ProjectError::code_generation_exhausted(MAX_CODE_ATTEMPTS)
        );
        assert_eq!(repo.stored_count(), 0);
    }

    #[tokio::test]
    async fn rejects_invalid_name_without_touching_store() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        let handler = CreateProjectHandler::new(repo.clone());

        let result = handler.handle(command("ab")).await;

        assert!(matches!(
            result,
            Err(ProjectError::ValidationFailed { ref field, .. }) if field == "name"
        ));
        assert_eq!(repo.stored_count(), 0);
    }

    #[tokio::test]
    async fn surfaces_infrastructure_failure() {
        let repo = Arc::new(InMemoryProjectRepository::failing());
        let handler = CreateProjectHandler::new(repo);

        let result = handler.handle(command("Launch Plan")).await;
        assert!(matches!(result, Err(ProjectError::Infrastructure(_))));
    }
}
