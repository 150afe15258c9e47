//! ListMembersHandler - Query handler for a project's roster.

use std::sync::Arc;

use crate::domain::foundation::{ProjectId, UserId};
use crate::domain::project::{Member, MemberRole, MemberStatus, ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

/// Query to list the roster of a project.
#[derive(Debug, Clone)]
pub struct ListMembersQuery {
    pub user: UserId,
    pub project_id: ProjectId,
    /// Filter to a single status (None = all records, removed included).
    pub status: Option<MemberStatus>,
}

/// Handler for listing project members. Requires viewer access.
pub struct ListMembersHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl ListMembersHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListMembersQuery) -> Result<Vec<Member>, ProjectError> {
        let project = self
            .repository
            .find_by_id(&query.project_id)
            .await
            .map_err(ProjectError::from)?
            .filter(|p| p.status != ProjectStatus::Deleted)
            .ok_or(ProjectError::NotFound(query.project_id))?;

        if !project.has_permission(&query.user, MemberRole::Viewer) {
            return Err(ProjectError::permission_denied(MemberRole::Viewer));
        }

        let members = project
            .members()
            .iter()
            .filter(|m| query.status.map_or(true, |status| m.status == status))
            .cloned()
            .collect();
        Ok(members)
    }
}
