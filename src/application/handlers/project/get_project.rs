//! GetProjectHandler - Query handler for a single project.

use std::sync::Arc;

use crate::domain::foundation::{ProjectId, UserId};
use crate::domain::project::{MemberRole, Project, ProjectError, ProjectStatus};
use crate::ports::ProjectRepository;

/// Query to fetch one project.
#[derive(Debug, Clone)]
pub struct GetProjectQuery {
    pub user: UserId,
    pub project_id: ProjectId,
}

/// Handler for reading a project.
///
/// Soft-deleted projects read as not found. Private projects are visible
/// only to members (viewer and above); public projects are visible to any
/// authenticated caller.
pub struct GetProjectHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl GetProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetProjectQuery) -> Result<Project, ProjectError> {
        let project = self
            .repository
            .find_by_id(&query.project_id)
            .await
            .map_err(ProjectError::from)?
            .filter(|p| p.status != ProjectStatus::Deleted)
            .ok_or(ProjectError::NotFound(query.project_id))?;

        if !project.settings.is_public && !project.has_permission(&query.user, MemberRole::Viewer)
        {
            return Err(ProjectError::permission_denied(MemberRole::Viewer));
        }
        Ok(project)
    }
}
