//! Project reader port (read side / CQRS queries).
//!
//! Defines the contract for project listing queries. The detail and roster
//! reads go through the repository (they need the full aggregate for the
//! permission check); listings use denormalized summaries instead of
//! loading every roster.

use crate::domain::foundation::{DomainError, ProjectId, Timestamp, UserId};
use crate::domain::project::{MemberRole, ProjectStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for project queries.
///
/// Provides read-optimized views of project data.
/// Implementations may use caching for frequently-accessed data.
#[async_trait]
pub trait ProjectReader: Send + Sync {
    /// List projects where the user holds a bound, non-removed membership
    /// (or is the creator), ordered per `options.sort`.
    ///
    /// Soft-deleted projects are never listed.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        options: &ListOptions,
    ) -> Result<ProjectList, DomainError>;
}

/// Sort key for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    /// Most recently updated first.
    #[default]
    UpdatedAt,
    /// Most recently created first.
    CreatedAt,
    /// Alphabetical by name.
    Name,
}

/// Options for listing projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of results to return.
    pub limit: Option<u32>,

    /// Number of results to skip.
    pub offset: Option<u32>,

    /// Filter by status (None = active and archived).
    pub status: Option<ProjectStatus>,

    /// Filter to projects where the user holds this role.
    pub role: Option<MemberRole>,

    /// Case-insensitive substring match on the project name.
    pub search: Option<String>,

    /// Result ordering.
    pub sort: ProjectSort,
}

impl ListOptions {
    /// Create options for a paginated query.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some((page.saturating_sub(1)) * per_page),
            ..Default::default()
        }
    }

    /// Filter to a specific status.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter to projects where the user holds this role.
    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Filter by a name search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Order by the given key.
    pub fn sorted_by(mut self, sort: ProjectSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Paginated list of projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectList {
    /// Projects in this page.
    pub items: Vec<ProjectSummary>,

    /// Total number of matching projects.
    pub total: u64,

    /// Whether there are more results.
    pub has_more: bool,
}

/// Summary view of a project for lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project ID.
    pub id: ProjectId,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Current status.
    pub status: ProjectStatus,

    /// The listing user's role on this project.
    pub role: MemberRole,

    /// Number of non-removed roster records.
    pub member_count: u32,

    /// Completion percentage (0-100), derived from the task counters.
    pub progress: u8,

    /// When the project was created.
    pub created_at: Timestamp,

    /// When the project was last updated.
    pub updated_at: Timestamp,
}
