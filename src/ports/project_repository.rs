//! Project repository port (write side).
//!
//! Defines the contract for persisting and retrieving Project aggregates.
//! Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Whole-aggregate writes**: The roster is stored with the project
//! - **Optimistic concurrency**: `update` is a conditional write on version
//! - **Unique constraint**: Invitation codes are unique across projects

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::project::{InvitationCode, Project};
use async_trait::async_trait;

/// Repository port for Project aggregate persistence.
///
/// Handles write operations for the project lifecycle.
/// Implementations must ensure:
/// - Unique invitation_code constraint, surfaced as `DuplicateInvitationCode`
/// - Conditional update on the expected version, surfaced as `VersionConflict`
/// - Soft-deleted projects remain readable by id
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project (insert-or-fail).
    ///
    /// # Errors
    ///
    /// - `DuplicateInvitationCode` if the code is already taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, project: &Project) -> Result<(), DomainError>;

    /// Update an existing project, conditional on `expected_version`.
    ///
    /// On success the stored version becomes `expected_version + 1`.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` if the stored version is not `expected_version`
    /// - `ProjectNotFound` if the project doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, project: &Project, expected_version: u64) -> Result<(), DomainError>;

    /// Find a project by its ID.
    ///
    /// Returns `None` if not found. Soft-deleted projects are returned;
    /// callers decide whether deleted state is acceptable.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Find a project by its invitation code.
    ///
    /// Returns `None` if no project carries the code. This is the join-path
    /// lookup and never matches soft-deleted projects.
    async fn find_by_code(&self, code: &InvitationCode)
        -> Result<Option<Project>, DomainError>;
}
