//! Project-specific error types.
//!
//! Every roster and aggregate failure maps to one stable error kind with
//! enough detail for the caller to act (offending field, required role).
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound / MemberNotFound / InvalidCode | 404 |
//! | ValidationFailed | 400 |
//! | PermissionDenied | 403 |
//! | AlreadyMember / MemberLimitExceeded | 409 |
//! | DuplicateCode / CodeGenerationExhausted | 409 |
//! | VersionConflict | 409 |
//! | ProjectArchived / LastAdmin / CreatorCannotLeave / InvalidState | 409 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, ProjectId};

use super::MemberRole;

/// Project and membership errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// Project was not found.
    NotFound(ProjectId),

    /// Member record was not found on the roster.
    MemberNotFound(MemberId),

    /// The acting user holds no active membership on this project.
    NotAMember,

    /// Invitation code did not resolve to any project.
    InvalidCode(String),

    /// Validation failed for a specific field.
    ValidationFailed { field: String, message: String },

    /// Acting user lacks the required role.
    PermissionDenied { required: MemberRole },

    /// Identity already holds an active membership.
    AlreadyMember,

    /// Roster is at the configured member cap.
    MemberLimitExceeded { limit: u32 },

    /// Generated code collided with an existing project.
    DuplicateCode(String),

    /// Every generation attempt collided; keyspace or configuration fault.
    CodeGenerationExhausted { attempts: u32 },

    /// Conditional write lost to a concurrent writer.
    VersionConflict { expected: u64 },

    /// Join attempted against an archived or deleted project.
    ProjectArchived(ProjectId),

    /// Target is the sole remaining active admin.
    LastAdmin,

    /// The creator cannot leave their own project.
    CreatorCannotLeave,

    /// Invalid lifecycle transition.
    InvalidState { current: String, attempted: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ProjectError {
    pub fn not_found(id: ProjectId) -> Self {
        ProjectError::NotFound(id)
    }

    pub fn member_not_found(id: MemberId) -> Self {
        ProjectError::MemberNotFound(id)
    }

    pub fn invalid_code(code: impl Into<String>) -> Self {
        ProjectError::InvalidCode(code.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProjectError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn permission_denied(required: MemberRole) -> Self {
        ProjectError::PermissionDenied { required }
    }

    pub fn member_limit_exceeded(limit: u32) -> Self {
        ProjectError::MemberLimitExceeded { limit }
    }

    pub fn duplicate_code(code: impl Into<String>) -> Self {
        ProjectError::DuplicateCode(code.into())
    }

    pub fn code_generation_exhausted(attempts: u32) -> Self {
        ProjectError::CodeGenerationExhausted { attempts }
    }

    pub fn version_conflict(expected: u64) -> Self {
        ProjectError::VersionConflict { expected }
    }

    pub fn project_archived(id: ProjectId) -> Self {
        ProjectError::ProjectArchived(id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        ProjectError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ProjectError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProjectError::NotFound(_) => ErrorCode::ProjectNotFound,
            ProjectError::MemberNotFound(_) | ProjectError::NotAMember => {
                ErrorCode::MemberNotFound
            }
            ProjectError::InvalidCode(_) => ErrorCode::InvalidInvitationCode,
            ProjectError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ProjectError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            ProjectError::AlreadyMember => ErrorCode::AlreadyMember,
            ProjectError::MemberLimitExceeded { .. } => ErrorCode::MemberLimitExceeded,
            ProjectError::DuplicateCode(_) => ErrorCode::DuplicateInvitationCode,
            ProjectError::CodeGenerationExhausted { .. } => ErrorCode::CodeGenerationExhausted,
            ProjectError::VersionConflict { .. } => ErrorCode::VersionConflict,
            ProjectError::ProjectArchived(_) => ErrorCode::ProjectArchived,
            ProjectError::LastAdmin => ErrorCode::LastAdmin,
            ProjectError::CreatorCannotLeave => ErrorCode::CreatorCannotLeave,
            ProjectError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            ProjectError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ProjectError::NotFound(id) => format!("Project not found: {}", id),
            ProjectError::MemberNotFound(id) => format!("Member not found: {}", id),
            ProjectError::NotAMember => {
                "User is not an active member of this project".to_string()
            }
            ProjectError::InvalidCode(code) => {
                format!("Invitation code '{}' does not match any project", code)
            }
            ProjectError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ProjectError::PermissionDenied { required } => {
                format!("Requires {} role or above", required)
            }
            ProjectError::AlreadyMember => "Identity is already an active member".to_string(),
            ProjectError::MemberLimitExceeded { limit } => {
                format!("Project is at its member limit of {}", limit)
            }
            ProjectError::DuplicateCode(code) => {
                format!("Invitation code '{}' is already in use", code)
            }
            ProjectError::CodeGenerationExhausted { attempts } => format!(
                "Could not generate a unique invitation code after {} attempts",
                attempts
            ),
            ProjectError::VersionConflict { expected } => format!(
                "Project was modified concurrently (expected version {})",
                expected
            ),
            ProjectError::ProjectArchived(id) => {
                format!("Project {} is archived or deleted and cannot be joined", id)
            }
            ProjectError::LastAdmin => {
                "Cannot remove or demote the last active admin".to_string()
            }
            ProjectError::CreatorCannotLeave => {
                "The project creator cannot leave the project".to_string()
            }
            ProjectError::InvalidState { current, attempted } => {
                format!("Cannot {} a project in {} state", attempted, current)
            }
            ProjectError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger an internal retry.
    ///
    /// Only optimistic-concurrency conflicts are retried (against refreshed
    /// state) and only duplicate codes are regenerated; validation,
    /// not-found, permission, and state errors are terminal for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProjectError::VersionConflict { .. } | ProjectError::DuplicateCode(_)
        )
    }
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ProjectError {}

impl From<DomainError> for ProjectError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DuplicateInvitationCode => ProjectError::DuplicateCode(
                err.details
                    .get("code")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ErrorCode::VersionConflict => ProjectError::VersionConflict {
                expected: err
                    .details
                    .get("expected_version")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ProjectError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => ProjectError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ProjectError> for DomainError {
    fn from(err: ProjectError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

impl From<crate::domain::foundation::ValidationError> for ProjectError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        ProjectError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
