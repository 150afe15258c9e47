//! HTTP DTOs (Data Transfer Objects) for project endpoints.
//!
//! These types define the JSON request/response structure for the project
//! API. They serve as the boundary between HTTP and the application layer.
//! Every response is wrapped in the standard envelope
//! `{success, message, data, pagination?}`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EmailAddress;
use crate::domain::project::{
    Member, MemberRole, MemberStatus, MemberIdentity, Project, ProjectError, ProjectPatch,
    ProjectSettings, ProjectStatus, TaskMetadata,
};
use crate::ports::{ProjectSort, ProjectSummary};

// ════════════════════════════════════════════════════════════════════════════════
// Response Envelope
// ════════════════════════════════════════════════════════════════════════════════

/// Standard response envelope for all project endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable message (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// Successful response with a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    /// Successful response with a payload and message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// Attach pagination metadata.
    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with a message and no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Error body: the envelope with `success: false` and an error code.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: Option<ProjectSettingsDto>,
    #[serde(default)]
    pub metadata: Option<TaskMetadataDto>,
}

/// Project settings as received/sent over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettingsDto {
    #[serde(default)]
    pub is_public: bool,
    #[serde(default = "default_true")]
    pub allow_member_invite: bool,
    #[serde(default)]
    pub max_members: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl ProjectSettingsDto {
    pub fn into_domain(self) -> Result<ProjectSettings, ProjectError> {
        Ok(ProjectSettings::new(
            self.is_public,
            self.allow_member_invite,
            self.max_members,
        )?)
    }
}

impl From<ProjectSettings> for ProjectSettingsDto {
    fn from(settings: ProjectSettings) -> Self {
        Self {
            is_public: settings.is_public,
            allow_member_invite: settings.allow_member_invite,
            max_members: settings.max_members,
        }
    }
}

/// Task counters as received/sent over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskMetadataDto {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub completed_tasks: u64,
}

impl TaskMetadataDto {
    pub fn into_domain(self) -> Result<TaskMetadata, ProjectError> {
        Ok(TaskMetadata::new(self.total_tasks, self.completed_tasks)?)
    }
}

impl From<TaskMetadata> for TaskMetadataDto {
    fn from(metadata: TaskMetadata) -> Self {
        Self {
            total_tasks: metadata.total_tasks,
            completed_tasks: metadata.completed_tasks,
        }
    }
}

/// Request to update a project. All fields optional; status accepts only
/// `active` or `archived`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub settings: Option<ProjectSettingsDto>,
}

impl UpdateProjectRequest {
    pub fn into_patch(self) -> Result<ProjectPatch, ProjectError> {
        Ok(ProjectPatch {
            name: self.name,
            description: self.description,
            status: self.status,
            settings: self.settings.map(ProjectSettingsDto::into_domain).transpose()?,
        })
    }
}

/// Request to invite a member: exactly one of `email` or `user_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteMemberRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: MemberRole,
}

impl InviteMemberRequest {
    pub fn identity(&self) -> Result<MemberIdentity, ProjectError> {
        match (&self.email, &self.user_id) {
            (Some(email), None) => Ok(MemberIdentity::pending(EmailAddress::new(email)?)),
            (None, Some(user_id)) => Ok(MemberIdentity::bound(
                crate::domain::foundation::UserId::new(user_id)?,
            )),
            _ => Err(ProjectError::validation(
                "identity",
                "exactly one of 'email' or 'user_id' must be provided",
            )),
        }
    }
}

/// Request to change a member's role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProjectsParams {
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size, capped at 100.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub role: Option<MemberRole>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<ProjectSort>,
}

impl ListProjectsParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Query parameters for listing members.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMembersParams {
    #[serde(default)]
    pub status: Option<MemberStatus>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full project view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub invitation_code: String,
    pub status: ProjectStatus,
    pub settings: ProjectSettingsDto,
    pub metadata: TaskMetadataDto,
    /// Completion percentage (0-100), derived from the task counters.
    pub progress: u8,
    /// Number of non-removed roster records.
    pub member_count: u32,
    /// When the project was created (ISO 8601).
    pub created_at: String,
    /// When the project was last updated (ISO 8601).
    pub updated_at: String,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.clone(),
            description: project.description.clone(),
            created_by: project.created_by.to_string(),
            invitation_code: project.invitation_code.to_string(),
            status: project.status,
            settings: project.settings.clone().into(),
            metadata: project.metadata.into(),
            progress: project.progress().value(),
            member_count: project
                .members()
                .iter()
                .filter(|m| m.counts_toward_limit())
                .count() as u32,
            created_at: project.created_at.as_datetime().to_rfc3339(),
            updated_at: project.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Roster record view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    /// Bound user id; null while the invite is pending.
    pub user_id: Option<String>,
    /// The email the member was invited under, if any.
    pub email: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub joined_at: Option<String>,
    pub invitation_sent_at: Option<String>,
    pub invited_by: Option<String>,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            user_id: member.identity.user_id().map(|u| u.to_string()),
            email: member.identity.email().map(|e| e.to_string()),
            role: member.role,
            status: member.status,
            joined_at: member.joined_at.map(|t| t.as_datetime().to_rfc3339()),
            invitation_sent_at: member
                .invitation_sent_at
                .map(|t| t.as_datetime().to_rfc3339()),
            invited_by: member.invited_by.as_ref().map(|u| u.to_string()),
        }
    }
}

/// Summary view for project listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummaryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub role: MemberRole,
    pub member_count: u32,
    pub progress: u8,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectSummary> for ProjectSummaryResponse {
    fn from(summary: ProjectSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            description: summary.description,
            status: summary.status,
            role: summary.role,
            member_count: summary.member_count,
            progress: summary.progress,
            created_at: summary.created_at.as_datetime().to_rfc3339(),
            updated_at: summary.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a successful join.
#[derive(Debug, Clone, Serialize)]
pub struct JoinResponse {
    pub project: ProjectResponse,
    pub member: MemberResponse,
}
