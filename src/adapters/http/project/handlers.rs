//! HTTP handlers for project endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::project::{
    CreateProjectCommand, CreateProjectHandler, DeleteProjectCommand, DeleteProjectHandler,
    GetProjectHandler, GetProjectQuery, InviteMemberCommand, InviteMemberHandler,
    JoinProjectCommand, JoinProjectHandler, LeaveProjectCommand, LeaveProjectHandler,
    ListMembersHandler, ListMembersQuery, ListProjectsHandler, ListProjectsQuery,
    RemoveMemberCommand, RemoveMemberHandler, UpdateMemberRoleCommand, UpdateMemberRoleHandler,
    UpdateProjectCommand, UpdateProjectHandler,
};
use crate::domain::foundation::{EmailAddress, MemberId, ProjectId, UserId};
use crate::domain::project::{InvitationCode, ProjectError, ProjectSettings, TaskMetadata};
use crate::ports::{ProjectReader, ProjectRepository, ProjectSort};

use super::dto::{
    ApiResponse, CreateProjectRequest, ErrorResponse, InviteMemberRequest, JoinResponse,
    ListMembersParams, ListProjectsParams, MemberResponse, PaginationMeta, ProjectResponse,
    ProjectSummaryResponse, UpdateMemberRoleRequest, UpdateProjectRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct ProjectAppState {
    pub project_repository: Arc<dyn ProjectRepository>,
    pub project_reader: Arc<dyn ProjectReader>,
}

impl ProjectAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_project_handler(&self) -> CreateProjectHandler {
        CreateProjectHandler::new(self.project_repository.clone())
    }

    pub fn get_project_handler(&self) -> GetProjectHandler {
        GetProjectHandler::new(self.project_repository.clone())
    }

    pub fn list_projects_handler(&self) -> ListProjectsHandler {
        ListProjectsHandler::new(self.project_reader.clone())
    }

    pub fn update_project_handler(&self) -> UpdateProjectHandler {
        UpdateProjectHandler::new(self.project_repository.clone())
    }

    pub fn delete_project_handler(&self) -> DeleteProjectHandler {
        DeleteProjectHandler::new(self.project_repository.clone())
    }

    pub fn invite_member_handler(&self) -> InviteMemberHandler {
        InviteMemberHandler::new(self.project_repository.clone())
    }

    pub fn join_project_handler(&self) -> JoinProjectHandler {
        JoinProjectHandler::new(self.project_repository.clone())
    }

    pub fn list_members_handler(&self) -> ListMembersHandler {
        ListMembersHandler::new(self.project_repository.clone())
    }

    pub fn update_member_role_handler(&self) -> UpdateMemberRoleHandler {
        UpdateMemberRoleHandler::new(self.project_repository.clone())
    }

    pub fn remove_member_handler(&self) -> RemoveMemberHandler {
        RemoveMemberHandler::new(self.project_repository.clone())
    }

    pub fn leave_project_handler(&self) -> LeaveProjectHandler {
        LeaveProjectHandler::new(self.project_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing. The email
/// is optional and is used to claim pending invitations on join.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: Option<EmailAddress>,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate JWT token from Authorization header
            // For development, we accept X-User-Id and X-User-Email headers
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            let email = parts
                .headers
                .get("X-User-Email")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| EmailAddress::new(s).ok());

            Ok(AuthenticatedUser { user_id, email })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/projects - List projects the current user belongs to
pub async fn list_projects(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListProjectsParams>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.list_projects_handler();
    let page = params.page();
    let per_page = params.limit();
    let query = ListProjectsQuery {
        user: user.user_id,
        page: Some(page),
        per_page: Some(per_page),
        status: params.status,
        role: params.role,
        search: params.search,
        sort: params.sort.unwrap_or(ProjectSort::UpdatedAt),
    };

    let list = handler.handle(query).await?;

    let items: Vec<ProjectSummaryResponse> = list
        .items
        .into_iter()
        .map(ProjectSummaryResponse::from)
        .collect();
    let response =
        ApiResponse::ok(items).with_pagination(PaginationMeta::new(page, per_page, list.total));

    Ok(Json(response))
}

/// GET /api/projects/:id - Get a single project
pub async fn get_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.get_project_handler();
    let query = GetProjectQuery {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
    };

    let project = handler.handle(query).await?;

    Ok(Json(ApiResponse::ok(ProjectResponse::from(&project))))
}

/// GET /api/projects/:id/members - List the project roster
pub async fn list_members(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListMembersParams>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.list_members_handler();
    let query = ListMembersQuery {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
        status: params.status,
    };

    let members = handler.handle(query).await?;

    let items: Vec<MemberResponse> = members.iter().map(MemberResponse::from).collect();
    Ok(Json(ApiResponse::ok(items)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/projects - Create a project
pub async fn create_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.create_project_handler();
    let cmd = CreateProjectCommand {
        creator: user.user_id,
        name: request.name,
        description: request.description,
        settings: request
            .settings
            .map(|s| s.into_domain())
            .transpose()?
            .unwrap_or_else(ProjectSettings::default),
        metadata: request
            .metadata
            .map(|m| m.into_domain())
            .transpose()?
            .unwrap_or_else(TaskMetadata::default),
    };

    let project = handler.handle(cmd).await?;

    let response = ApiResponse::ok_with_message(
        ProjectResponse::from(&project),
        "Project created",
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/projects/:id - Update name, description, status, or settings
pub async fn update_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.update_project_handler();
    let cmd = UpdateProjectCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
        patch: request.into_patch()?,
    };

    let project = handler.handle(cmd).await?;

    Ok(Json(ApiResponse::ok(ProjectResponse::from(&project))))
}

/// DELETE /api/projects/:id - Soft-delete a project (creator only)
pub async fn delete_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.delete_project_handler();
    let cmd = DeleteProjectCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
    };

    handler.handle(cmd).await?;

    Ok(Json(ApiResponse::message_only("Project deleted")))
}

/// POST /api/projects/:id/invite - Invite a member by email or user id
pub async fn invite_member(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<InviteMemberRequest>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.invite_member_handler();
    let cmd = InviteMemberCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
        identity: request.identity()?,
        role: request.role,
    };

    let member = handler.handle(cmd).await?;

    let response =
        ApiResponse::ok_with_message(MemberResponse::from(&member), "Invitation sent");
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/projects/join/:invitation_code - Join a project by code
pub async fn join_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(invitation_code): Path<String>,
) -> Result<impl IntoResponse, ProjectApiError> {
    // A malformed code can never match a project; report it the same way
    // as an unknown one.
    let code = InvitationCode::try_new(&invitation_code)
        .map_err(|_| ProjectError::invalid_code(&invitation_code))?;

    let handler = state.join_project_handler();
    let cmd = JoinProjectCommand {
        user: user.user_id,
        email: user.email,
        code,
    };

    let result = handler.handle(cmd).await?;

    let response = ApiResponse::ok_with_message(
        JoinResponse {
            project: ProjectResponse::from(&result.project),
            member: MemberResponse::from(&result.member),
        },
        "Joined project",
    );
    Ok(Json(response))
}

/// PUT /api/projects/:id/members/:member_id/role - Change a member's role
pub async fn update_member_role(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.update_member_role_handler();
    let cmd = UpdateMemberRoleCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
        member_id: MemberId::from_uuid(member_id),
        role: request.role,
    };

    let member = handler.handle(cmd).await?;

    Ok(Json(ApiResponse::ok(MemberResponse::from(&member))))
}

/// DELETE /api/projects/:id/members/:member_id - Remove a member
pub async fn remove_member(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.remove_member_handler();
    let cmd = RemoveMemberCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
        member_id: MemberId::from_uuid(member_id),
    };

    handler.handle(cmd).await?;

    Ok(Json(ApiResponse::message_only("Member removed")))
}

/// POST /api/projects/:id/leave - Leave a project
pub async fn leave_project(
    State(state): State<ProjectAppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ProjectApiError> {
    let handler = state.leave_project_handler();
    let cmd = LeaveProjectCommand {
        user: user.user_id,
        project_id: ProjectId::from_uuid(project_id),
    };

    handler.handle(cmd).await?;

    Ok(Json(ApiResponse::message_only("Left project")))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ProjectApiError(ProjectError);

impl From<ProjectError> for ProjectApiError {
    fn from(err: ProjectError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for ProjectApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(ProjectError::from(err))
    }
}

impl IntoResponse for ProjectApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            ProjectError::NotFound(_) => (StatusCode::NOT_FOUND, "PROJECT_NOT_FOUND"),
            ProjectError::MemberNotFound(_) | ProjectError::NotAMember => {
                (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND")
            }
            ProjectError::InvalidCode(_) => (StatusCode::NOT_FOUND, "INVALID_INVITATION_CODE"),
            ProjectError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            ProjectError::PermissionDenied { .. } => {
                (StatusCode::FORBIDDEN, "PERMISSION_DENIED")
            }
            ProjectError::AlreadyMember => (StatusCode::CONFLICT, "ALREADY_MEMBER"),
            ProjectError::MemberLimitExceeded { .. } => {
                (StatusCode::CONFLICT, "MEMBER_LIMIT_EXCEEDED")
            }
            ProjectError::DuplicateCode(_) => {
                (StatusCode::CONFLICT, "DUPLICATE_INVITATION_CODE")
            }
            ProjectError::CodeGenerationExhausted { .. } => {
                (StatusCode::CONFLICT, "CODE_GENERATION_EXHAUSTED")
            }
            ProjectError::VersionConflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
            ProjectError::ProjectArchived(_) => (StatusCode::CONFLICT, "PROJECT_ARCHIVED"),
            ProjectError::LastAdmin => (StatusCode::CONFLICT, "LAST_ADMIN"),
            ProjectError::CreatorCannotLeave => (StatusCode::CONFLICT, "CREATOR_CANNOT_LEAVE"),
            ProjectError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            ProjectError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
