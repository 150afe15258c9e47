//! Axum router configuration for project endpoints.
//!
//! This module defines the route structure for project-related API endpoints
//! and wires them to their corresponding handlers.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    create_project, delete_project, get_project, invite_member, join_project, leave_project,
    list_members, list_projects, remove_member, update_member_role, update_project,
    ProjectAppState,
};

/// Create the project API router.
///
/// # Routes
///
/// ## Project Lifecycle (require authentication)
/// - `POST /` - Create a project
/// - `GET /` - List projects the caller belongs to
/// - `GET /:id` - Get a single project
/// - `PUT /:id` - Update name, description, status, or settings
/// - `DELETE /:id` - Soft-delete a project (creator only)
///
/// ## Membership
/// - `POST /:id/invite` - Invite a member by email or user id
/// - `POST /join/:invitation_code` - Join a project by invitation code
/// - `GET /:id/members` - List the roster
/// - `PUT /:id/members/:member_id/role` - Change a member's role
/// - `DELETE /:id/members/:member_id` - Remove a member
/// - `POST /:id/leave` - Leave a project
pub fn project_routes() -> Router<ProjectAppState> {
    Router::new()
        // Project lifecycle
        .route("/", post(create_project).get(list_projects))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        // Membership
        .route("/:id/invite", post(invite_member))
        .route("/join/:invitation_code", post(join_project))
        .route("/:id/members", get(list_members))
        .route("/:id/members/:member_id/role", put(update_member_role))
        .route("/:id/members/:member_id", delete(remove_member))
        .route("/:id/leave", post(leave_project))
}

/// Create the complete project module router.
///
/// Mounts the project routes under `/projects`, suitable for nesting
/// under `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::project::{project_router, ProjectAppState};
///
/// let app_state = ProjectAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api", project_router())
///     .with_state(app_state);
/// ```
pub fn project_router() -> Router<ProjectAppState> {
    Router::new().nest("/projects", project_routes())
}
