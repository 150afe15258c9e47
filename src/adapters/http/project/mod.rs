//! HTTP adapter for project endpoints.
//!
//! Exposes the project domain via REST API:
//! - `POST /api/projects` - Create a project
//! - `GET /api/projects` - List projects the caller belongs to
//! - `GET /api/projects/:id` - Get a single project
//! - `PUT /api/projects/:id` - Update a project
//! - `DELETE /api/projects/:id` - Soft-delete a project
//! - `POST /api/projects/:id/invite` - Invite a member
//! - `POST /api/projects/join/:invitation_code` - Join by invitation code
//! - `GET /api/projects/:id/members` - List the roster
//! - `PUT /api/projects/:id/members/:member_id/role` - Change a member's role
//! - `DELETE /api/projects/:id/members/:member_id` - Remove a member
//! - `POST /api/projects/:id/leave` - Leave a project

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedUser, ProjectAppState};
pub use routes::{project_router, project_routes};
