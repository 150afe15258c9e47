//! Project handlers - one command/query handler per operation.
//!
//! Membership-mutating handlers run a bounded optimistic retry loop:
//! load, mutate a fresh copy, conditional update. On a version conflict the
//! aggregate is reloaded and the mutation re-applied, so roster invariants
//! (last admin, identity uniqueness, capacity) are re-checked against the
//! refreshed state. Validation, not-found, permission, and state errors are
//! never retried.

mod create_project;
mod delete_project;
mod get_project;
mod invite_member;
mod join_project;
mod leave_project;
mod list_members;
mod list_projects;
mod remove_member;
mod update_member_role;
mod update_project;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_project::{CreateProjectCommand, CreateProjectHandler, MAX_CODE_ATTEMPTS};
pub use delete_project::{DeleteProjectCommand, DeleteProjectHandler};
pub use get_project::{GetProjectHandler, GetProjectQuery};
pub use invite_member::{InviteMemberCommand, InviteMemberHandler};
pub use join_project::{JoinProjectCommand, JoinProjectHandler, JoinProjectResult};
pub use leave_project::{LeaveProjectCommand, LeaveProjectHandler};
pub use list_members::{ListMembersHandler, ListMembersQuery};
pub use list_projects::{ListProjectsHandler, ListProjectsQuery};
pub use remove_member::{RemoveMemberCommand, RemoveMemberHandler};
pub use update_member_role::{UpdateMemberRoleCommand, UpdateMemberRoleHandler};
pub use update_project::{UpdateProjectCommand, UpdateProjectHandler};

/// How many times a conditional write is retried after losing to a
/// concurrent writer before the conflict is surfaced to the caller.
pub const MAX_CONFLICT_RETRIES: u32 = 3;
