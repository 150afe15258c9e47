//! Project domain: the aggregate, its roster, and supporting value objects.

pub mod aggregate;
pub mod errors;
pub mod invitation_code;
pub mod member;
pub mod metadata;
pub mod role;
pub mod settings;
pub mod status;

pub use aggregate::{
    InviteOutcome, NewProject, Project, ProjectPatch, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
    NAME_MIN_CHARS,
};
pub use errors::ProjectError;
pub use invitation_code::{InvitationCode, CODE_CHARSET, CODE_LENGTH};
pub use member::{Member, MemberIdentity, MemberStatus};
pub use metadata::TaskMetadata;
pub use role::MemberRole;
pub use settings::{ProjectSettings, MAX_MAX_MEMBERS, MIN_MAX_MEMBERS};
pub use status::ProjectStatus;
