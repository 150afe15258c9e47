//! Project aggregate entity.
//!
//! The Project aggregate owns identity, settings, externally supplied task
//! counters, and the full membership roster. All membership mutations go
//! through this type so the roster invariants hold after every change:
//!
//! - exactly one active admin (the creator) immediately after creation
//! - no two records resolve to the same identity
//! - the sole remaining active admin can be neither removed nor demoted
//! - removed records are terminal and retained for audit
//!
//! Persistence is a single document per project; the `version` field is the
//! optimistic-concurrency token checked by the repository's conditional
//! write.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    EmailAddress, MemberId, Percentage, ProjectId, StateMachine, Timestamp, UserId,
    ValidationError,
};

use super::{
    InvitationCode, Member, MemberIdentity, MemberRole, MemberStatus, ProjectError,
    ProjectSettings, ProjectStatus, TaskMetadata,
};

/// Name length bounds.
pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;

/// Description length bound.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Input for project creation.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub settings: ProjectSettings,
    pub metadata: TaskMetadata,
}

/// Partial update applied by `apply_update`.
///
/// Only name, description, status (active/archived) and settings are
/// mutable this way; the roster and the invitation code never are.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub settings: Option<ProjectSettings>,
}

/// Outcome of an invite call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    /// A new invited record was created.
    Created(MemberId),
    /// The identity was already invited; only `invitation_sent_at` moved.
    Refreshed(MemberId),
}

impl InviteOutcome {
    pub fn member_id(&self) -> MemberId {
        match self {
            InviteOutcome::Created(id) | InviteOutcome::Refreshed(id) => *id,
        }
    }
}

/// Project aggregate - the collaborative unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, immutable.
    pub id: ProjectId,

    /// Display name, 3-100 characters.
    pub name: String,

    /// Optional description, at most 500 characters.
    pub description: Option<String>,

    /// Creating user, immutable.
    pub created_by: UserId,

    /// Unique join code, immutable once set.
    pub invitation_code: InvitationCode,

    /// Lifecycle status.
    pub status: ProjectStatus,

    /// Behavior switches.
    pub settings: ProjectSettings,

    /// Externally supplied task counters.
    pub metadata: TaskMetadata,

    /// Ordered roster, unique per resolved identity.
    pub members: Vec<Member>,

    /// Optimistic-concurrency token, bumped by every persisted write.
    pub version: u64,

    /// When the project was created.
    pub created_at: Timestamp,

    /// When the project was last updated.
    pub updated_at: Timestamp,
}

impl Project {
    /// Creates a project with the creator seeded as its active admin.
    ///
    /// The invitation code is drawn by the caller (the create handler owns
    /// the uniqueness retry loop against the store).
    pub fn create(
        spec: NewProject,
        creator: UserId,
        code: InvitationCode,
        now: Timestamp,
    ) -> Result<Self, ProjectError> {
        let name = validate_name(&spec.name)?;
        let description = validate_description(spec.description.as_deref())?;

        Ok(Self {
            id: ProjectId::new(),
            name,
            description,
            created_by: creator.clone(),
            invitation_code: code,
            status: ProjectStatus::Active,
            settings: spec.settings,
            metadata: spec.metadata,
            members: vec![Member::creator(creator, now)],
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    // ────────────────────────────────────────────────────────────────────
    // Aggregate operations
    // ────────────────────────────────────────────────────────────────────

    /// Applies a partial update. Members and the invitation code are never
    /// touched here; status may only move between active and archived.
    pub fn apply_update(&mut self, patch: ProjectPatch, now: Timestamp) -> Result<(), ProjectError> {
        if let Some(status) = patch.status {
            if status == ProjectStatus::Deleted {
                return Err(ProjectError::validation(
                    "status",
                    "status may only be set to active or archived",
                ));
            }
            if status != self.status {
                self.status = self.status.transition_to(status).map_err(|_| {
                    ProjectError::invalid_state(self.status.as_str(), status.as_str())
                })?;
            }
        }
        if let Some(name) = patch.name {
            self.name = validate_name(&name)?;
        }
        if let Some(description) = patch.description {
            self.description = validate_description(Some(&description))?;
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Moves the project to archived.
    pub fn archive(&mut self, now: Timestamp) -> Result<(), ProjectError> {
        self.status = self
            .status
            .transition_to(ProjectStatus::Archived)
            .map_err(|_| ProjectError::invalid_state(self.status.as_str(), "archive"))?;
        self.updated_at = now;
        Ok(())
    }

    /// Soft delete: terminal status flag, record retained.
    pub fn soft_delete(&mut self, now: Timestamp) -> Result<(), ProjectError> {
        self.status = self
            .status
            .transition_to(ProjectStatus::Deleted)
            .map_err(|_| ProjectError::invalid_state(self.status.as_str(), "delete"))?;
        self.updated_at = now;
        Ok(())
    }

    /// Derived completion percentage, recomputed on read.
    pub fn progress(&self) -> Percentage {
        self.metadata.progress()
    }

    // ────────────────────────────────────────────────────────────────────
    // Permission evaluator
    // ────────────────────────────────────────────────────────────────────

    /// Pure role check. The creator always satisfies any required role;
    /// everyone else needs a bound, active record with role >= required.
    pub fn has_permission(&self, user: &UserId, required: MemberRole) -> bool {
        if &self.created_by == user {
            return true;
        }
        self.members
            .iter()
            .find(|m| m.is_user(user) && m.status == MemberStatus::Active)
            .map(|m| m.role.satisfies(required))
            .unwrap_or(false)
    }

    // ────────────────────────────────────────────────────────────────────
    // Membership manager
    // ────────────────────────────────────────────────────────────────────

    /// Invites an identity onto the roster.
    ///
    /// Non-admins may invite only when `allow_member_invite` is set.
    /// Re-inviting an already-invited identity refreshes the invitation
    /// timestamp and changes nothing else.
    pub fn invite(
        &mut self,
        identity: MemberIdentity,
        role: MemberRole,
        acting: &UserId,
        now: Timestamp,
    ) -> Result<InviteOutcome, ProjectError> {
        if !self.status.accepts_members() {
            return Err(ProjectError::invalid_state(self.status.as_str(), "invite into"));
        }
        if !self.has_permission(acting, MemberRole::Member) {
            return Err(ProjectError::permission_denied(MemberRole::Member));
        }
        if !self.has_permission(acting, MemberRole::Admin) && !self.settings.allow_member_invite {
            return Err(ProjectError::permission_denied(MemberRole::Admin));
        }

        if let Some(existing) = self
            .members
            .iter_mut()
            .find(|m| m.identity.resolves_same(&identity))
        {
            return match existing.status {
                MemberStatus::Active => Err(ProjectError::AlreadyMember),
                MemberStatus::Invited => {
                    existing.refresh_invitation(now);
                    let id = existing.id;
                    self.updated_at = now;
                    Ok(InviteOutcome::Refreshed(id))
                }
                MemberStatus::Removed => Err(ProjectError::invalid_state(
                    existing.status.as_str(),
                    "re-invite",
                )),
            };
        }

        self.ensure_capacity()?;
        let member = Member::invited(identity, role, acting.clone(), now);
        let id = member.id;
        self.members.push(member);
        self.updated_at = now;
        Ok(InviteOutcome::Created(id))
    }

    /// Joins by invitation code (the code was already resolved upstream).
    ///
    /// A pending invite matched by bound user id or by the principal's
    /// normalized email is merged into a single active record; otherwise a
    /// public project accepts the joiner as a fresh `member`-role record.
    pub fn join(
        &mut self,
        user: UserId,
        email: Option<&EmailAddress>,
        now: Timestamp,
    ) -> Result<MemberId, ProjectError> {
        if !self.status.accepts_members() {
            return Err(ProjectError::project_archived(self.id));
        }

        // Prior record bound to this user id.
        if let Some(existing) = self.members.iter_mut().find(|m| m.is_user(&user)) {
            return match existing.status {
                MemberStatus::Active => Err(ProjectError::AlreadyMember),
                MemberStatus::Invited => {
                    existing.status = MemberStatus::Active;
                    existing.joined_at = Some(now);
                    let id = existing.id;
                    self.updated_at = now;
                    Ok(id)
                }
                MemberStatus::Removed => Err(ProjectError::invalid_state(
                    existing.status.as_str(),
                    "re-join",
                )),
            };
        }

        // Pending invite matched by normalized email.
        if let Some(email) = email {
            let pending = MemberIdentity::pending(email.clone());
            if let Some(existing) = self
                .members
                .iter_mut()
                .find(|m| m.identity.resolves_same(&pending))
            {
                return match existing.status {
                    MemberStatus::Invited => {
                        existing.bind_and_activate(user, now);
                        let id = existing.id;
                        self.updated_at = now;
                        Ok(id)
                    }
                    MemberStatus::Active => Err(ProjectError::AlreadyMember),
                    MemberStatus::Removed => Err(ProjectError::invalid_state(
                        existing.status.as_str(),
                        "re-join",
                    )),
                };
            }
        }

        // Open join is a public-project feature only.
        if !self.settings.is_public {
            return Err(ProjectError::permission_denied(MemberRole::Member));
        }
        self.ensure_capacity()?;
        let member = Member::open_joiner(user, now);
        let id = member.id;
        self.members.push(member);
        self.updated_at = now;
        Ok(id)
    }

    /// Changes a member's role. Admin only; demoting the sole active admin
    /// is rejected so every project keeps at least one admin.
    pub fn update_role(
        &mut self,
        member_id: MemberId,
        new_role: MemberRole,
        acting: &UserId,
        now: Timestamp,
    ) -> Result<(), ProjectError> {
        if !self.has_permission(acting, MemberRole::Admin) {
            return Err(ProjectError::permission_denied(MemberRole::Admin));
        }
        let admins = self.active_admin_count();
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or(ProjectError::MemberNotFound(member_id))?;
        if member.status == MemberStatus::Removed {
            return Err(ProjectError::invalid_state(
                member.status.as_str(),
                "change role of",
            ));
        }
        if member.is_active_admin() && new_role < MemberRole::Admin && admins <= 1 {
            return Err(ProjectError::LastAdmin);
        }
        member.role = new_role;
        self.updated_at = now;
        Ok(())
    }

    /// Removes a member. Admins may remove anyone; any member may remove
    /// themself. The sole active admin can never be removed.
    pub fn remove_member(
        &mut self,
        member_id: MemberId,
        acting: &UserId,
        now: Timestamp,
    ) -> Result<(), ProjectError> {
        let admins = self.active_admin_count();
        let is_admin = self.has_permission(acting, MemberRole::Admin);
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or(ProjectError::MemberNotFound(member_id))?;

        if !is_admin && !member.is_user(acting) {
            return Err(ProjectError::permission_denied(MemberRole::Admin));
        }
        if member.status == MemberStatus::Removed {
            return Err(ProjectError::invalid_state(member.status.as_str(), "remove"));
        }
        if member.is_active_admin() && admins <= 1 {
            return Err(ProjectError::LastAdmin);
        }
        member.mark_removed();
        self.updated_at = now;
        Ok(())
    }

    /// Self-removal. The creator can never leave; a sole remaining active
    /// admin cannot leave either (leaving is a removal).
    pub fn leave(&mut self, user: &UserId, now: Timestamp) -> Result<(), ProjectError> {
        if &self.created_by == user {
            return Err(ProjectError::CreatorCannotLeave);
        }
        let admins = self.active_admin_count();
        let member = self
            .members
            .iter_mut()
            .find(|m| m.is_user(user) && m.status != MemberStatus::Removed)
            .ok_or(ProjectError::NotAMember)?;
        if member.is_active_admin() && admins <= 1 {
            return Err(ProjectError::LastAdmin);
        }
        member.mark_removed();
        self.updated_at = now;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────
    // Roster reads
    // ────────────────────────────────────────────────────────────────────

    /// The roster, in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Roster records with the given status.
    pub fn members_with_status(&self, status: MemberStatus) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.status == status)
    }

    /// The caller's bound membership, if any.
    pub fn member_for_user(&self, user: &UserId) -> Option<&Member> {
        self.members.iter().find(|m| m.is_user(user))
    }

    fn active_admin_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active_admin()).count()
    }

    fn ensure_capacity(&self) -> Result<(), ProjectError> {
        if let Some(limit) = self.settings.max_members {
            let occupied = self
                .members
                .iter()
                .filter(|m| m.counts_toward_limit())
                .count();
            if occupied >= limit as usize {
                return Err(ProjectError::member_limit_exceeded(limit));
            }
        }
        Ok(())
    }
}

fn validate_name(raw: &str) -> Result<String, ProjectError> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(ValidationError::out_of_range(
            "name",
            NAME_MIN_CHARS as i64,
            NAME_MAX_CHARS as i64,
            len as i64,
        )
        .into());
    }
    Ok(name.to_string())
}

fn validate_description(raw: Option<&str>) -> Result<Option<String>, ProjectError> {
    match raw {
        None => Ok(None),
        Some(text) => {
            let len = text.chars().count();
            if len > DESCRIPTION_MAX_CHARS {
                return Err(ValidationError::out_of_range(
                    "description",
                    0,
                    DESCRIPTION_MAX_CHARS as i64,
                    len as i64,
                )
                .into());
            }
            Ok(Some(text.to_string()))
        }
    }
}
