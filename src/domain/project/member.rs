//! Member records and the per-member state machine.
//!
//! A member is a (project, identity) pairing. Identity is a tagged variant:
//! a pending invite is keyed by normalized email until the invitee joins,
//! at which point the record is merged onto the joining user id. Merge is an
//! explicit operation (`bind_and_activate`), never an implicit roster scan.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    EmailAddress, MemberId, StateMachine, Timestamp, UserId,
};

use super::MemberRole;

/// Lifecycle status of a member record.
///
/// `Removed` is terminal; records are retained for audit history and are
/// never physically deleted from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Invited,
    Active,
    Removed,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Invited => "invited",
            MemberStatus::Active => "active",
            MemberStatus::Removed => "removed",
        }
    }
}

impl StateMachine for MemberStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MemberStatus::*;
        matches!((self, target), (Invited, Active) | (Invited, Removed) | (Active, Removed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MemberStatus::*;
        match self {
            Invited => vec![Active, Removed],
            Active => vec![Removed],
            Removed => vec![],
        }
    }
}

/// Identity of a member record.
///
/// A record is keyed by email while only invited and by user id once
/// joined; the two forms are never ambiguous for the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberIdentity {
    /// Invited by email address; no account bound yet.
    PendingByEmail { email: EmailAddress },

    /// Bound to a user account. `invited_email` is retained for audit when
    /// the record started as a pending invite.
    BoundByUser {
        user_id: UserId,
        invited_email: Option<EmailAddress>,
    },
}

impl MemberIdentity {
    pub fn pending(email: EmailAddress) -> Self {
        MemberIdentity::PendingByEmail { email }
    }

    pub fn bound(user_id: UserId) -> Self {
        MemberIdentity::BoundByUser {
            user_id,
            invited_email: None,
        }
    }

    /// The bound user id, if this identity has joined.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            MemberIdentity::BoundByUser { user_id, .. } => Some(user_id),
            MemberIdentity::PendingByEmail { .. } => None,
        }
    }

    /// The email this identity is (or was) known by.
    pub fn email(&self) -> Option<&EmailAddress> {
        match self {
            MemberIdentity::PendingByEmail { email } => Some(email),
            MemberIdentity::BoundByUser { invited_email, .. } => invited_email.as_ref(),
        }
    }

    /// True if both identities resolve to the same person.
    ///
    /// A bound record matches its user id; a pending record matches its
    /// normalized email. A bound record also matches the email it was
    /// invited under, so a second invite for that address is not treated
    /// as a new identity.
    pub fn resolves_same(&self, other: &MemberIdentity) -> bool {
        match (self, other) {
            (
                MemberIdentity::PendingByEmail { email: a },
                MemberIdentity::PendingByEmail { email: b },
            ) => a == b,
            (
                MemberIdentity::BoundByUser { user_id: a, .. },
                MemberIdentity::BoundByUser { user_id: b, .. },
            ) => a == b,
            (
                MemberIdentity::PendingByEmail { email },
                MemberIdentity::BoundByUser { invited_email, .. },
            )
            | (
                MemberIdentity::BoundByUser { invited_email, .. },
                MemberIdentity::PendingByEmail { email },
            ) => invited_email.as_ref() == Some(email),
        }
    }
}

/// A single roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identifier for this roster record.
    pub id: MemberId,

    /// Who this record belongs to.
    pub identity: MemberIdentity,

    /// Access level.
    pub role: MemberRole,

    /// Lifecycle status.
    pub status: MemberStatus,

    /// Set only on the transition into `Active`.
    pub joined_at: Option<Timestamp>,

    /// Set/refreshed on every invite, including re-invites.
    pub invitation_sent_at: Option<Timestamp>,

    /// The inviting user; None only for the creator's initial membership.
    pub invited_by: Option<UserId>,
}

impl Member {
    /// The creator's self-membership, seeded at project creation.
    pub fn creator(user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: MemberId::new(),
            identity: MemberIdentity::bound(user_id),
            role: MemberRole::Admin,
            status: MemberStatus::Active,
            joined_at: Some(now),
            invitation_sent_at: None,
            invited_by: None,
        }
    }

    /// A fresh invited record.
    pub fn invited(
        identity: MemberIdentity,
        role: MemberRole,
        invited_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: MemberId::new(),
            identity,
            role,
            status: MemberStatus::Invited,
            joined_at: None,
            invitation_sent_at: Some(now),
            invited_by: Some(invited_by),
        }
    }

    /// A record created by open join on a public project.
    pub fn open_joiner(user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: MemberId::new(),
            identity: MemberIdentity::bound(user_id),
            role: MemberRole::Member,
            status: MemberStatus::Active,
            joined_at: Some(now),
            invitation_sent_at: None,
            invited_by: None,
        }
    }

    /// True if this record is the given user's bound membership.
    pub fn is_user(&self, user_id: &UserId) -> bool {
        self.identity.user_id() == Some(user_id)
    }

    /// True if this record counts toward the member limit.
    pub fn counts_toward_limit(&self) -> bool {
        self.status != MemberStatus::Removed
    }

    /// True if this is an active admin record.
    pub fn is_active_admin(&self) -> bool {
        self.status == MemberStatus::Active && self.role == MemberRole::Admin
    }

    /// Refreshes the invitation timestamp on a still-pending record.
    pub fn refresh_invitation(&mut self, now: Timestamp) {
        self.invitation_sent_at = Some(now);
    }

    /// Merges a pending record onto the joining user: binds the user id,
    /// transitions to active and stamps `joined_at`. The invited email is
    /// retained on the bound identity.
    pub fn bind_and_activate(&mut self, user_id: UserId, now: Timestamp) {
        let invited_email = self.identity.email().cloned();
        self.identity = MemberIdentity::BoundByUser {
            user_id,
            invited_email,
        };
        self.status = MemberStatus::Active;
        self.joined_at = Some(now);
    }

    /// Marks the record removed. Terminal; the record stays on the roster.
    pub fn mark_removed(&mut self) {
        self.status = MemberStatus::Removed;
    }
}
