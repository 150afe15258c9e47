//! Project settings value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Lower/upper bounds for the optional member cap.
pub const MIN_MAX_MEMBERS: u32 = 1;
pub const MAX_MAX_MEMBERS: u32 = 1000;

/// Per-project behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Public projects accept open join by invitation code.
    pub is_public: bool,

    /// Whether non-admin members may send invitations.
    pub allow_member_invite: bool,

    /// Optional cap on non-removed roster size (1..=1000).
    pub max_members: Option<u32>,
}

impl ProjectSettings {
    /// Builds settings, validating the member cap range.
    pub fn new(
        is_public: bool,
        allow_member_invite: bool,
        max_members: Option<u32>,
    ) -> Result<Self, ValidationError> {
        if let Some(cap) = max_members {
            if !(MIN_MAX_MEMBERS..=MAX_MAX_MEMBERS).contains(&cap) {
                return Err(ValidationError::out_of_range(
                    "max_members",
                    MIN_MAX_MEMBERS as i64,
                    MAX_MAX_MEMBERS as i64,
                    cap as i64,
                ));
            }
        }
        Ok(Self {
            is_public,
            allow_member_invite,
            max_members,
        })
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            is_public: false,
            allow_member_invite: true,
            max_members: None,
        }
    }
}
