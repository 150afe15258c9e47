//! Member role with a total order used by every permission decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Access level of a project member.
///
/// Totally ordered: `Admin > Member > Viewer`. The derived `Ord` is the
/// single comparison used by the permission evaluator and by the roster
/// transition guards; there are no string comparisons anywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Viewer,
    Member,
    Admin,
}

impl MemberRole {
    /// Stable lowercase name, matching the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Viewer => "viewer",
            MemberRole::Member => "member",
            MemberRole::Admin => "admin",
        }
    }

    /// True if this role grants at least `required`.
    pub fn satisfies(&self, required: MemberRole) -> bool {
        *self >= required
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(MemberRole::Viewer),
            "member" => Ok(MemberRole::Member),
            "admin" => Ok(MemberRole::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_totally_ordered() {
        assert!(MemberRole::Admin > MemberRole::Member);
        assert!(MemberRole::Member > MemberRole::Viewer);
        assert!(MemberRole::Admin > MemberRole::Viewer);
    }

    #[test]
    fn satisfies_uses_the_order() {
        assert!(MemberRole::Admin.satisfies(MemberRole::Viewer));
        assert!(MemberRole::Member.satisfies(MemberRole::Member));
        assert!(!MemberRole::Viewer.satisfies(MemberRole::Member));
    }

    #[test]
    fn serializes_to_lowercase() {
        assert_eq!(serde_json::to_string(&MemberRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&MemberRole::Viewer).unwrap(), "\"viewer\"");
    }

    #[test]
    fn parses_from_wire_format() {
        assert_eq!("member".parse::<MemberRole>().unwrap(), MemberRole::Member);
        assert!("owner".parse::<MemberRole>().is_err());
    }
}
