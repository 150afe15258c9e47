//! Project lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a project.
///
/// `Deleted` is a soft delete: the record is retained, the status is
/// terminal, and no hard delete exists anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Deleted,
}

impl ProjectStatus {
    /// True if the project accepts joins and membership mutations.
    pub fn accepts_members(&self) -> bool {
        matches!(self, ProjectStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Deleted => "deleted",
        }
    }
}

impl StateMachine for ProjectStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, target),
            (Active, Archived) | (Archived, Active) | (Active, Deleted) | (Archived, Deleted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ProjectStatus::*;
        match self {
            Active => vec![Archived, Deleted],
            Archived => vec![Active, Deleted],
            Deleted => vec![],
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
