//! Task counters and the derived progress metric.
//!
//! The counters are written by the external task-management collaborator;
//! this subsystem only validates them at initialization and derives a
//! percentage on read.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, ValidationError};

/// Aggregate task counters for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskMetadata {
    pub total_tasks: u64,
    pub completed_tasks: u64,
}

impl TaskMetadata {
    /// Builds metadata, enforcing `completed_tasks <= total_tasks`.
    pub fn new(total_tasks: u64, completed_tasks: u64) -> Result<Self, ValidationError> {
        if completed_tasks > total_tasks {
            return Err(ValidationError::out_of_range(
                "completed_tasks",
                0,
                total_tasks as i64,
                completed_tasks as i64,
            ));
        }
        Ok(Self {
            total_tasks,
            completed_tasks,
        })
    }

    /// Completion percentage, recomputed on every read.
    ///
    /// Zero when there are no tasks; otherwise round-half-up of
    /// `completed / total * 100`, in integer arithmetic so 2/3 is 67,
    /// not 66.
    pub fn progress(&self) -> Percentage {
        if self.total_tasks == 0 {
            return Percentage::ZERO;
        }
        let rounded = (200 * self.completed_tasks + self.total_tasks) / (2 * self.total_tasks);
        Percentage::new(rounded as u8)
    }
}
