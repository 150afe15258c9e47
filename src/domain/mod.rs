//! Domain layer - pure business logic, no I/O.
//!
//! - `foundation` - shared value objects and error vocabulary
//! - `project` - the Project aggregate, roster, and permission rules

pub mod foundation;
pub mod project;
