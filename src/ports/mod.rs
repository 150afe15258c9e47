//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProjectRepository` - Write side: whole-aggregate persistence with
//!   optimistic concurrency
//! - `ProjectReader` - Read side: denormalized project listings

mod project_reader;
mod project_repository;

pub use project_reader::{ListOptions, ProjectList, ProjectReader, ProjectSort, ProjectSummary};
pub use project_repository::ProjectRepository;
