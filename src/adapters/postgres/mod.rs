//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresProjectRepository` - Project aggregate storage with optimistic locking
//! - `PostgresProjectReader` - Read-optimized project listing queries

mod project_reader;
mod project_repository;

pub use project_reader::PostgresProjectReader;
pub use project_repository::PostgresProjectRepository;
