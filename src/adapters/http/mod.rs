//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod project;

// Re-export key types for convenience
pub use project::project_router;
pub use project::ProjectAppState;
