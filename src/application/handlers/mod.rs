//! Command and query handlers, one module per bounded context.

pub mod project;
