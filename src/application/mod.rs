//! Application layer - command/query handlers orchestrating the domain.

pub mod handlers;
