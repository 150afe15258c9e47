//! Adapters layer - concrete implementations of ports.
//!
//! Adapters connect the application core to the outside world: HTTP
//! endpoints on the way in, Postgres on the way out.

pub mod http;
pub mod postgres;
