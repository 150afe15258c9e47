//! Teamspace - Project Collaboration Service
//!
//! This crate implements project lifecycle, membership roster, role-based
//! access, and invitation-driven onboarding behind a REST API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
