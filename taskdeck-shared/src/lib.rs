//! # TaskDeck Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the TaskDeck API server and supporting tools.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, token issuance, and credential extraction
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
