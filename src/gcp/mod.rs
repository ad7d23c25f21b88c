//! # Google Cloud Platform Utilities
//!
//! Credential resolution and the Compute Engine REST client.
//!
//! ## Submodules
//! - `auth`: ambient credential discovery and access-token caching.
//! - `gce`: the Compute Engine instance-lifecycle and image-catalog client.
//! - `types`: service-agnostic GCP wire types.

/// Ambient credential discovery and token caching.
pub mod auth;
/// Compute Engine client.
pub mod gce;
/// Service-agnostic GCP wire types.
pub mod types;

// Re-export the two ambient lookups everything else needs.
pub use auth::{get_access_token, get_project_id};
