//! # Google Compute Engine (GCE) Client
//!
//! This module provides a client for the Compute Engine v1 REST API, scoped
//! to the handful of operations this service issues: starting, stopping,
//! deleting, and inserting instances, plus resolving an image family to a
//! concrete boot image.
//!
//! ## Submodules
//! - `client`: the REST client and its error classification.
//! - `defaults`: construction of the `instances.insert` request body.
//! - `error`: the error taxonomy for remote calls.
//! - `types`: data structures serialized to and from the GCE API.

/// REST client for GCE API requests.
pub mod client;
/// Construction of instance-creation request bodies.
pub mod defaults;
/// Error taxonomy for remote calls.
pub mod error;
/// Data structures for the GCE API.
pub mod types;

// Re-export key components to provide a convenient public API for this module.
pub use client::GceClient;
pub use defaults::build_instance_request;
pub use error::GceError;
pub use types::*;
