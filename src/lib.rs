// # vmops: Pub/Sub-driven VM lifecycle operations
//
// A push subscription POSTs an envelope whose base64 payload reads
// `vm_name:zone:action`; this crate decodes it and issues the matching
// start/stop/create/delete call against the Compute Engine v1 REST API.
// Create requests get their machine type, image family, and network from
// the message attributes, with documented defaults for anything omitted.

/// Shared HTTP client.
pub mod client;

/// Command dispatch over the compute capability surface.
pub mod controller;

/// Google Cloud Platform utilities: credentials and the GCE client.
pub mod gcp;

/// Push envelope decoding and the closed action set.
pub mod message;

/// WWW server implementation: the push endpoint.
pub mod www;

// Re-export the types the binaries wire together.
pub use controller::VmController;
pub use gcp::gce::GceClient;
pub use message::{Action, Command};
