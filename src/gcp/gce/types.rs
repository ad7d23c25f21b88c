//! # Google Compute Engine (GCE) Data Types
//!
//! Rust structs modeling the JSON bodies exchanged with the Compute Engine
//! API, trimmed to the fields this service actually sends and reads. The
//! `instances.insert` payload tolerates omitted fields, so anything left to
//! the API's own defaults simply is not modeled here.
//!
//! For detailed information on each field, refer to the official GCE API
//! documentation.

use serde::{Deserialize, Serialize};

/// Request body for creating a new GCE virtual machine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// The name of the instance.
    pub name: String,
    /// Fully-scoped machine type path (e.g. "zones/us-central1-a/machineTypes/e2-small").
    #[serde(rename = "machineType")]
    pub machine_type: String,
    /// The disks attached to the instance.
    pub disks: Vec<AttachedDisk>,
    /// The network interfaces for the instance.
    #[serde(rename = "networkInterfaces")]
    pub network_interfaces: Vec<NetworkInterface>,
    /// The service accounts associated with the instance.
    #[serde(rename = "serviceAccounts")]
    pub service_accounts: Vec<ServiceAccountRef>,
}

/// An attached disk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedDisk {
    pub boot: bool,
    #[serde(rename = "autoDelete")]
    pub auto_delete: bool,
    #[serde(rename = "initializeParams")]
    pub initialize_params: AttachedDiskInitializeParams,
}

/// Parameters for initializing a disk from a source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedDiskInitializeParams {
    #[serde(rename = "sourceImage")]
    pub source_image: String,
}

/// A network interface for the instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub network: String,
    #[serde(rename = "accessConfigs")]
    pub access_configs: Vec<AccessConfig>,
}

/// Configuration for external network access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub name: String,
}

/// A reference to a service account and its scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountRef {
    pub email: String,
    pub scopes: Vec<String>,
}

/// The subset of an image resource read back from a family lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    #[serde(rename = "selfLink")]
    pub self_link: String,
    #[serde(default)]
    pub family: Option<String>,
}
