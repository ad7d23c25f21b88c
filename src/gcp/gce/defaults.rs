//! # GCE Instance Request Construction
//!
//! Builds the `instances.insert` request body from already-resolved parts.
//! The fixed policy lives here: one auto-deleted boot disk initialized from
//! the resolved image, one network interface with an external NAT slot, and
//! the default service account with two scopes (object storage read/write
//! and log writing).

use crate::gcp::gce::types::{
    AccessConfig, AttachedDisk, AttachedDiskInitializeParams, InstanceRequest, NetworkInterface,
    ServiceAccountRef,
};

/// OAuth scopes granted to the instance's service account.
const SERVICE_ACCOUNT_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/devstorage.read_write",
    "https://www.googleapis.com/auth/logging.write",
];

/// Creates an `InstanceRequest` for one new virtual machine.
///
/// # Arguments
/// * `name` - The name for the new instance.
/// * `machine_type` - Fully-scoped machine type path.
/// * `source_image` - Self link of the concrete boot image.
/// * `network` - Network the single interface attaches to.
pub fn build_instance_request(
    name: &str,
    machine_type: &str,
    source_image: &str,
    network: &str,
) -> InstanceRequest {
    InstanceRequest {
        name: name.to_string(),
        machine_type: machine_type.to_string(),
        disks: vec![AttachedDisk {
            boot: true,
            auto_delete: true,
            initialize_params: AttachedDiskInitializeParams {
                source_image: source_image.to_string(),
            },
        }],
        network_interfaces: vec![NetworkInterface {
            network: network.to_string(),
            access_configs: vec![AccessConfig {
                name: "External NAT".to_string(),
            }],
        }],
        service_accounts: vec![ServiceAccountRef {
            email: "default".to_string(),
            scopes: SERVICE_ACCOUNT_SCOPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_shape() {
        let req = build_instance_request(
            "test-vm",
            "zones/us-central1-a/machineTypes/e2-small",
            "https://www.googleapis.com/compute/v1/projects/debian-cloud/global/images/debian-11-bullseye-v20260101",
            "global/networks/default",
        );
        assert_eq!(req.name, "test-vm");
        assert_eq!(req.disks.len(), 1);
        assert!(req.disks[0].boot);
        assert!(req.disks[0].auto_delete);
        assert_eq!(req.network_interfaces.len(), 1);
        assert_eq!(req.network_interfaces[0].access_configs[0].name, "External NAT");
        assert_eq!(req.service_accounts[0].email, "default");
        assert_eq!(req.service_accounts[0].scopes.len(), 2);
    }

    #[test]
    fn request_serializes_with_api_field_names() {
        let req = build_instance_request(
            "test-vm",
            "zones/us-central1-a/machineTypes/e2-small",
            "projects/debian-cloud/global/images/debian-11-bullseye-v20260101",
            "global/networks/default",
        );
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("machineType").is_some());
        assert!(json["disks"][0].get("autoDelete").is_some());
        assert!(json["disks"][0]["initializeParams"].get("sourceImage").is_some());
        assert!(json.get("networkInterfaces").is_some());
        assert!(json.get("serviceAccounts").is_some());
    }
}
