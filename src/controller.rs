//! # VM Controller
//!
//! Dispatches a decoded [`Command`] to the compute backend. The controller
//! is generic over [`ComputeApi`], the five remote operations this service
//! needs, so the dispatch and default-substitution logic runs against a
//! recording fake in tests and against [`GceClient`] in production.
//!
//! [`GceClient`]: crate::gcp::gce::GceClient

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::gcp::gce::defaults::build_instance_request;
use crate::gcp::gce::types::{Image, InstanceRequest};
use crate::message::{Action, Command};

/// The external project whose image catalog boot-image families are
/// resolved against.
pub const IMAGE_PROJECT: &str = "debian-cloud";

/// Default machine type for `create` when `params` does not name one.
pub const DEFAULT_MACHINE_TYPE: &str = "e2-small";
/// Default image family for `create`.
pub const DEFAULT_IMAGE_FAMILY: &str = "debian-11";
/// Default network for `create`.
pub const DEFAULT_NETWORK: &str = "global/networks/default";

/// The remote operations the controller needs, and nothing else.
///
/// Implementations treat "the API accepted the request" as success; none of
/// the operations wait for the underlying work to finish.
#[allow(async_fn_in_trait)]
pub trait ComputeApi {
    async fn start_instance(&self, zone: &str, name: &str) -> Result<()>;
    async fn stop_instance(&self, zone: &str, name: &str) -> Result<()>;
    async fn delete_instance(&self, zone: &str, name: &str) -> Result<()>;
    async fn create_instance(&self, zone: &str, request: &InstanceRequest) -> Result<()>;
    async fn resolve_image_family(&self, image_project: &str, family: &str) -> Result<Image>;
}

/// The caller-tunable parameters of a new VM, after default substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub machine_type: String,
    pub image_family: String,
    pub network: String,
}

impl InstanceSpec {
    /// Builds a spec from `create` params, substituting the documented
    /// default for every key the caller left out.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str, default: &str| {
            params
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        InstanceSpec {
            machine_type: get("machine_type", DEFAULT_MACHINE_TYPE),
            image_family: get("image_family", DEFAULT_IMAGE_FAMILY),
            network: get("network", DEFAULT_NETWORK),
        }
    }
}

/// Qualifies a bare machine type name into a zone-scoped resource path.
/// Strings that already look like a scoped path pass through unchanged.
pub fn qualify_machine_type(machine_type: &str, zone: &str) -> String {
    if machine_type.starts_with("zones/") || machine_type.starts_with("projects/") {
        machine_type.to_string()
    } else {
        format!("zones/{}/machineTypes/{}", zone, machine_type)
    }
}

/// Issues one lifecycle operation per [`Command`].
pub struct VmController<C> {
    compute: C,
}

impl<C: ComputeApi> VmController<C> {
    pub fn new(compute: C) -> Self {
        VmController { compute }
    }

    /// Runs one command to completion. Success means the remote API
    /// accepted the request.
    pub async fn run(&self, command: &Command) -> Result<()> {
        match command.action {
            Action::Start => {
                self.compute
                    .start_instance(&command.zone, &command.vm_name)
                    .await
            }
            Action::Stop => {
                self.compute
                    .stop_instance(&command.zone, &command.vm_name)
                    .await
            }
            Action::Delete => {
                self.compute
                    .delete_instance(&command.zone, &command.vm_name)
                    .await
            }
            Action::Create => self.create(command).await,
        }
    }

    async fn create(&self, command: &Command) -> Result<()> {
        let spec = InstanceSpec::from_params(&command.params);
        let machine_type = qualify_machine_type(&spec.machine_type, &command.zone);

        let image = self
            .compute
            .resolve_image_family(IMAGE_PROJECT, &spec.image_family)
            .await
            .with_context(|| format!("Failed to resolve image family '{}'", spec.image_family))?;

        let request = build_instance_request(
            &command.vm_name,
            &machine_type,
            &image.self_link,
            &spec.network,
        );
        self.compute.create_instance(&command.zone, &request).await
    }
}
