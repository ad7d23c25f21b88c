//! # GCE REST Client
//!
//! [`GceClient`] binds one project to the Compute Engine v1 REST API and
//! implements the [`ComputeApi`] capability surface. Every call obtains a
//! bearer token from the ambient credential cache, issues a single request,
//! and treats an accepted request as success; the long-running operation
//! the API returns is not polled.

use anyhow::Result;

use crate::client::CLIENT;
use crate::controller::ComputeApi;
use crate::gcp::gce::error::GceError;
use crate::gcp::gce::types::{Image, InstanceRequest};
use crate::gcp::get_access_token;

const GCE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// A client bound to one project's Compute Engine REST surface.
#[derive(Debug, Clone)]
pub struct GceClient {
    project_id: String,
}

impl GceClient {
    pub fn new(project_id: impl Into<String>) -> Self {
        GceClient {
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn instance_url(&self, zone: &str, name: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}/instances/{}",
            GCE_API_BASE, self.project_id, zone, name
        )
    }

    /// POSTs one of the body-less lifecycle verbs (`start`, `stop`).
    async fn post_instance_verb(&self, zone: &str, name: &str, verb: &str) -> Result<()> {
        let token = get_access_token().await?;
        let url = format!("{}/{}", self.instance_url(zone, name), verb);
        let response = CLIENT
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(GceError::Transport)?;
        check_status(response, &format!("instance '{}' in zone '{}'", name, zone)).await?;
        Ok(())
    }
}

impl ComputeApi for GceClient {
    async fn start_instance(&self, zone: &str, name: &str) -> Result<()> {
        self.post_instance_verb(zone, name, "start").await
    }

    async fn stop_instance(&self, zone: &str, name: &str) -> Result<()> {
        self.post_instance_verb(zone, name, "stop").await
    }

    async fn delete_instance(&self, zone: &str, name: &str) -> Result<()> {
        let token = get_access_token().await?;
        let response = CLIENT
            .delete(self.instance_url(zone, name))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(GceError::Transport)?;
        check_status(response, &format!("instance '{}' in zone '{}'", name, zone)).await?;
        Ok(())
    }

    async fn create_instance(&self, zone: &str, request: &InstanceRequest) -> Result<()> {
        let token = get_access_token().await?;
        let url = format!(
            "{}/projects/{}/zones/{}/instances",
            GCE_API_BASE, self.project_id, zone
        );
        let response = CLIENT
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(GceError::Transport)?;
        check_status(
            response,
            &format!("instance '{}' in zone '{}'", request.name, zone),
        )
        .await?;
        Ok(())
    }

    async fn resolve_image_family(&self, image_project: &str, family: &str) -> Result<Image> {
        let token = get_access_token().await?;
        let url = format!(
            "{}/projects/{}/global/images/family/{}",
            GCE_API_BASE, image_project, family
        );
        let response = CLIENT
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(GceError::Transport)?;
        let response = check_status(
            response,
            &format!("image family '{}/{}'", image_project, family),
        )
        .await?;
        let image: Image = response.json().await.map_err(GceError::Transport)?;
        Ok(image)
    }
}

/// Maps a non-success response onto the error taxonomy. The body of a
/// successful response is handed back untouched.
async fn check_status(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, GceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        404 => GceError::NotFound(what.to_string()),
        403 => GceError::PermissionDenied(what.to_string()),
        _ => GceError::Api {
            what: what.to_string(),
            status,
            body,
        },
    })
}
