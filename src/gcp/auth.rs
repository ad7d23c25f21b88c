//! # GCP Authentication
//!
//! This module resolves ambient credentials the way the platform's client
//! libraries do: a service-account key file named by
//! `GOOGLE_APPLICATION_CREDENTIALS` when one is configured, otherwise the
//! GCE metadata server of the machine the process runs on. Either path
//! yields a short-lived access token used to authorize API requests.
//!
//! The key-file path performs the server-to-server OAuth 2.0 flow:
//! 1. Reads and parses the service-account key file.
//! 2. Creates a JWT with claims asserting the service account's identity
//!    and the requested API scope.
//! 3. Signs the JWT using the service account's private key (RS256).
//! 4. Exchanges the signed JWT for an access token at the key's token
//!    endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use cached::proc_macro::once;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::client::CLIENT;
use crate::gcp::types::{AccessToken, ServiceAccountKey};

/// Scope requested for issued tokens.
const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Root of the GCE metadata server, reachable only from inside GCP.
const METADATA_BASE: &str = "http://metadata.google.internal/computeMetadata/v1";

/// Represents the claims in the JSON Web Token (JWT) used for authentication.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The issuer of the token (the service account's email address).
    iss: String,
    /// The scope of the requested permissions.
    scope: String,
    /// The audience for the token (the token endpoint URL).
    aud: String,
    /// The expiration time of the token (Unix timestamp).
    exp: u64,
    /// The time the token was issued (Unix timestamp).
    iat: u64,
}

/// Fetches a GCP access token from whichever ambient credential source is
/// available.
///
/// Tokens are valid for an hour; the cache holds one for slightly less so a
/// long-running server never sends a stale token.
#[once(time = 3300, result = true)]
pub async fn get_access_token() -> Result<String> {
    match std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        Ok(path) => token_from_key_file(&path).await,
        Err(_) => token_from_metadata_server().await,
    }
}

/// Resolves the project everything operates on: `GOOGLE_CLOUD_PROJECT` if
/// set, else the service-account key's project, else the metadata server's.
#[once(result = true)]
pub async fn get_project_id() -> Result<String> {
    if let Ok(project) = std::env::var("GOOGLE_CLOUD_PROJECT") {
        return Ok(project);
    }
    if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        return Ok(read_key_file(&path)?.project_id);
    }

    let response = CLIENT
        .get(format!("{}/project/project-id", METADATA_BASE))
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .context("Failed to reach the metadata server; no ambient project id")?;
    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(anyhow::anyhow!(
            "Metadata server refused project-id request: {}",
            error_text
        ));
    }
    response
        .text()
        .await
        .context("Failed to read project id from metadata server")
}

fn read_key_file(path: &str) -> Result<ServiceAccountKey> {
    let key_json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read service account key at {}", path))?;
    serde_json::from_str(&key_json).context("Invalid service account key file")
}

async fn token_from_key_file(path: &str) -> Result<String> {
    let key = read_key_file(path)?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: TOKEN_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        exp: now + 3600, // Token is valid for 1 hour.
        iat: now,
    };

    let header = Header::new(Algorithm::RS256);
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    let jwt = encode(&header, &claims, &encoding_key)?;

    // Exchange the JWT for an access token.
    let params = [
        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
        ("assertion", &jwt),
    ];
    let response = CLIENT.post(&key.token_uri).form(&params).send().await?;
    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(anyhow::anyhow!(
            "Failed to get access token: {}",
            error_text
        ));
    }

    let token_response: AccessToken = response.json().await?;
    Ok(token_response.access_token)
}

async fn token_from_metadata_server() -> Result<String> {
    let response = CLIENT
        .get(format!(
            "{}/instance/service-accounts/default/token",
            METADATA_BASE
        ))
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .context("Failed to reach the metadata server; no ambient credentials")?;
    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(anyhow::anyhow!(
            "Metadata server refused token request: {}",
            error_text
        ));
    }

    let token_response: AccessToken = response.json().await?;
    Ok(token_response.access_token)
}
