use serde::Deserialize;

// Service-agnostic GCP wire types shared across the auth flows.

/// The fields of a service-account key file this crate reads.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

/// Token response, as returned by both the OAuth2 token endpoint and the
/// GCE metadata server.
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
