//! # Push Endpoint Handlers
//!
//! The single boundary where a Pub/Sub delivery becomes a VM operation.
//! Every failure anywhere in the chain funnels through here, gets
//! classified coarsely (format / not found / permission / anything else),
//! and logged. Under the default policy it is then swallowed: the endpoint
//! acknowledges the message either way, so the subscription does not
//! redeliver it and re-run a non-idempotent VM operation.
//!
//! `NACK_ON_ERROR=1` flips that policy: failures answer 500 and the
//! subscription redelivers.

use actix_web::{HttpResponse, Responder, web};
use anyhow::Result;
use tracing::{error, info};

use crate::controller::VmController;
use crate::gcp::gce::GceClient;
use crate::gcp::gce::error::GceError;
use crate::gcp::get_project_id;
use crate::message::{self, Command, DecodeError};

/// How a failed invocation is reported to the delivery system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Acknowledge regardless, so the message is never redelivered.
    Ack,
    /// Answer with a server error so the subscription redelivers.
    Nack,
}

impl FailurePolicy {
    /// Reads the policy from `NACK_ON_ERROR`; unset means ack everything.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("NACK_ON_ERROR").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => FailurePolicy::Nack,
            _ => FailurePolicy::Ack,
        }
    }
}

/// Coarse error classification, used only to pick the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorClass {
    Format,
    NotFound,
    PermissionDenied,
    Other,
}

fn classify(err: &anyhow::Error) -> ErrorClass {
    if err.downcast_ref::<DecodeError>().is_some() {
        return ErrorClass::Format;
    }
    match err.downcast_ref::<GceError>() {
        Some(GceError::NotFound(_)) => ErrorClass::NotFound,
        Some(GceError::PermissionDenied(_)) => ErrorClass::PermissionDenied,
        _ => ErrorClass::Other,
    }
}

fn log_failure(err: &anyhow::Error) {
    match classify(err) {
        ErrorClass::Format => error!("discarding malformed message: {}", err),
        ErrorClass::NotFound => error!("resource not found: {}", err),
        ErrorClass::PermissionDenied => error!("permission denied: {}", err),
        ErrorClass::Other => error!("unexpected error: {:#}", err),
    }
}

/// Decode the envelope, resolve clients, dispatch. Returns the command so
/// the caller can log what ran.
async fn handle_impl(body: &[u8]) -> Result<Command> {
    let command = message::decode_envelope(body)?;
    let project = get_project_id().await?;
    let controller = VmController::new(GceClient::new(project));
    controller.run(&command).await?;
    Ok(command)
}

/// Handler for `POST /pubsub`, the push delivery endpoint.
pub async fn push(body: web::Bytes) -> impl Responder {
    match handle_impl(&body).await {
        Ok(command) => {
            info!(
                "action '{}' executed for VM '{}' in zone '{}'",
                command.action, command.vm_name, command.zone
            );
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            log_failure(&e);
            match FailurePolicy::from_env() {
                FailurePolicy::Ack => HttpResponse::NoContent().finish(),
                FailurePolicy::Nack => HttpResponse::InternalServerError().finish(),
            }
        }
    }
}

/// Handler for `GET /healthz`.
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_picks_the_right_bucket() {
        let format: anyhow::Error = DecodeError::FieldCount(2).into();
        assert_eq!(classify(&format), ErrorClass::Format);

        let not_found: anyhow::Error = GceError::NotFound("instance 'x'".into()).into();
        assert_eq!(classify(&not_found), ErrorClass::NotFound);

        let denied: anyhow::Error = GceError::PermissionDenied("instance 'x'".into()).into();
        assert_eq!(classify(&denied), ErrorClass::PermissionDenied);

        let other = anyhow::anyhow!("boom");
        assert_eq!(classify(&other), ErrorClass::Other);
    }

    #[test]
    fn classification_survives_added_context() {
        use anyhow::Context as _;
        let err = Err::<(), _>(GceError::NotFound("image family 'debian-cloud/debian-11'".into()))
            .context("Failed to resolve image family 'debian-11'")
            .unwrap_err();
        assert_eq!(classify(&err), ErrorClass::NotFound);
    }

    #[test]
    fn failure_policy_parsing() {
        assert_eq!(FailurePolicy::parse(None), FailurePolicy::Ack);
        assert_eq!(FailurePolicy::parse(Some("0")), FailurePolicy::Ack);
        assert_eq!(FailurePolicy::parse(Some("no")), FailurePolicy::Ack);
        assert_eq!(FailurePolicy::parse(Some("1")), FailurePolicy::Nack);
        assert_eq!(FailurePolicy::parse(Some("true")), FailurePolicy::Nack);
        assert_eq!(FailurePolicy::parse(Some("TRUE")), FailurePolicy::Nack);
    }

    #[actix_web::test]
    async fn malformed_body_is_acked_under_the_default_policy() {
        // Decoding fails before any client is constructed, so this runs
        // without network access.
        let req = actix_web::test::TestRequest::default().to_http_request();
        let resp = push(web::Bytes::from_static(b"not json"))
            .await
            .respond_to(&req);
        assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);
    }
}
