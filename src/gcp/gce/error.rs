use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the Compute Engine REST surface.
///
/// Not-found and permission failures get their own variants so the entry
/// point can log them distinctly; everything else stays coarse.
#[derive(Debug, Error)]
pub enum GceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("compute api returned {status} for {what}: {body}")]
    Api {
        what: String,
        status: StatusCode,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
