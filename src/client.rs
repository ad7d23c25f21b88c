use once_cell::sync::Lazy;

/// Shared HTTP client, reused across invocations for connection pooling.
pub static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);
