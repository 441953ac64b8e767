//! Secret bundle retrieval from AWS Secrets Manager.
//!
//! One best-effort `GetSecretValue` call per process start. The
//! resolver treats every failure here as non-fatal, so the error type
//! exists mainly to classify what went wrong for the logs.

use std::collections::HashMap;

use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use thiserror::Error;

/// Key/value configuration overrides fetched from the secret store.
pub type SecretBundle = HashMap<String, String>;

/// Failure kinds for the secret bundle fetch.
///
/// All of these are logged and swallowed by the resolver; none of them
/// prevents startup.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// The caller is not allowed to read the bundle.
    #[error("access to secret bundle '{name}' was denied: {message}")]
    AccessDenied { name: String, message: String },

    /// No bundle exists under the requested name.
    #[error("secret bundle '{name}' was not found")]
    NotFound { name: String },

    /// The secret store could not be reached or answered abnormally.
    #[error("secret store request failed: {message}")]
    Network { message: String },

    /// The bundle exists but its payload is not a flat JSON string map.
    #[error("secret bundle '{name}' has an unusable payload: {message}")]
    InvalidPayload { name: String, message: String },
}

/// Fetch the named secret bundle.
///
/// Builds a client from the default credential chain with the given
/// region and issues a single call. No retries beyond what the SDK
/// performs internally, and no caching: resolution happens once.
pub async fn fetch_bundle(region: &str, name: &str) -> Result<SecretBundle, SecretsError> {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&config);

    let output = client
        .get_secret_value()
        .secret_id(name)
        .send()
        .await
        .map_err(|err| classify(name, err))?;

    let payload = output
        .secret_string()
        .ok_or_else(|| SecretsError::InvalidPayload {
            name: name.to_string(),
            message: "bundle has no string payload".to_string(),
        })?;

    parse_bundle(name, payload)
}

/// Map an SDK error onto the recognized failure kinds.
///
/// Access-denied surfaces as an unmodelled service error, so both it
/// and not-found are matched by error code; everything else (timeouts,
/// DNS, credential resolution) counts as a network failure.
fn classify(name: &str, err: SdkError<GetSecretValueError>) -> SecretsError {
    match err.code() {
        Some("ResourceNotFoundException") => SecretsError::NotFound {
            name: name.to_string(),
        },
        Some("AccessDeniedException") => SecretsError::AccessDenied {
            name: name.to_string(),
            message: err.message().unwrap_or("access denied").to_string(),
        },
        _ => SecretsError::Network {
            message: format!("{}", DisplayErrorContext(err)),
        },
    }
}

/// Decode a bundle payload into key/value overrides.
///
/// Bundles are provisioned as flat JSON objects with string values;
/// anything else is rejected rather than partially applied.
fn parse_bundle(name: &str, payload: &str) -> Result<SecretBundle, SecretsError> {
    serde_json::from_str::<SecretBundle>(payload).map_err(|err| SecretsError::InvalidPayload {
        name: name.to_string(),
        message: err.to_string(),
    })
}
