use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Payload for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootResponse {
    /// Welcome message naming the API and the resolved environment.
    pub message: String,
    /// Advertised routes and what they return. Ordered map, so
    /// repeated responses serialize to identical bytes.
    pub endpoints: BTreeMap<String, String>,
}

/// Payload for `GET /hello`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelloResponse {
    /// Greeting naming the resolved environment.
    pub message: String,
    /// Fixed service identifier.
    pub service: String,
    /// Fixed implementation stack string.
    pub powered_by: String,
}

/// Body returned for rejected requests, e.g. a non-GET method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error label.
    pub error: String,
    /// Human-readable explanation.
    pub message: String,
}
