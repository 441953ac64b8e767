//! Route logic for the two endpoints.
//!
//! The payload builders are pure functions of the resolved
//! [`Settings`]; the serverless handlers in `api/` and the local
//! development router both serialize the same payloads.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vercel_runtime::{Body, Error, Request, Response, StatusCode};

use crate::logging;
use crate::models::response::{ErrorResponse, HelloResponse, RootResponse};
use crate::settings::Settings;

/// Fixed service identifier returned by `GET /hello`.
pub const SERVICE_NAME: &str = "hello-world-api";

/// Fixed implementation stack string returned by `GET /hello`.
pub const POWERED_BY: &str = "Rust on Vercel";

/// Description of the `/hello` route advertised by `GET /`.
const HELLO_DESCRIPTION: &str = "Returns a hello world message";

/// Build the `GET /` payload: a welcome message and the route index.
pub fn root(settings: &Settings) -> RootResponse {
    let mut endpoints = BTreeMap::new();
    endpoints.insert("/hello".to_string(), HELLO_DESCRIPTION.to_string());

    RootResponse {
        message: format!(
            "Welcome to the {} ({} environment)",
            settings.api_title, settings.environment
        ),
        endpoints,
    }
}

/// Build the `GET /hello` payload.
pub fn hello(settings: &Settings) -> HelloResponse {
    HelloResponse {
        message: format!("Hello World from {} environment!", settings.environment),
        service: SERVICE_NAME.to_string(),
        powered_by: POWERED_BY.to_string(),
    }
}

/// `GET /` serverless handler body.
pub async fn serve_root(req: Request, settings: Arc<Settings>) -> Result<Response<Body>, Error> {
    if *req.method() != http::Method::GET {
        return method_not_allowed("/");
    }
    json_response(StatusCode::OK, &root(&settings))
}

/// `GET /hello` serverless handler body.
pub async fn serve_hello(req: Request, settings: Arc<Settings>) -> Result<Response<Body>, Error> {
    if *req.method() != http::Method::GET {
        return method_not_allowed("/hello");
    }
    json_response(StatusCode::OK, &hello(&settings))
}

/// Serialize a payload into a JSON response.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(serde_json::to_string(payload)?))?)
}

/// Both routes are read-only.
fn method_not_allowed_body(route: &str) -> ErrorResponse {
    ErrorResponse {
        error: "Method not allowed".to_string(),
        message: format!("Use GET to call {route}"),
    }
}

fn method_not_allowed(route: &str) -> Result<Response<Body>, Error> {
    json_response(StatusCode::METHOD_NOT_ALLOWED, &method_not_allowed_body(route))
}

/// Router for the local development server and integration tests.
///
/// Serves the same payloads as the serverless handlers, with the
/// request logging wrapper attached as middleware and the same 405
/// body for non-GET methods.
pub fn router(settings: Arc<Settings>) -> axum::Router {
    axum::Router::new()
        .route(
            "/",
            axum::routing::get(root_handler).fallback(method_fallback),
        )
        .route(
            "/hello",
            axum::routing::get(hello_handler).fallback(method_fallback),
        )
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(settings)
}

async fn root_handler(State(settings): State<Arc<Settings>>) -> Json<RootResponse> {
    Json(root(&settings))
}

async fn hello_handler(State(settings): State<Arc<Settings>>) -> Json<HelloResponse> {
    Json(hello(&settings))
}

/// Unmatched methods on a known route get the same error body as the
/// serverless handlers.
async fn method_fallback(uri: http::Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(method_not_allowed_body(uri.path())),
    )
}

/// Bridge the shared logging wrapper into axum middleware. Handler
/// panics are left to the framework; the wrapper only sees responses.
async fn log_requests(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let result = logging::with_request_logging(req, |req| async move {
        Ok::<_, std::convert::Infallible>(next.run(req).await)
    })
    .await;

    match result {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
