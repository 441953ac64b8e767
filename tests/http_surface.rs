//! End-to-end tests for the HTTP surface, driven through the
//! development router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt; // for oneshot

use hello_world_api::routes;
use hello_world_api::secrets::SecretsError;
use hello_world_api::settings::{Resolver, Settings, KEY_ENVIRONMENT};

fn settings_for(environment: &str) -> Settings {
    let mut resolver = Resolver::from_defaults();
    resolver.overlay([(KEY_ENVIRONMENT, environment)]);
    resolver.finish()
}

async fn get(app: axum::Router, path: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_root_returns_welcome_with_environment() {
    let app = routes::router(Arc::new(settings_for("development")));
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("development"));
    assert_eq!(json["endpoints"]["/hello"], "Returns a hello world message");
}

#[tokio::test]
async fn test_hello_returns_fixed_identifiers() {
    let app = routes::router(Arc::new(settings_for("development")));
    let (status, body) = get(app, "/hello").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("development"));
    assert_eq!(json["service"], "hello-world-api");
    assert_eq!(json["powered_by"], "Rust on Vercel");
}

#[tokio::test]
async fn test_repeated_requests_return_identical_bytes() {
    let app = routes::router(Arc::new(settings_for("development")));

    for path in ["/", "/hello"] {
        let (_, first) = get(app.clone(), path).await;
        let (_, second) = get(app.clone(), path).await;
        assert_eq!(first, second, "{path} responses should be byte-identical");
    }
}

#[tokio::test]
async fn test_staging_override_is_reflected_in_both_routes() {
    let app = routes::router(Arc::new(settings_for("staging")));

    for path in ["/", "/hello"] {
        let (status, body) = get(app.clone(), path).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            json["message"].as_str().unwrap().contains("staging"),
            "{path} should reflect the overridden environment"
        );
    }
}

#[tokio::test]
async fn test_non_get_requests_get_the_shared_error_body() {
    let app = routes::router(Arc::new(settings_for("development")));

    for (method, path) in [("POST", "/"), ("PUT", "/hello"), ("DELETE", "/hello")] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Method not allowed");
        assert!(
            json["message"].as_str().unwrap().contains(path),
            "{method} {path} should get the shared error body"
        );
    }
}

#[tokio::test]
async fn test_routes_still_respond_after_failed_secret_fetch() {
    let failures = [
        SecretsError::AccessDenied {
            name: "hello-world-api/development".to_string(),
            message: "no permission".to_string(),
        },
        SecretsError::NotFound {
            name: "hello-world-api/development".to_string(),
        },
        SecretsError::Network {
            message: "connection timed out".to_string(),
        },
    ];

    for failure in failures {
        let mut resolver = Resolver::from_defaults();
        resolver.apply_secret_bundle(Err(failure));
        let app = routes::router(Arc::new(resolver.finish()));

        for path in ["/", "/hello"] {
            let (status, _) = get(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}
