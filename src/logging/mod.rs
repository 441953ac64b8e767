//! Tracing setup and per-request logging.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// An explicit `RUST_LOG` wins over the resolved `LOG_LEVEL`
/// directive. Safe to call more than once; only the first call
/// installs anything.
pub fn init(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Wrap a request handler with start/completion logging.
///
/// Emits one info line when the request starts (method, path) and
/// exactly one line when it finishes: info with the status code and
/// elapsed time on success, error with the elapsed time on failure.
/// Errors pass through unchanged; the wrapper only observes.
///
/// Generic over the `http` body types so the serverless handlers and
/// the local development server share it.
pub async fn with_request_logging<ReqBody, RespBody, Err, Handler, Fut>(
    req: http::Request<ReqBody>,
    handler: Handler,
) -> Result<http::Response<RespBody>, Err>
where
    Handler: FnOnce(http::Request<ReqBody>) -> Fut,
    Fut: Future<Output = Result<http::Response<RespBody>, Err>>,
    Err: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    tracing::info!(%method, %path, "request started");

    let started = Instant::now();
    match handler(req).await {
        Ok(response) => {
            tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request completed"
            );
            Ok(response)
        }
        Err(err) => {
            tracing::error!(
                %method,
                %path,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "request failed"
            );
            Err(err)
        }
    }
}
