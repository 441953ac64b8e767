//! Local development server.
//!
//! Serves the same routes as the serverless functions on a fixed
//! local address, for interactive testing only. Pair with `cargo
//! watch` to recompile on change:
//!
//! ```text
//! cargo watch -x 'run --bin dev_server'
//! ```

use std::sync::Arc;

use anyhow::Context;

use hello_world_api::routes;
use hello_world_api::settings::Settings;

const BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::load().await);

    let app = routes::router(settings);
    let listener = tokio::net::TcpListener::bind(BIND_ADDR)
        .await
        .with_context(|| format!("failed to bind to {BIND_ADDR}"))?;
    tracing::info!(addr = BIND_ADDR, "listening for HTTP traffic");

    axum::serve(listener, app).await?;

    Ok(())
}
