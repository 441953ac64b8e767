//! Serverless entry point for `GET /hello`.

use std::sync::Arc;

use vercel_runtime::{run, Error, Request};

use hello_world_api::logging;
use hello_world_api::routes;
use hello_world_api::settings::Settings;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Arc::new(Settings::load().await);

    run(move |req: Request| {
        let settings = Arc::clone(&settings);
        async move {
            logging::with_request_logging(req, |req| routes::serve_hello(req, settings)).await
        }
    })
    .await
}
