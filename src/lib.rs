/// Hello World API shared library.
///
/// This crate contains the configuration resolver, the secret bundle
/// client, the response payloads, and the request logging shared
/// across all API handlers.
///
/// Each serverless function in `api/` imports from this library
/// to keep handlers thin and logic reusable.
pub mod logging;
pub mod models;
pub mod routes;
pub mod secrets;
pub mod settings;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
