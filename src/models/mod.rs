//! Response payloads for the HTTP surface.
//!
//! These types are shared between the serverless handlers and the
//! local development server.

pub mod response;
