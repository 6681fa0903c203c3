//! Rust and Python-facing client library for the Aeternity Epoch HTTP API.
//!
//! Public API layers:
//! - [`models`]: validated, immutable models of the API resources.
//! - [`registry`]: closed name → constructor table of those models.
//! - [`ApiError`]: typed mapping of non-success HTTP responses.
//! - [`ApiClient`]/[`BlockingApiClient`]: generic JSON HTTP clients.
//! - [`EpochClient`]/[`BlockingEpochClient`]: `OpenAPI`-driven typed clients.
//! - [`Error`]: unified error type used by all clients.
//!
//! The `OpenAPI` operation catalog is generated at build time from
//! `openapi/swagger.json`.

mod blocking_client;
mod client;
mod error;
pub mod models;
mod openapi_client;
pub mod registry;

/// Generic blocking JSON REST client.
pub use blocking_client::BlockingApiClient;
/// Generic async JSON REST client.
pub use client::ApiClient;
/// Error types returned by models and clients.
pub use error::{ApiError, DecodeError, Error};
/// OpenAPI-backed typed operation clients.
///
/// See also [`BlockingEpochClient`] for the synchronous variant.
pub use openapi_client::{
    BlockingEpochClient, EpochClient, OperationDefinition, openapi_default_server_url,
};
pub use registry::{Model, ModelNotFound};

#[cfg(feature = "python")]
mod python;
