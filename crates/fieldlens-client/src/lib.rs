//! Client library for the FieldLens analysis service.
//!
//! [`HttpEndpoint`] performs single `POST /analyze` calls; [`RetryingTransport`]
//! turns them into one logical request with rate-limit backoff and timeout
//! retries, folding every fault into a [`fieldlens_core::FailureReason`].

pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;

pub use endpoint::{Endpoint, EndpointResponse};
pub use error::CallError;
pub use http::HttpEndpoint;
pub use transport::{RetryState, RetryingTransport};
