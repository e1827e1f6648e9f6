//! HTTP client for the sourcing backend's REST contracts.

mod http;
pub use http::{ApiClient, ApiError};
