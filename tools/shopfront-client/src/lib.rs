//! HTTP client for the Shopfront API.
//!
//! Session cookies live in the client's cookie jar. A 401 on any call other
//! than `/auth/refresh` triggers one silent refresh followed by one retry of
//! the original request.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, Scope};
pub use error::ClientError;
