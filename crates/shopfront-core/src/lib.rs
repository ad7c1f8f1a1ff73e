//! Cross-cutting plumbing shared by Shopfront services: response envelope,
//! error bodies, tracing, health checks, request ids and query helpers.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
