//! Test utilities for Shopfront services.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
