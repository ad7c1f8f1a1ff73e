//! Auth types shared across Shopfront crates.
//!
//! Provides JWT validation, cookie builders, and the role guards
//! (`verify_token`, `verify_admin`, `verify_user`) with the `AuthUser` extractor.

pub mod cookie;
pub mod guard;
pub mod token;
