//! Domain types shared across all Shopfront crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod catalog;
pub mod id;
pub mod pagination;
pub mod user;
