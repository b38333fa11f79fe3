//! Shared domain primitives for the threat-intel pipeline functions.
//!
//! This crate owns configuration parsing, feed record handling, dependency
//! bundle layout and the provisioning callback contract. It intentionally
//! excludes AWS SDK, database driver and Lambda runtime concerns.

pub mod config;
pub mod feed;
pub mod layer;
pub mod provisioning;
