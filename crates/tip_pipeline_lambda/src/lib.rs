//! AWS-oriented adapters and handlers for the threat-intel pipeline functions.
//!
//! This crate owns runtime integration details (Lambda handlers, the feed and
//! trust-bundle HTTP clients, the document store session, object storage and
//! the provisioning callback) on top of the primitives in `tip_pipeline_core`.

pub mod adapters;
pub mod archive;
pub mod handlers;
pub mod logging;
