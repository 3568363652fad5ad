//! # rme-core
//!
//! Core types and error types for RedditMirrorEdit.
//!
//! This crate provides the foundational types shared across all crates:
//! - The read-only `Record` value fetched from the remote service
//! - Listing orders and body formats
//! - Job identifiers
//! - The `RecordService` / `Authenticator` capability traits that decouple
//!   the job engine from the real network client
//! - Cross-cutting error types

pub mod errors;
pub mod ids;
pub mod record;
pub mod service;

pub use errors::CoreError;
pub use ids::JobId;
pub use record::{BodyFormat, ListingOrder, Record};
pub use service::{Authenticator, RecordService, RecordStream};
