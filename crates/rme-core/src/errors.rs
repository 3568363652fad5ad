//! Cross-cutting error types for RedditMirrorEdit.
//!
//! Errors raised by a remote record service implementation are reported as
//! `CoreError`. Job-level errors (`JobError`) and authorization errors
//! (`AuthError`) live in their respective crates and converge into `anyhow`
//! in the `rme` binary.

use thiserror::Error;

use crate::record::ListingOrder;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Credentials were rejected or the session could not be established.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A listing page could not be fetched or decoded.
    #[error("failed to list {order} comments: {message}")]
    Listing { order: ListingOrder, message: String },

    /// The remote service refused or failed an edit.
    #[error("failed to edit comment {id}: {message}")]
    Edit { id: String, message: String },

    /// Network or protocol failure talking to the remote service.
    #[error("transport error: {0}")]
    Transport(String),
}
