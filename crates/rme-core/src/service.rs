//! Capability traits for the remote record service.
//!
//! The job engine only talks to the remote platform through these traits, so
//! tests can substitute scripted implementations for the network client.

use std::future::Future;

use futures::stream::BoxStream;

use crate::errors::CoreError;
use crate::ids::JobId;
use crate::record::{ListingOrder, Record};

/// Lazy, possibly unbounded sequence of records from one listing.
///
/// An `Err` item reports a failed page; implementations end the stream after it.
pub type RecordStream<'a> = BoxStream<'a, Result<Record, CoreError>>;

/// An authenticated session against the remote service.
pub trait RecordService: Send + Sync {
    /// Name of the authenticated user.
    fn current_user(&self) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// All comments of `user` in the given sort order, fetched page by page
    /// as the stream is polled.
    fn list_comments<'a>(&'a self, user: &'a str, order: ListingOrder) -> RecordStream<'a>;

    /// Replace the body of `record` with `text`.
    fn edit(&self, record: &Record, text: &str)
    -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Produces an authenticated [`RecordService`] session for a job.
pub trait Authenticator {
    type Session: RecordService;

    fn authenticate(
        self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<Self::Session, CoreError>> + Send;
}
