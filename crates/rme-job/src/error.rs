use std::path::PathBuf;

use rme_core::CoreError;
use thiserror::Error;

use crate::coordinator::JobPhase;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to create job workspace {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive map encoding error: {0}")]
    MapEncoding(#[from] serde_json::Error),

    #[error("comment {0} is already archived in this job")]
    AlreadyArchived(String),

    #[error("comment {0} is queued but has no archived hash")]
    MissingHash(String),

    #[error("invalid whitelist regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid credentials. If you have 2FA enabled, you must use --oauth. ({0})")]
    Authentication(#[source] CoreError),

    #[error(
        "Sanity check failed, the number of comments in the map file ({persisted}) does not match the number of comments to edit ({queued})"
    )]
    SanityCheck { persisted: usize, queued: usize },

    #[error("edit cancelled at confirmation")]
    Declined,

    #[error("confirmation prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("job cannot move from {from} to {to}")]
    InvalidTransition { from: JobPhase, to: JobPhase },

    #[error(transparent)]
    Remote(#[from] CoreError),
}
