//! # rme-job
//!
//! The job state and batch-processing engine behind `rme`.
//!
//! A job discovers every comment reachable through the four listing orders,
//! archives each body into a content-addressed workspace, and only after a
//! sanity check and an explicit confirmation rewrites the comments remotely.
//!
//! - [`merge`]: round-robin interleaving of overlapping listings
//! - [`archive`]: content-addressed body storage plus the durable id -> hash map
//! - [`whitelist`], [`redact`], [`template`]: per-comment text rules
//! - [`executor`]: the archive and mutate phases with per-comment isolation
//! - [`coordinator`]: the job state machine and its confirmation gate

pub mod archive;
pub mod confirm;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod merge;
pub mod progress;
pub mod redact;
pub mod template;
pub mod whitelist;

pub use archive::{ArchiveMap, ArchiveStore, FlushPolicy, content_hash};
pub use confirm::ConfirmationGate;
pub use coordinator::{JobCoordinator, JobOptions, JobPhase, JobSummary, SanityReport};
pub use error::JobError;
pub use executor::{BatchExecutor, FILLER_TEXT, PhaseReport, RecordFailure, RecordOutcome};
pub use merge::merge_round_robin;
pub use progress::{NoProgress, PhaseProgress};
pub use redact::{MENTION_PLACEHOLDER, redact_mentions};
pub use template::EditTemplate;
pub use whitelist::{SkipReason, WhitelistSpec};
