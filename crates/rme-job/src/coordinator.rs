//! The job state machine.
//!
//! ```text
//! Init -> Authenticating -> Archiving -> SanityCheck -> ConfirmOrAbort -> Mutating -> Done
//! ```
//!
//! Every step checks that it follows the previous one. A fatal error moves
//! the job to `Aborted`, from which no further step is accepted, so the edit
//! phase is unreachable unless the sanity check and confirmation passed.

use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use rme_core::{Authenticator, BodyFormat, JobId, ListingOrder, Record, RecordService};

use crate::archive::ArchiveStore;
use crate::confirm::ConfirmationGate;
use crate::error::JobError;
use crate::executor::{BatchExecutor, PhaseReport};
use crate::merge::merge_round_robin;
use crate::progress::PhaseProgress;
use crate::template::EditTemplate;
use crate::whitelist::WhitelistSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Init,
    Authenticating,
    Archiving,
    SanityCheck,
    ConfirmOrAbort,
    Mutating,
    Done,
    Aborted,
}

impl JobPhase {
    /// The phase allowed to follow this one.
    const fn successor(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Authenticating),
            Self::Authenticating => Some(Self::Archiving),
            Self::Archiving => Some(Self::SanityCheck),
            Self::SanityCheck => Some(Self::ConfirmOrAbort),
            Self::ConfirmOrAbort => Some(Self::Mutating),
            Self::Mutating => Some(Self::Done),
            Self::Done | Self::Aborted => None,
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Authenticating => "authenticating",
            Self::Archiving => "archiving",
            Self::SanityCheck => "sanity-check",
            Self::ConfirmOrAbort => "confirm",
            Self::Mutating => "mutating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Everything a job needs besides the remote service.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Parent directory of all job workspaces.
    pub jobs_dir: PathBuf,
    pub template: EditTemplate,
    pub whitelist: WhitelistSpec,
    pub format: BodyFormat,
    pub remove_mentions: bool,
    /// Flush the map every N archived comments; 0 flushes only at the end.
    pub flush_interval: u32,
    pub edit_twice: bool,
    pub skip_confirmation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanityReport {
    pub queued: usize,
    pub persisted: usize,
    pub unique_hashes: usize,
}

#[derive(Debug, Clone)]
pub struct JobSummary {
    pub job_id: JobId,
    pub workspace: PathBuf,
    pub sanity: SanityReport,
    pub archive: PhaseReport,
    pub mutate: PhaseReport,
}

pub struct JobCoordinator {
    id: JobId,
    workspace: PathBuf,
    phase: JobPhase,
    user: Option<String>,
    store: ArchiveStore,
    queue: Vec<Record>,
    executor: BatchExecutor,
    skip_confirmation: bool,
}

impl JobCoordinator {
    /// Init: generate a job id and create its workspace under `jobs_dir`.
    ///
    /// The workspace directory must not exist yet; jobs are never reused.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Workspace` if a directory cannot be created.
    pub fn create(options: JobOptions) -> Result<Self, JobError> {
        let id = JobId::generate();
        fs::create_dir_all(&options.jobs_dir).map_err(|source| JobError::Workspace {
            path: options.jobs_dir.clone(),
            source,
        })?;

        let workspace = options.jobs_dir.join(id.to_string());
        fs::create_dir(&workspace).map_err(|source| JobError::Workspace {
            path: workspace.clone(),
            source,
        })?;
        tracing::info!(job_id = %id, workspace = %workspace.display(), "created job workspace");

        Ok(Self {
            id,
            store: ArchiveStore::open(&workspace, options.format),
            workspace,
            phase: JobPhase::Init,
            user: None,
            queue: Vec::new(),
            executor: BatchExecutor {
                whitelist: options.whitelist,
                format: options.format,
                remove_mentions: options.remove_mentions,
                flush_interval: options.flush_interval,
                template: options.template,
                edit_twice: options.edit_twice,
            },
            skip_confirmation: options.skip_confirmation,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    #[must_use]
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    #[must_use]
    pub const fn phase(&self) -> JobPhase {
        self.phase
    }

    #[must_use]
    pub fn queued(&self) -> &[Record] {
        &self.queue
    }

    #[must_use]
    pub const fn store(&self) -> &ArchiveStore {
        &self.store
    }

    fn enter(&mut self, next: JobPhase) -> Result<(), JobError> {
        if self.phase.successor() != Some(next) {
            return Err(JobError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(job_id = %self.id, from = %self.phase, to = %next, "job phase");
        self.phase = next;
        Ok(())
    }

    fn abort<T>(&mut self, error: JobError) -> Result<T, JobError> {
        tracing::error!(job_id = %self.id, phase = %self.phase, %error, "job aborted");
        self.phase = JobPhase::Aborted;
        Err(error)
    }

    /// Authenticating: obtain a session and resolve the current user.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Authentication` and aborts the job if either fails.
    pub async fn authenticate<A>(&mut self, authenticator: A) -> Result<A::Session, JobError>
    where
        A: Authenticator,
    {
        self.enter(JobPhase::Authenticating)?;

        let session = match authenticator.authenticate(&self.id).await {
            Ok(session) => session,
            Err(error) => return self.abort(JobError::Authentication(error)),
        };
        match session.current_user().await {
            Ok(user) => {
                tracing::info!(job_id = %self.id, %user, "authenticated");
                self.user = Some(user);
                Ok(session)
            }
            Err(error) => self.abort(JobError::Authentication(error)),
        }
    }

    /// Archiving: walk the merged listings and archive every eligible comment.
    ///
    /// # Errors
    ///
    /// Aborts the job if the final map flush fails.
    pub async fn archive<S>(
        &mut self,
        service: &S,
        progress: &dyn PhaseProgress,
    ) -> Result<PhaseReport, JobError>
    where
        S: RecordService,
    {
        self.enter(JobPhase::Archiving)?;
        let user = self.user.clone().unwrap_or_default();

        let listings: Vec<_> = ListingOrder::ALL
            .iter()
            .map(|order| service.list_comments(&user, *order))
            .collect();

        progress.begin(JobPhase::Archiving, None);
        let result = self
            .executor
            .archive_phase(
                merge_round_robin(listings),
                &mut self.store,
                &mut self.queue,
                progress,
            )
            .await;

        match result {
            Ok(report) => {
                progress.end(JobPhase::Archiving, &report);
                tracing::info!(
                    job_id = %self.id,
                    archived = report.processed,
                    skipped = report.skipped,
                    failed = report.failed(),
                    "archive phase finished"
                );
                Ok(report)
            }
            Err(error) => self.abort(error),
        }
    }

    /// SanityCheck: the persisted map must hold exactly one entry per queued comment.
    ///
    /// # Errors
    ///
    /// Returns `JobError::SanityCheck` and aborts the job on a mismatch.
    pub fn sanity_check(&mut self) -> Result<SanityReport, JobError> {
        self.enter(JobPhase::SanityCheck)?;

        let persisted = match self.store.load_persisted() {
            Ok(map) => map,
            Err(error) => return self.abort(error),
        };
        let report = SanityReport {
            queued: self.queue.len(),
            persisted: persisted.len(),
            unique_hashes: self.store.unique_hashes(),
        };

        if report.persisted != report.queued {
            return self.abort(JobError::SanityCheck {
                persisted: report.persisted,
                queued: report.queued,
            });
        }
        Ok(report)
    }

    /// ConfirmOrAbort: ask the operator unless confirmation is skipped.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Declined` (or `Prompt`) and aborts the job.
    pub fn confirm<R, W>(&mut self, gate: &mut ConfirmationGate<R, W>) -> Result<(), JobError>
    where
        R: BufRead,
        W: Write,
    {
        self.enter(JobPhase::ConfirmOrAbort)?;
        if self.skip_confirmation {
            return Ok(());
        }

        let outcome = gate.ask(
            self.queue.len(),
            self.store.unique_hashes(),
            &self.workspace,
        );
        match outcome {
            Ok(()) => Ok(()),
            Err(error) => self.abort(error),
        }
    }

    /// Mutating: edit every queued comment.
    ///
    /// # Errors
    ///
    /// Only `JobError::InvalidTransition`; edit failures are per comment.
    pub async fn mutate<S>(
        &mut self,
        service: &S,
        progress: &dyn PhaseProgress,
    ) -> Result<PhaseReport, JobError>
    where
        S: RecordService,
    {
        self.enter(JobPhase::Mutating)?;

        progress.begin(JobPhase::Mutating, Some(self.queue.len() as u64));
        let report = self
            .executor
            .mutate_phase(service, &self.queue, &self.store, progress)
            .await;
        progress.end(JobPhase::Mutating, &report);

        tracing::info!(
            job_id = %self.id,
            edited = report.processed,
            failed = report.failed(),
            "mutate phase finished"
        );
        self.enter(JobPhase::Done)?;
        Ok(report)
    }

    /// Run every phase in order.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal error; the workspace is left in place.
    pub async fn run<A, R, W>(
        mut self,
        authenticator: A,
        gate: &mut ConfirmationGate<R, W>,
        progress: &dyn PhaseProgress,
    ) -> Result<JobSummary, JobError>
    where
        A: Authenticator,
        R: BufRead,
        W: Write,
    {
        let session = self.authenticate(authenticator).await?;
        let archive = self.archive(&session, progress).await?;
        let sanity = self.sanity_check()?;
        self.confirm(gate)?;
        let mutate = self.mutate(&session, progress).await?;

        Ok(JobSummary {
            job_id: self.id,
            workspace: self.workspace,
            sanity,
            archive,
            mutate,
        })
    }
}
