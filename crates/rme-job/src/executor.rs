//! The archive and mutate phases.
//!
//! Both phases walk comments one at a time. A failure on one comment becomes a
//! [`RecordOutcome::Failed`] value, is logged, and the phase moves on; only the
//! final map flush can fail the archive phase as a whole.

use std::fmt;

use futures::{Stream, StreamExt};
use rme_core::{BodyFormat, CoreError, Record, RecordService};

use crate::archive::{ArchiveStore, FlushPolicy};
use crate::error::JobError;
use crate::progress::PhaseProgress;
use crate::redact::redact_mentions;
use crate::template::EditTemplate;
use crate::whitelist::{SkipReason, WhitelistSpec};

/// Text written by the first of two edits in double-edit mode.
pub const FILLER_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Sodales ut eu sem integer vitae justo eget magna fermentum.";

/// Best-effort identification of a comment that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub id: Option<String>,
    pub permalink: Option<String>,
    pub reason: String,
}

impl RecordFailure {
    fn for_record(record: &Record, reason: impl fmt::Display) -> Self {
        Self {
            id: Some(record.id.clone()),
            permalink: record.permalink.clone(),
            reason: reason.to_string(),
        }
    }

    fn unidentified(reason: impl fmt::Display) -> Self {
        Self {
            id: None,
            permalink: None,
            reason: reason.to_string(),
        }
    }

    /// Log as `Error <action> comment <id>, skipping - <permalink>`, dropping
    /// whatever part is unknown.
    fn log(&self, action: &str) {
        match (&self.id, &self.permalink) {
            (Some(id), Some(permalink)) => tracing::warn!(
                record_id = %id,
                reason = %self.reason,
                "Error {action} comment {id}, skipping - {permalink}"
            ),
            (Some(id), None) => tracing::warn!(
                record_id = %id,
                reason = %self.reason,
                "Error {action} comment {id}, skipping"
            ),
            _ => tracing::warn!(reason = %self.reason, "Error {action} comment, skipping"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Processed,
    Skipped(SkipReason),
    Failed(RecordFailure),
}

/// Per-phase tally of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseReport {
    pub processed: usize,
    pub skipped: usize,
    pub failures: Vec<RecordFailure>,
}

impl PhaseReport {
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.skipped + self.failures.len()
    }

    fn tally(&mut self, outcome: RecordOutcome, action: &str) {
        match outcome {
            RecordOutcome::Processed => self.processed += 1,
            RecordOutcome::Skipped(reason) => {
                tracing::trace!(%reason, "skipped comment");
                self.skipped += 1;
            }
            RecordOutcome::Failed(failure) => {
                failure.log(action);
                self.failures.push(failure);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchExecutor {
    pub whitelist: WhitelistSpec,
    pub format: BodyFormat,
    pub remove_mentions: bool,
    pub flush_interval: u32,
    pub template: EditTemplate,
    pub edit_twice: bool,
}

impl BatchExecutor {
    /// Archive every comment of `records` not yet archived and not whitelisted.
    ///
    /// Archived comments are appended to `queue` in discovery order. The map
    /// is flushed every `flush_interval` archived comments and once more at
    /// the end.
    ///
    /// # Errors
    ///
    /// Only the final flush is fatal; per-comment failures land in the report.
    pub async fn archive_phase<St>(
        &self,
        records: St,
        store: &mut ArchiveStore,
        queue: &mut Vec<Record>,
        progress: &dyn PhaseProgress,
    ) -> Result<PhaseReport, JobError>
    where
        St: Stream<Item = Result<Record, CoreError>>,
    {
        let mut records = std::pin::pin!(records);
        let mut policy = FlushPolicy::every(self.flush_interval);
        let mut report = PhaseReport::default();

        while let Some(item) = records.next().await {
            let outcome = match item {
                Ok(record) => self.archive_record(record, store, queue, &mut policy),
                Err(error) => RecordOutcome::Failed(RecordFailure::unidentified(error)),
            };
            report.tally(outcome, "parsing");
            progress.advance();
        }

        store.final_flush()?;
        Ok(report)
    }

    fn archive_record(
        &self,
        record: Record,
        store: &mut ArchiveStore,
        queue: &mut Vec<Record>,
        policy: &mut FlushPolicy,
    ) -> RecordOutcome {
        if let Some(reason) = self.skip_reason(&record, store) {
            return RecordOutcome::Skipped(reason);
        }

        let body = self.prepare_body(&record);
        if let Err(error) = store.archive(&record.id, &body) {
            return RecordOutcome::Failed(RecordFailure::for_record(&record, error));
        }
        queue.push(record);

        if policy.record_archived()
            && let Err(error) = store.flush()
        {
            tracing::warn!(%error, "failed to flush archive map; retrying at the next interval");
        }
        RecordOutcome::Processed
    }

    fn skip_reason(&self, record: &Record, store: &ArchiveStore) -> Option<SkipReason> {
        if store.has(&record.id) {
            return Some(SkipReason::AlreadyArchived);
        }
        self.whitelist.matches(record)
    }

    /// Body in the configured format, with mentions redacted if enabled.
    #[must_use]
    pub fn prepare_body(&self, record: &Record) -> String {
        let body = record.body_for(self.format);
        if self.remove_mentions {
            redact_mentions(body).into_owned()
        } else {
            body.to_string()
        }
    }

    /// Edit every queued comment with the rendered template.
    ///
    /// Failures are isolated per comment; an edit that went through is never
    /// retried or rolled back.
    pub async fn mutate_phase<S>(
        &self,
        service: &S,
        queue: &[Record],
        store: &ArchiveStore,
        progress: &dyn PhaseProgress,
    ) -> PhaseReport
    where
        S: RecordService,
    {
        let mut report = PhaseReport::default();
        for record in queue {
            let outcome = match self.mutate_record(service, record, store).await {
                Ok(()) => RecordOutcome::Processed,
                Err(error) => RecordOutcome::Failed(RecordFailure::for_record(record, error)),
            };
            report.tally(outcome, "editing");
            progress.advance();
        }
        report
    }

    async fn mutate_record<S>(
        &self,
        service: &S,
        record: &Record,
        store: &ArchiveStore,
    ) -> Result<(), JobError>
    where
        S: RecordService,
    {
        let hash = store
            .hash_of(&record.id)
            .ok_or_else(|| JobError::MissingHash(record.id.clone()))?;
        let replacement = self.template.render(&record.id, hash);

        if self.edit_twice {
            service.edit(record, FILLER_TEXT).await?;
        }
        service.edit(record, &replacement).await?;
        Ok(())
    }
}
