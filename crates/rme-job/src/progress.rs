use crate::coordinator::JobPhase;
use crate::executor::PhaseReport;

/// Observer for phase progress. The engine never renders anything itself.
pub trait PhaseProgress {
    /// A phase started; `total` is `None` while the length is unknown.
    fn begin(&self, _phase: JobPhase, _total: Option<u64>) {}

    /// One comment was handled, whatever its outcome.
    fn advance(&self) {}

    fn end(&self, _phase: JobPhase, _report: &PhaseReport) {}
}

/// Discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl PhaseProgress for NoProgress {}
