use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressStyle};
use rme_job::{JobPhase, PhaseProgress, PhaseReport};

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

const fn phase_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Archiving => "archiving comments",
        JobPhase::Mutating => "editing comments",
        _ => "working",
    }
}

/// Terminal progress for the two long-running phases.
///
/// Archiving has no known length and shows a counting spinner; editing shows
/// a bar over the queued comments.
pub struct JobProgress {
    enabled: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl JobProgress {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: RefCell::new(None),
        }
    }
}

impl PhaseProgress for JobProgress {
    fn begin(&self, phase: JobPhase, total: Option<u64>) {
        if !self.enabled {
            return;
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(bar_template())
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.enable_steady_tick(std::time::Duration::from_millis(100));
                bar.set_style(
                    ProgressStyle::with_template("{spinner:.cyan} {pos} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(phase_label(phase));
        *self.bar.borrow_mut() = Some(bar);
    }

    fn advance(&self) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(1);
        }
    }

    fn end(&self, phase: JobPhase, report: &PhaseReport) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_with_message(format!(
                "{}: {} done, {} skipped, {} failed",
                phase_label(phase),
                report.processed,
                report.skipped,
                report.failed()
            ));
        }
    }
}
