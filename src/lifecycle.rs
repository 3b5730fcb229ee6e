//! Setup/cleanup hooks around a batch of mapper or reducer invocations.
//!
//! A [`TaskScope`] is acquired when a worker starts on a partition and released
//! when it is done with it. Acquisition logs `setup`, release logs `cleanup`,
//! both inside a `task` span carrying the stage name and batch size. The scope
//! owns no data the mapper or reducer can see, so it cannot be used to carry
//! counts from one record (or key) to the next.

use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{info, info_span, warn};

/// Scoped guard for one partition batch of a stage.
///
/// Release happens through [`TaskScope::finish`] on the normal path. If the
/// guard is dropped without it (a panicking user function), `cleanup` is still
/// logged, at `warn`.
#[must_use = "dropping the scope immediately ends the task"]
pub struct TaskScope {
    started: Instant,
    finished: bool,
    _span: EnteredSpan,
}

impl TaskScope {
    /// Enter a task for `stage` over a batch of `records` inputs.
    pub fn enter(stage: &str, records: usize) -> Self {
        let span = info_span!("task", stage = %stage, records).entered();
        info!("setup");
        Self {
            started: Instant::now(),
            finished: false,
            _span: span,
        }
    }

    /// Release the scope after the batch produced `outputs` elements.
    pub fn finish(mut self, outputs: usize) {
        self.finished = true;
        info!(
            outputs,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "cleanup"
        );
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                elapsed_us = self.started.elapsed().as_micros() as u64,
                "cleanup (task aborted)"
            );
        }
    }
}
