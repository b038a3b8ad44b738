//! Single-slot cancelable delayed task
//!
//! Holds at most one scheduled task. Posting again, or cancelling, bumps a
//! generation counter; a task that fires with an outdated generation does
//! nothing, so a stale timer can never act on newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::scheduler::{AnimationScheduler, TaskId};

#[derive(Debug, Default)]
pub struct CancelableTask {
    generation: Arc<AtomicU64>,
    task: Option<TaskId>,
}

impl CancelableTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `f` after `delay_ms`, replacing any pending task
    pub fn post<F>(&mut self, scheduler: &mut AnimationScheduler, delay_ms: u64, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel(scheduler);
        let expected = self.generation.load(Ordering::Acquire);
        let generation = Arc::clone(&self.generation);
        let id = scheduler.post_delayed_task(delay_ms, move || {
            if generation.load(Ordering::Acquire) == expected {
                f();
            }
        });
        self.task = Some(id);
    }

    /// Cancel the pending task, if any. Safe to call repeatedly.
    pub fn cancel(&mut self, scheduler: &mut AnimationScheduler) {
        self.invalidate();
        if let Some(id) = self.task.take() {
            scheduler.cancel_task(id);
        }
    }

    /// Make any issued task a no-op without touching the scheduler
    ///
    /// Used when the scheduler is no longer reachable.
    pub fn invalidate(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_pending(&self, scheduler: &AnimationScheduler) -> bool {
        self.task.is_some_and(|id| scheduler.is_task_pending(id))
    }
}
