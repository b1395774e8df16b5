//! Trailing-edge debouncing on top of a [`TaskScheduler`]
//!
//! Each trigger cancels the pending run and schedules a new one `wait_ms`
//! later, so a burst of triggers results in a single run once the burst has
//! been quiet for `wait_ms`.

use std::fmt;

use crate::scheduler::{Task, TaskScheduler};

/// Trailing-edge debouncer
pub struct Debouncer<H> {
    wait_ms: u32,
    pending: Option<H>,
}

impl<H: Copy> Debouncer<H> {
    /// Create a debouncer with the given quiet window
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    /// Quiet window in milliseconds
    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    /// Replace any pending run with `task`, due `wait_ms` from now
    pub fn trigger<C, S>(&mut self, scheduler: &mut S, task: Task<C>) -> H
    where
        S: TaskScheduler<C, Handle = H>,
    {
        if let Some(pending) = self.pending.take() {
            scheduler.cancel(pending);
        }
        let handle = scheduler.schedule(self.wait_ms, task);
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending run, if any
    pub fn cancel<C, S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TaskScheduler<C, Handle = H>,
    {
        self.pending
            .take()
            .is_some_and(|pending| scheduler.cancel(pending))
    }
}

impl<H> fmt::Debug for Debouncer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait_ms", &self.wait_ms)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
