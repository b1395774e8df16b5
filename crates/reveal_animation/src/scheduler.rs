//! Delayed task scheduling
//!
//! Every delay in Reveal goes through [`TaskScheduler`]: schedule a task to
//! run `delay_ms` from now, or cancel it before it fires. The browser backend
//! maps this onto `setTimeout`; [`TimerQueue`] is a virtual-clock
//! implementation that fires tasks only when explicitly advanced, which makes
//! timing fully deterministic in tests.
//!
//! Tasks receive the context they mutate (the page) by `&mut`, so a queue
//! never holds a borrow of the page between firings.

use std::collections::BTreeMap;
use std::fmt;

use slotmap::{new_key_type, SlotMap};

/// A deferred mutation of context `C`
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Capability to run tasks after a delay
pub trait TaskScheduler<C> {
    /// Handle returned by [`schedule`](Self::schedule), used to cancel
    type Handle: Copy + Eq + fmt::Debug;

    /// Run `task` once, `delay_ms` milliseconds from now
    ///
    /// Tasks with equal fire times run in scheduling order.
    fn schedule(&mut self, delay_ms: u32, task: Task<C>) -> Self::Handle;

    /// Cancel a pending task
    ///
    /// Returns `false` if the task already ran or was already cancelled.
    fn cancel(&mut self, handle: Self::Handle) -> bool;
}

new_key_type! {
    /// Handle to a task scheduled on a [`TimerQueue`]
    pub struct TimerId;
}

struct PendingTimer<C> {
    fire_at: u64,
    seq: u64,
    task: Task<C>,
}

/// Virtual-clock timer queue
///
/// Time starts at zero and only moves when [`advance_to`](Self::advance_to)
/// or [`advance_by`](Self::advance_by) is called. Due tasks run in
/// (fire time, scheduling sequence) order.
pub struct TimerQueue<C> {
    now_ms: u64,
    seq: u64,
    timers: SlotMap<TimerId, PendingTimer<C>>,
    order: BTreeMap<(u64, u64), TimerId>,
}

impl<C> TimerQueue<C> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            timers: SlotMap::with_key(),
            order: BTreeMap::new(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of tasks waiting to fire
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Whether a task is still waiting to fire
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Fire time of the earliest pending task
    pub fn next_deadline(&self) -> Option<u64> {
        self.order.first_key_value().map(|(&(fire_at, _), _)| fire_at)
    }

    /// Advance the clock to `target_ms`, running every task due by then
    ///
    /// Moving backwards is a no-op. Returns the number of tasks run.
    pub fn advance_to(&mut self, target_ms: u64, ctx: &mut C) -> usize {
        let mut fired = 0;
        while let Some((&(fire_at, seq), &id)) = self.order.first_key_value() {
            if fire_at > target_ms {
                break;
            }
            self.order.remove(&(fire_at, seq));
            let Some(timer) = self.timers.remove(id) else {
                continue;
            };
            self.now_ms = self.now_ms.max(fire_at);
            tracing::trace!(at = fire_at, "timer fired");
            (timer.task)(ctx);
            fired += 1;
        }
        self.now_ms = self.now_ms.max(target_ms);
        fired
    }

    /// Advance the clock by `delta_ms`
    pub fn advance_by(&mut self, delta_ms: u64, ctx: &mut C) -> usize {
        let target = self.now_ms.saturating_add(delta_ms);
        self.advance_to(target, ctx)
    }

    /// Run every pending task, advancing the clock to the last fire time
    pub fn run_until_idle(&mut self, ctx: &mut C) -> usize {
        match self.order.last_key_value() {
            Some((&(last, _), _)) => self.advance_to(last, ctx),
            None => 0,
        }
    }
}

impl<C> Default for TimerQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskScheduler<C> for TimerQueue<C> {
    type Handle = TimerId;

    fn schedule(&mut self, delay_ms: u32, task: Task<C>) -> TimerId {
        let fire_at = self.now_ms.saturating_add(u64::from(delay_ms));
        let seq = self.seq;
        self.seq += 1;
        let id = self.timers.insert(PendingTimer { fire_at, seq, task });
        self.order.insert((fire_at, seq), id);
        id
    }

    fn cancel(&mut self, handle: TimerId) -> bool {
        match self.timers.remove(handle) {
            Some(timer) => {
                self.order.remove(&(timer.fire_at, timer.seq));
                true
            }
            None => false,
        }
    }
}

impl<C> fmt::Debug for TimerQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<&'static str>;

    fn push(queue: &mut TimerQueue<Log>, delay: u32, label: &'static str) -> TimerId {
        queue.schedule(delay, Box::new(move |log: &mut Log| log.push(label)))
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        push(&mut queue, 200, "c");
        push(&mut queue, 0, "a");
        push(&mut queue, 100, "b");

        assert_eq!(queue.advance_to(150, &mut log), 2);
        assert_eq!(log, vec!["a", "b"]);
        assert_eq!(queue.now(), 150);

        queue.advance_by(50, &mut log);
        assert_eq!(log, vec!["a", "b", "c"]);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_equal_deadlines_keep_scheduling_order() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        push(&mut queue, 50, "first");
        push(&mut queue, 50, "second");
        push(&mut queue, 50, "third");

        queue.advance_to(50, &mut log);
        assert_eq!(log, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_not_due_does_not_fire() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        push(&mut queue, 100, "late");
        queue.advance_to(99, &mut log);
        assert!(log.is_empty());
        assert_eq!(queue.next_deadline(), Some(100));
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        let id = push(&mut queue, 10, "cancelled");
        push(&mut queue, 20, "kept");

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(!queue.is_pending(id));

        queue.run_until_idle(&mut log);
        assert_eq!(log, vec!["kept"]);
        assert_eq!(queue.now(), 20);
    }

    #[test]
    fn test_cancel_after_fire_is_false() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        let id = push(&mut queue, 0, "done");
        queue.advance_by(0, &mut log);
        assert!(!queue.cancel(id));
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut queue = TimerQueue::new();
        let mut log = Vec::new();

        queue.advance_to(1000, &mut log);
        push(&mut queue, 10, "relative");
        assert_eq!(queue.next_deadline(), Some(1010));
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut queue: TimerQueue<Vec<&'static str>> = TimerQueue::new();
        let mut log = Vec::new();
        queue.advance_to(500, &mut log);
        queue.advance_to(100, &mut log);
        assert_eq!(queue.now(), 500);
    }
}
