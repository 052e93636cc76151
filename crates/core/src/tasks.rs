//! Cooperative one-shot task scheduler.
//!
//! The scheduler owns no thread and never looks at the wall clock. A host
//! drives it by calling [`TaskScheduler::advance`] with the elapsed time of
//! each tick, and every callback whose due time has been reached runs
//! synchronously on the calling thread, in due order. Callbacks receive a
//! mutable borrow of the host context so they can reach collaborators
//! without capturing them at scheduling time.

use std::fmt;
use std::time::Duration;

use tracing::trace;

type TaskFn<Ctx> = Box<dyn FnOnce(&mut Ctx)>;

struct Task<Ctx> {
    due_at: Duration,
    seq: u64,
    run: TaskFn<Ctx>,
}

pub struct TaskScheduler<Ctx> {
    /// Monotonic clock, advanced only by `advance`.
    clock: Duration,
    next_seq: u64,
    tasks: Vec<Task<Ctx>>,
}

impl<Ctx> TaskScheduler<Ctx> {
    pub fn new() -> Self {
        TaskScheduler {
            clock: Duration::ZERO,
            next_seq: 0,
            tasks: Vec::new(),
        }
    }

    /// Schedule a callback to run once `delay` after the current clock.
    pub fn schedule_once(&mut self, delay: Duration, run: impl FnOnce(&mut Ctx) + 'static) {
        let due_at = self.clock + delay;
        trace!(due_ms = due_at.as_millis() as u64, "task scheduled");
        self.tasks.push(Task {
            due_at,
            seq: self.next_seq,
            run: Box::new(run),
        });
        self.next_seq += 1;
    }

    /// Drop every pending task without running it.
    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            trace!(dropped = self.tasks.len(), "pending tasks cancelled");
        }
        self.tasks.clear();
    }

    /// Number of tasks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the clock by `elapsed` and fire every task that has come due.
    ///
    /// Tasks fire in due order; two tasks due at the same instant fire in
    /// the order they were scheduled.
    pub fn advance(&mut self, elapsed: Duration, ctx: &mut Ctx) {
        self.clock += elapsed;
        loop {
            let due = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_at <= self.clock)
                .min_by_key(|(_, t)| (t.due_at, t.seq))
                .map(|(idx, _)| idx);
            let Some(idx) = due else { break };
            let task = self.tasks.swap_remove(idx);
            trace!(due_ms = task.due_at.as_millis() as u64, "task fired");
            (task.run)(ctx);
        }
    }
}

impl<Ctx> Default for TaskScheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> fmt::Debug for TaskScheduler<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("clock", &self.clock)
            .field("pending", &self.tasks.len())
            .finish()
    }
}
