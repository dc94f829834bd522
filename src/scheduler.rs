//! Deferred task queue.
//!
//! Single-threaded, cooperative: actions schedule work here and the host
//! drains matured tasks from its frame loop via `due`. Tasks carry data, not
//! closures, so firing always reads the state current at fire time rather
//! than whatever was captured at schedule time.

use parking_lot::Mutex;

use crate::util::time;

/// Cancellation token returned by `schedule_at`/`schedule_in`
pub type TaskId = u64;

/// Work that runs after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Clear the scene after a collaboration teardown settled.
    /// `saved_locally` selects the completion toast.
    ResetScene { saved_locally: bool },
}

#[derive(Debug)]
struct Entry {
    id: TaskId,
    fire_at_ms: u64,
    task: DeferredTask,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: TaskId,
    entries: Vec<Entry>,
}

/// Shared deferred-task queue. Interior mutability so action perform
/// functions (holding only `&TaskScheduler`) and the host loop can both touch
/// it.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    queue: Mutex<Queue>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to mature at an absolute epoch-millisecond time
    pub fn schedule_at(&self, fire_at_ms: u64, task: DeferredTask) -> TaskId {
        let mut queue = self.queue.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.entries.push(Entry {
            id,
            fire_at_ms,
            task,
        });
        log::debug!("scheduled task {} to fire at {}", id, fire_at_ms);
        id
    }

    /// Schedule `task` to mature `delay_ms` from now
    pub fn schedule_in(&self, delay_ms: u64, task: DeferredTask) -> TaskId {
        self.schedule_at(time::timestamp_ms() + delay_ms, task)
    }

    /// Drop a pending task. Returns false when it already fired or never
    /// existed.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.entries.len();
        queue.entries.retain(|entry| entry.id != id);
        queue.entries.len() != before
    }

    /// Drain every task that has matured by `now_ms`, earliest first
    pub fn due(&self, now_ms: u64) -> Vec<DeferredTask> {
        let mut queue = self.queue.lock();
        let mut matured: Vec<Entry> = Vec::new();
        let mut remaining: Vec<Entry> = Vec::new();
        for entry in queue.entries.drain(..) {
            if entry.fire_at_ms <= now_ms {
                matured.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        queue.entries = remaining;
        matured.sort_by_key(|entry| entry.fire_at_ms);
        matured.into_iter().map(|entry| entry.task).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.lock().entries.len()
    }
}
