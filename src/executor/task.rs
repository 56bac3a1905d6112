use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type TaskId = Uuid;

type Work = Box<dyn FnOnce(&AbortSignal) + Send + 'static>;

/// Set once by an immediate shutdown. Tasks consult it after the blocking
/// call returns and drop their outcome when it is set.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Queue entry: one unit of work for an executor.
pub struct Task {
    /// Identifier
    id: TaskId,

    /// Name of the operation this task runs
    operation: &'static str,

    /// Instant when this entry was queued
    queue_time: Instant,

    work: Work,
}

impl Task {
    pub fn new<F>(operation: &'static str, work: F) -> Self
    where
        F: FnOnce(&AbortSignal) + Send + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            operation,
            queue_time: Instant::now(),
            work: Box::new(work),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn queued_for(&self) -> Duration {
        self.queue_time.elapsed()
    }

    pub fn run(self, signal: &AbortSignal) {
        tracing::trace!(
            "Processing task {} ({}), added {}ms ago",
            self.id,
            self.operation,
            self.queued_for().as_millis()
        );
        (self.work)(signal);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("queue_time", &self.queue_time)
            .finish_non_exhaustive()
    }
}
