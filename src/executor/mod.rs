mod inline;
mod pool;
mod task;

pub use inline::InlineExecutor;
pub use pool::WorkerPool;
pub use task::{AbortSignal, Task, TaskId};

use std::fmt;

/// A task handed back because the executor no longer accepts work.
pub struct Rejected(pub Task);

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rejected").field(&self.0).finish()
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task {} ({}) rejected: executor is shut down",
            self.0.id(),
            self.0.operation()
        )
    }
}

impl std::error::Error for Rejected {}

/// Anything that can run dispatched tasks.
pub trait Executor: Send + Sync + 'static {
    fn execute(&self, task: Task) -> Result<(), Rejected>;

    /// Stop accepting tasks and let queued and running ones finish.
    fn shutdown(&self);

    /// Stop accepting tasks, abandon running ones and return the tasks that
    /// never started.
    fn shutdown_now(&self) -> Vec<Task>;

    fn is_shutdown(&self) -> bool;
}
