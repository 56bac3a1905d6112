use std::sync::atomic::{AtomicBool, Ordering};

use crate::executor::task::{AbortSignal, Task};
use crate::executor::{Executor, Rejected};

/// Runs every task on the submitting thread before `execute` returns.
///
/// Handles returned by the client are therefore already complete, which
/// makes this executor handy for deterministic tests.
#[derive(Debug, Default)]
pub struct InlineExecutor {
    shutdown: AtomicBool,
    signal: AbortSignal,
}

impl InlineExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) -> Result<(), Rejected> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(Rejected(task));
        }
        task.run(&self.signal);
        Ok(())
    }

    fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    fn shutdown_now(&self) -> Vec<Task> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.signal.abort();
        Vec::new()
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
