use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::error::{TaskError, TaskResult};
use crate::executor::TaskId;

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;
const REJECTED: u8 = 3;

/// Lifecycle flag shared between a handle and the task it tracks.
#[derive(Debug, Default)]
pub(crate) struct TaskState(AtomicU8);

impl TaskState {
    pub(crate) fn try_start(&self) -> bool {
        self.0
            .compare_exchange(PENDING, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn try_cancel(&self) -> bool {
        self.0
            .compare_exchange(PENDING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn reject(&self) {
        self.0.store(REJECTED, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst) == CANCELLED
    }

    /// Outcome to report when the task went away without sending one.
    fn closed_outcome(&self) -> TaskError {
        match self.0.load(Ordering::SeqCst) {
            CANCELLED => TaskError::Cancelled,
            REJECTED => TaskError::Rejected,
            _ => TaskError::Abandoned,
        }
    }
}

/// Pending outcome of one dispatched operation.
///
/// Retrieve it by blocking with [`ResponseHandle::get`] or by `.await`ing the
/// handle. Dropping the handle does not cancel the task, and a failure
/// nobody retrieves is never reported anywhere else unless a callback was
/// registered.
pub struct ResponseHandle<T> {
    id: TaskId,
    operation: &'static str,
    rx: oneshot::Receiver<TaskResult<T>>,
    state: Arc<TaskState>,
    ready: Option<TaskResult<T>>,
}

// No field is structurally pinned.
impl<T> Unpin for ResponseHandle<T> {}

impl<T> ResponseHandle<T> {
    pub(crate) fn new(
        id: TaskId,
        operation: &'static str,
        rx: oneshot::Receiver<TaskResult<T>>,
        state: Arc<TaskState>,
    ) -> Self {
        Self {
            id,
            operation,
            rx,
            state,
            ready: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Prevent the task from running if no worker has picked it up yet.
    /// Returns false once the task has started, finished or been cancelled.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.try_cancel();
        if cancelled {
            tracing::debug!("Cancelled task {} ({})", self.id, self.operation);
        }
        cancelled
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Non-blocking completion check.
    pub fn is_done(&mut self) -> bool {
        if self.ready.is_some() || self.state.is_cancelled() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.ready = Some(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                self.ready = Some(Err(self.state.closed_outcome()));
                true
            }
        }
    }

    /// Block the current thread until the outcome is available.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context;
    /// `.await` the handle there instead.
    pub fn get(mut self) -> TaskResult<T> {
        if let Some(outcome) = self.ready.take() {
            return outcome;
        }
        if self.state.is_cancelled() {
            return Err(TaskError::Cancelled);
        }
        let state = self.state;
        self.rx
            .blocking_recv()
            .unwrap_or_else(|_| Err(state.closed_outcome()))
    }
}

impl<T> Future for ResponseHandle<T> {
    type Output = TaskResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.ready.take() {
            return Poll::Ready(outcome);
        }
        if this.state.is_cancelled() {
            return Poll::Ready(Err(TaskError::Cancelled));
        }
        let state = &this.state;
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(state.closed_outcome())))
    }
}

impl<T> fmt::Debug for ResponseHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
