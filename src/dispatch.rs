use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::error::{OrganizationsError, TaskError, TaskResult};
use crate::executor::{Executor, Rejected, Task};
use crate::handle::{ResponseHandle, TaskState};
use crate::handler::AsyncHandler;

pub(crate) type BoxedHandler<Req, Res> = Box<dyn AsyncHandler<Req, Res>>;

/// Schedule `call(&request)` on `executor` and return a handle to its outcome.
///
/// The handler, when present, is told about the outcome before the handle
/// completes. Nothing is reported to it for tasks that never ran, were
/// abandoned by an immediate shutdown, or panicked inside `call`.
pub(crate) fn dispatch<X, Req, Res, F>(
    executor: &X,
    operation: &'static str,
    request: Req,
    handler: Option<BoxedHandler<Req, Res>>,
    call: F,
) -> ResponseHandle<Res>
where
    X: Executor + ?Sized,
    Req: Send + 'static,
    Res: Send + 'static,
    F: FnOnce(&Req) -> Result<Res, OrganizationsError> + Send + 'static,
{
    let (tx, rx) = oneshot::channel::<TaskResult<Res>>();
    let state = Arc::new(TaskState::default());
    let task_state = state.clone();

    let task = Task::new(operation, move |signal| {
        if !task_state.try_start() {
            tracing::debug!("Skipping cancelled {} task", operation);
            return;
        }

        let returned = panic::catch_unwind(AssertUnwindSafe(|| call(&request)));

        if signal.is_aborted() {
            tracing::debug!("Abandoning {} outcome after immediate shutdown", operation);
            return;
        }

        let outcome = match returned {
            Ok(Ok(result)) => match &handler {
                Some(handler) => notify(|| handler.on_success(&request, &result)).map(|()| result),
                None => Ok(result),
            },
            Ok(Err(err)) => {
                tracing::trace!("{} failed: {}", operation, err);
                match &handler {
                    Some(handler) => notify(|| handler.on_error(&err)).and(Err(TaskError::Service(err))),
                    None => Err(TaskError::Service(err)),
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!("{} panicked: {}", operation, message);
                Err(TaskError::Panicked(message))
            }
        };

        if tx.send(outcome).is_err() {
            tracing::trace!("Handle for {} task dropped before completion", operation);
        }
    });

    let id = task.id();
    if let Err(Rejected(task)) = executor.execute(task) {
        tracing::warn!("Rejected {} task {}: executor is shut down", operation, id);
        state.reject();
        drop(task);
    }

    ResponseHandle::new(id, operation, rx, state)
}

fn notify(callback: impl FnOnce()) -> TaskResult<()> {
    panic::catch_unwind(AssertUnwindSafe(callback))
        .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{InlineExecutor, WorkerPool};
    use crate::handler::FnHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(
        successes: &Arc<AtomicUsize>,
        failures: &Arc<AtomicUsize>,
    ) -> BoxedHandler<u32, u32> {
        let s = successes.clone();
        let f = failures.clone();
        Box::new(FnHandler::new(
            move |_: &u32, _: &u32| {
                s.fetch_add(1, Ordering::SeqCst);
            },
            move |_: &OrganizationsError| {
                f.fetch_add(1, Ordering::SeqCst);
            },
        ))
    }

    #[test]
    fn test_success_notifies_once() {
        let executor = InlineExecutor::new();
        let (ok, err) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));

        let handle = dispatch(&executor, "Double", 21, Some(counting_handler(&ok, &err)), |n| {
            Ok(n * 2)
        });

        assert_eq!(handle.get(), Ok(42));
        assert_eq!(ok.load(Ordering::SeqCst), 1);
        assert_eq!(err.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_notifies_once() {
        let executor = InlineExecutor::new();
        let (ok, err) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));

        let handle = dispatch(&executor, "Fail", 1, Some(counting_handler(&ok, &err)), |_| {
            Err::<u32, _>(OrganizationsError::validation("nope"))
        });

        assert_eq!(
            handle.get(),
            Err(TaskError::Service(OrganizationsError::validation("nope")))
        );
        assert_eq!(ok.load(Ordering::SeqCst), 0);
        assert_eq!(err.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_is_reported_through_handle() {
        let executor = InlineExecutor::new();
        let (ok, err) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));

        let handle = dispatch(&executor, "Panic", 1, Some(counting_handler(&ok, &err)), |_| {
            if true {
                panic!("wire on fire");
            }
            Ok(0u32)
        });

        assert_eq!(handle.get(), Err(TaskError::Panicked("wire on fire".into())));
        assert_eq!(ok.load(Ordering::SeqCst) + err.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_panic_fails_handle() {
        let executor = InlineExecutor::new();
        let handler: BoxedHandler<u32, u32> = Box::new(FnHandler::new(
            |_: &u32, _: &u32| panic!("bad callback"),
            |_: &OrganizationsError| {},
        ));

        let handle = dispatch(&executor, "Echo", 5, Some(handler), |n| Ok(*n));
        assert_eq!(handle.get(), Err(TaskError::Panicked("bad callback".into())));
    }

    #[test]
    fn test_error_callback_panic_fails_handle() {
        let pool = WorkerPool::new(1).unwrap();
        let handler: BoxedHandler<u32, u32> = Box::new(FnHandler::new(
            |_: &u32, _: &u32| {},
            |_: &OrganizationsError| panic!("bad error callback"),
        ));

        let handle = dispatch(&pool, "Fail", 1, Some(handler), |_| {
            Err::<u32, _>(OrganizationsError::throttling("slow down"))
        });
        assert_eq!(
            handle.get(),
            Err(TaskError::Panicked("bad error callback".into()))
        );

        let next = dispatch(&pool, "Echo", 9, None, |n| Ok(*n));
        assert_eq!(next.get(), Ok(9));

        pool.shutdown();
        assert!(pool.await_termination(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_rejected_after_shutdown() {
        let executor = InlineExecutor::new();
        executor.shutdown();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let handle = dispatch(&executor, "Late", 1, None, move |n: &u32| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(*n)
        });

        assert_eq!(handle.get(), Err(TaskError::Rejected));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
