use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::config::{ClientConfiguration, PoolSizing, DEFAULT_THREAD_NAME_PREFIX};
use crate::error::{Error, Result};
use crate::executor::task::{AbortSignal, Task};
use crate::executor::{Executor, Rejected};

/// Fixed-size pool of worker threads pulling tasks off a shared queue.
///
/// Dropping the last reference closes the queue; workers finish what is
/// already queued and exit.
#[derive(Debug)]
pub struct WorkerPool {
    /// Queue sender, taken on shutdown
    tx: Mutex<Option<Sender<Task>>>,

    /// Kept to drain queued tasks on immediate shutdown
    rx: Receiver<Task>,

    signal: AbortSignal,

    /// Disconnects once every worker thread has exited
    exit_rx: Receiver<()>,

    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self> {
        Self::spawn(size, DEFAULT_THREAD_NAME_PREFIX)
    }

    pub fn with_sizing(sizing: PoolSizing) -> Result<Self> {
        Self::spawn(sizing.worker_count()?, DEFAULT_THREAD_NAME_PREFIX)
    }

    pub fn from_config(config: &ClientConfiguration) -> Result<Self> {
        let size = PoolSizing::from(config).worker_count()?;
        Self::spawn(size, &config.thread_name_prefix)
    }

    fn spawn(size: usize, thread_name_prefix: &str) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidPoolSize(size));
        }

        let (tx, rx) = channel::unbounded::<Task>();
        let (exit_tx, exit_rx) = channel::bounded::<()>(0);
        let signal = AbortSignal::new();

        for i in 0..size {
            let receiver = rx.clone();
            let signal = signal.clone();
            let exit_guard = exit_tx.clone();
            thread::Builder::new()
                .name(format!("{thread_name_prefix}-{i}"))
                .spawn(move || worker_loop(receiver, signal, exit_guard))?;
        }

        tracing::info!("Started worker pool with {} workers", size);

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            rx,
            signal,
            exit_rx,
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    pub fn is_shutdown(&self) -> bool {
        self.sender().is_none()
    }

    /// True once the pool is shut down and every worker has exited.
    pub fn is_terminated(&self) -> bool {
        self.is_shutdown() && matches!(self.exit_rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until all workers exit or `timeout` elapses. Returns whether the
    /// pool terminated. Only useful after one of the shutdown calls.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        matches!(
            self.exit_rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    pub fn shutdown(&self) {
        if self.sender().take().is_some() {
            tracing::info!(
                "Shutting down worker pool, {} tasks still queued",
                self.rx.len()
            );
        }
    }

    pub fn shutdown_now(&self) -> Vec<Task> {
        let was_open = self.sender().take().is_some();
        self.signal.abort();

        let never_started: Vec<Task> = self.rx.try_iter().collect();
        if was_open || !never_started.is_empty() {
            tracing::info!(
                "Shut down worker pool immediately, {} queued tasks discarded",
                never_started.len()
            );
        }
        never_started
    }

    fn sender(&self) -> MutexGuard<'_, Option<Sender<Task>>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Executor for WorkerPool {
    fn execute(&self, task: Task) -> std::result::Result<(), Rejected> {
        match self.sender().as_ref() {
            Some(tx) => tx
                .send(task)
                .map_err(|channel::SendError(task)| Rejected(task)),
            None => Err(Rejected(task)),
        }
    }

    fn shutdown(&self) {
        WorkerPool::shutdown(self)
    }

    fn shutdown_now(&self) -> Vec<Task> {
        WorkerPool::shutdown_now(self)
    }

    fn is_shutdown(&self) -> bool {
        WorkerPool::is_shutdown(self)
    }
}

fn worker_loop(receiver: Receiver<Task>, signal: AbortSignal, _exit_guard: Sender<()>) {
    while let Ok(task) = receiver.recv() {
        if signal.is_aborted() {
            tracing::debug!(
                "Dropping task {} ({}) picked up after shutdown",
                task.id(),
                task.operation()
            );
            continue;
        }

        let id = task.id();
        if panic::catch_unwind(AssertUnwindSafe(|| task.run(&signal))).is_err() {
            tracing::warn!("Task {} panicked on worker thread", id);
        }
    }
    tracing::trace!("Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(5);

    fn counting_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = counter.clone();
        Task::new("Count", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_runs_tasks() {
        let pool = WorkerPool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..32 {
            pool.execute(counting_task(&counter)).unwrap();
        }

        pool.shutdown();
        assert!(pool.await_termination(WAIT));
        assert_eq!(counter.load(Ordering::SeqCst), 32);
        assert!(pool.is_terminated());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(Error::InvalidPoolSize(0))));
        assert!(matches!(
            WorkerPool::with_sizing(PoolSizing::MaxConnections(0)),
            Err(Error::InvalidPoolSize(0))
        ));
    }

    #[test]
    fn test_thread_names_from_config() {
        let config = ClientConfiguration {
            max_connections: 1,
            thread_name_prefix: "orgs-test".into(),
        };
        let pool = WorkerPool::from_config(&config).unwrap();
        assert_eq!(pool.size(), 1);

        let (tx, rx) = channel::bounded(1);
        pool.execute(Task::new("Name", move |_| {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        }))
        .unwrap();

        assert_eq!(rx.recv_timeout(WAIT).unwrap().as_deref(), Some("orgs-test-0"));
    }

    #[test]
    fn test_rejects_after_shutdown() {
        let pool = WorkerPool::new(1).unwrap();
        pool.shutdown();
        assert!(pool.is_shutdown());

        let counter = Arc::new(AtomicUsize::new(0));
        let rejected = pool.execute(counting_task(&counter)).unwrap_err();
        assert_eq!(rejected.0.operation(), "Count");
    }

    #[test]
    fn test_shutdown_now_returns_queued_tasks() {
        let pool = WorkerPool::new(1).unwrap();
        let (started_tx, started_rx) = channel::bounded(1);
        let (release_tx, release_rx) = channel::bounded::<()>(1);

        pool.execute(Task::new("Block", move |_| {
            started_tx.send(()).unwrap();
            let _ = release_rx.recv();
        }))
        .unwrap();
        started_rx.recv_timeout(WAIT).unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            pool.execute(counting_task(&counter)).unwrap();
        }
        assert_eq!(pool.queued(), 3);

        let never_started = pool.shutdown_now();
        assert_eq!(never_started.len(), 3);
        assert!(!pool.await_termination(Duration::from_millis(50)));

        release_tx.send(()).unwrap();
        assert!(pool.await_termination(WAIT));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let pool = WorkerPool::new(2).unwrap();
        pool.shutdown();
        pool.shutdown();
        assert!(pool.shutdown_now().is_empty());
        assert!(pool.shutdown_now().is_empty());
        assert!(pool.await_termination(WAIT));
        assert!(pool.is_terminated());
    }

    #[test]
    fn test_worker_survives_panic() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(Task::new("Panic", |_| panic!("boom"))).unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        pool.execute(counting_task(&counter)).unwrap();

        pool.shutdown();
        assert!(pool.await_termination(WAIT));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
