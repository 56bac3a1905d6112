mod common;

use crossbeam::channel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{describe, GatedOrganizations, Recorder, StaticOrganizations, WAIT};
use orgasync::{OrganizationsAsyncClient, PoolSizing, TaskError, WorkerPool};

fn gated(
    workers: usize,
) -> (
    OrganizationsAsyncClient<GatedOrganizations>,
    channel::Receiver<String>,
    channel::Sender<()>,
) {
    let (started_tx, started_rx) = channel::unbounded();
    let (release_tx, release_rx) = channel::unbounded();
    let backend = GatedOrganizations {
        started: started_tx,
        release: release_rx,
        calls: AtomicUsize::new(0),
    };
    let client = OrganizationsAsyncClient::with_sizing(backend, PoolSizing::Fixed(workers)).unwrap();
    (client, started_rx, release_tx)
}

#[test]
fn shutdown_is_idempotent() {
    let client = OrganizationsAsyncClient::with_sizing(
        StaticOrganizations::default(),
        PoolSizing::Fixed(2),
    )
    .unwrap();

    client.shutdown();
    client.shutdown();

    assert!(client.executor().is_shutdown());
    assert!(client.executor().await_termination(WAIT));
    assert!(client.executor().is_terminated());
    assert_eq!(client.client().shutdowns.load(Ordering::SeqCst), 2);

    let late = client.describe_account_async(describe("2")).get();
    assert_eq!(late, Err(TaskError::Rejected));
    assert_eq!(client.client().calls.load(Ordering::SeqCst), 0);
    assert!(client.executor().is_terminated());
}

#[test]
fn immediate_shutdown_abandons_queued_and_running_tasks() {
    let (client, started, release) = gated(1);
    let recorder = Arc::new(Recorder::default());

    let running = client.describe_account_async_with_handler(describe("1"), recorder.clone());
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "1");
    let queued = client.describe_account_async_with_handler(describe("2"), recorder.clone());

    client.shutdown();
    release.send(()).unwrap();

    assert_eq!(queued.get(), Err(TaskError::Abandoned));
    assert_eq!(running.get(), Err(TaskError::Abandoned));
    assert!(client.executor().await_termination(WAIT));

    // Neither callback ran and the queued call never reached the backend.
    assert_eq!(recorder.total(), 0);
    assert_eq!(client.client().calls.load(Ordering::SeqCst), 1);
}

#[test]
fn graceful_drain_completes_pending_work() {
    let (client, started, release) = gated(1);
    let recorder = Arc::new(Recorder::default());

    let handles: Vec<_> = ["10", "20", "30"]
        .into_iter()
        .map(|id| client.describe_account_async_with_handler(describe(id), recorder.clone()))
        .collect();
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "10");

    client.executor().shutdown();
    assert!(!client.executor().await_termination(Duration::from_millis(50)));

    for _ in 0..3 {
        release.send(()).unwrap();
    }
    assert!(client.executor().await_termination(WAIT));

    for handle in handles {
        assert!(handle.get().is_ok());
    }
    assert_eq!(recorder.successes.lock().unwrap().len(), 3);

    client.shutdown();
}

#[test]
fn cancel_prevents_queued_task_from_running() {
    let (client, started, release) = gated(1);

    let running = client.describe_account_async(describe("1"));
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "1");

    let mut queued = client.describe_account_async(describe("2"));
    assert!(queued.cancel());
    assert!(queued.is_done());
    assert!(!running.cancel());

    release.send(()).unwrap();
    assert!(running.get().is_ok());
    assert_eq!(queued.get(), Err(TaskError::Cancelled));

    client.executor().shutdown();
    assert!(client.executor().await_termination(WAIT));
    assert_eq!(client.client().calls.load(Ordering::SeqCst), 1);
}

#[test]
fn shared_pool_serves_several_clients() {
    let pool = Arc::new(WorkerPool::new(2).unwrap());
    let first = OrganizationsAsyncClient::with_executor(StaticOrganizations::default(), pool.clone());
    let second = OrganizationsAsyncClient::with_executor(StaticOrganizations::default(), pool.clone());

    assert!(first.describe_account_async(describe("4")).get().is_ok());
    assert!(second.describe_account_async(describe("6")).get().is_ok());

    first.shutdown();
    assert!(second.executor().is_shutdown());
    assert_eq!(
        second.describe_account_async(describe("8")).get(),
        Err(TaskError::Rejected)
    );
}
