use serde_json::Value;
use std::sync::Arc;

use crate::config::{ClientConfiguration, PoolSizing};
use crate::dispatch::{dispatch, BoxedHandler};
use crate::error::{Error, Result};
use crate::executor::{Executor, WorkerPool};
use crate::handle::ResponseHandle;
use crate::handler::AsyncHandler;
use crate::operations::{Operation, Organizations};
use crate::registry;

/// Asynchronous Organizations client.
///
/// Every operation of the wrapped blocking client runs as one task on the
/// executor. The executor is shared: cloning the client, or building several
/// clients over the same `Arc`, submits to the same workers.
pub struct OrganizationsAsyncClient<C, X = WorkerPool> {
    client: Arc<C>,
    executor: Arc<X>,
}

impl<C> OrganizationsAsyncClient<C, WorkerPool>
where
    C: Organizations,
{
    /// Client backed by a pool of [`DEFAULT_THREAD_POOL_SIZE`] workers.
    ///
    /// [`DEFAULT_THREAD_POOL_SIZE`]: crate::config::DEFAULT_THREAD_POOL_SIZE
    pub fn new(client: C) -> Result<Self> {
        Self::with_sizing(client, PoolSizing::Default)
    }

    /// Client backed by a pool with one worker per configured connection.
    pub fn with_config(client: C, config: &ClientConfiguration) -> Result<Self> {
        let pool = WorkerPool::from_config(config)?;
        Ok(Self::with_executor(client, Arc::new(pool)))
    }

    pub fn with_sizing(client: C, sizing: PoolSizing) -> Result<Self> {
        let pool = WorkerPool::with_sizing(sizing)?;
        Ok(Self::with_executor(client, Arc::new(pool)))
    }
}

impl<C, X> OrganizationsAsyncClient<C, X>
where
    C: Organizations,
    X: Executor,
{
    pub fn with_executor(client: C, executor: Arc<X>) -> Self {
        Self::from_parts(Arc::new(client), executor)
    }

    pub fn from_parts(client: Arc<C>, executor: Arc<X>) -> Self {
        Self { client, executor }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// The executor running this client's tasks. Use it for lifecycle control
    /// the client does not offer, such as draining work before
    /// [`shutdown`](Self::shutdown).
    pub fn executor(&self) -> &Arc<X> {
        &self.executor
    }

    pub fn submit<O: Operation>(&self, request: O::Request) -> ResponseHandle<O::Response> {
        self.submit_inner::<O>(request, None)
    }

    pub fn submit_with_handler<O, H>(
        &self,
        request: O::Request,
        handler: H,
    ) -> ResponseHandle<O::Response>
    where
        O: Operation,
        H: AsyncHandler<O::Request, O::Response>,
    {
        self.submit_inner::<O>(request, Some(Box::new(handler)))
    }

    fn submit_inner<O: Operation>(
        &self,
        request: O::Request,
        handler: Option<BoxedHandler<O::Request, O::Response>>,
    ) -> ResponseHandle<O::Response> {
        let client = self.client.clone();
        dispatch(&*self.executor, O::NAME, request, handler, move |request| {
            O::invoke(&*client, request)
        })
    }

    /// Run an operation identified by name with a JSON request body.
    ///
    /// Unknown names fail immediately. A body that does not match the
    /// operation's request shape fails through the handle with
    /// [`OrganizationsError::Serialization`](crate::OrganizationsError::Serialization).
    pub fn invoke_by_name(&self, name: &str, request: Value) -> Result<ResponseHandle<Value>> {
        self.invoke_by_name_inner(name, request, None)
    }

    pub fn invoke_by_name_with_handler<H>(
        &self,
        name: &str,
        request: Value,
        handler: H,
    ) -> Result<ResponseHandle<Value>>
    where
        H: AsyncHandler<Value, Value>,
    {
        self.invoke_by_name_inner(name, request, Some(Box::new(handler)))
    }

    fn invoke_by_name_inner(
        &self,
        name: &str,
        request: Value,
        handler: Option<BoxedHandler<Value, Value>>,
    ) -> Result<ResponseHandle<Value>> {
        let (operation, raw) =
            registry::lookup(name).ok_or_else(|| Error::UnknownOperation(name.to_string()))?;
        let client = self.client.clone();
        Ok(dispatch(&*self.executor, operation, request, handler, move |request| {
            raw(&*client, request)
        }))
    }

    /// Shut down the wrapped client and the executor.
    ///
    /// Queued tasks are discarded and running tasks are abandoned: their
    /// handles report [`TaskError::Abandoned`](crate::TaskError::Abandoned)
    /// and their callbacks never run. To let pending work finish first, shut
    /// the executor down gracefully and wait for it before calling this.
    /// Calling it more than once has no further effect.
    pub fn shutdown(&self) {
        self.client.shutdown();
        let never_started = self.executor.shutdown_now();
        if !never_started.is_empty() {
            tracing::info!(
                "Discarded {} queued tasks on shutdown",
                never_started.len()
            );
        }
    }
}

impl<C, X> Clone for OrganizationsAsyncClient<C, X> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            executor: self.executor.clone(),
        }
    }
}
