//! # `orgasync`
//!
//! `orgasync` runs the operations of a blocking Organizations client on a
//! pool of worker threads and hands back a handle for each call.
//!
//! ## Example
//!
//! ```rust
//! use orgasync::model::{Account, AccountStatus, DescribeAccountRequest, DescribeAccountResult};
//! use orgasync::{Organizations, OrganizationsAsyncClient, OrganizationsError};
//!
//! struct Backend;
//!
//! impl Organizations for Backend {
//!     fn describe_account(
//!         &self,
//!         request: &DescribeAccountRequest,
//!     ) -> Result<DescribeAccountResult, OrganizationsError> {
//!         Ok(DescribeAccountResult {
//!             account: Some(Account {
//!                 id: request.account_id.clone(),
//!                 status: AccountStatus::Active,
//!                 ..Default::default()
//!             }),
//!         })
//!     }
//! }
//!
//! let client = OrganizationsAsyncClient::new(Backend).unwrap();
//!
//! let handle = client.describe_account_async(DescribeAccountRequest {
//!     account_id: "123".into(),
//! });
//!
//! let account = handle.get().unwrap().account.unwrap();
//! assert_eq!(account.status, AccountStatus::Active);
//!
//! client.shutdown();
//! ```
//!
//! ## Features
//!
//! - One generic dispatch path shared by every operation
//! - Optional success/failure callbacks per call
//! - Handles that can be blocked on, awaited, polled or cancelled
//! - Pluggable executors: a fixed worker pool or inline execution for tests
//! - Dispatch by operation name with JSON bodies

pub mod client;
pub mod config;
mod dispatch;
pub mod error;
pub mod executor;
pub mod handle;
pub mod handler;
pub mod model;
pub mod operations;
mod registry;

pub use client::OrganizationsAsyncClient;
pub use config::{ClientConfiguration, PoolSizing, DEFAULT_THREAD_POOL_SIZE};
pub use error::{Error, OrganizationsError, Result, TaskError, TaskResult};
pub use executor::{Executor, InlineExecutor, WorkerPool};
pub use handle::ResponseHandle;
pub use handler::{AsyncHandler, FnHandler};
pub use operations::{Operation, Organizations, OPERATION_NAMES};
