use anyhow::Result;
use clap::Parser;
use futures_util::future::join_all;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orgasync::model::{
    Account, AccountJoinedMethod, AccountStatus, CreateAccountRequest, CreateAccountResult,
    CreateAccountState, CreateAccountStatus, DescribeAccountRequest, DescribeAccountResult,
    ListAccountsRequest, ListAccountsResult,
};
use orgasync::{FnHandler, Organizations, OrganizationsAsyncClient, OrganizationsError, PoolSizing};

/// Drive the asynchronous client against an in-process simulated backend.
#[derive(Debug, Parser)]
pub struct App {
    /// Worker threads in the pool
    #[arg(short, long, default_value_t = 4)]
    pub threads: usize,

    /// Accounts to create concurrently
    #[arg(short, long, default_value_t = 8)]
    pub accounts: usize,

    /// Throttle every n-th backend call, 0 disables throttling
    #[arg(long, default_value_t = 3)]
    pub throttle_every: u64,

    /// Simulated service latency per call
    #[arg(long, default_value_t = 50)]
    pub latency_ms: u64,

    /// Let queued work drain before shutting down
    #[arg(long)]
    pub graceful: bool,
}

struct SimulatedOrganizations {
    accounts: Mutex<Vec<Account>>,
    calls: AtomicU64,
    throttle_every: u64,
    latency: Duration,
}

impl SimulatedOrganizations {
    fn new(throttle_every: u64, latency: Duration) -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            calls: AtomicU64::new(0),
            throttle_every,
            latency,
        }
    }

    fn admit(&self) -> Result<(), OrganizationsError> {
        std::thread::sleep(self.latency);
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.throttle_every > 0 && n % self.throttle_every == 0 {
            return Err(OrganizationsError::throttling(format!(
                "call {n} exceeded the simulated request rate"
            )));
        }
        Ok(())
    }

    fn accounts(&self) -> MutexGuard<'_, Vec<Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Organizations for SimulatedOrganizations {
    fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<CreateAccountResult, OrganizationsError> {
        self.admit()?;
        if request.email.is_empty() {
            return Err(OrganizationsError::validation("Email is required"));
        }

        let now = SystemTime::now();
        let mut accounts = self.accounts();
        let id = format!("{:012}", 100_000_000_000u64 + accounts.len() as u64);
        accounts.push(Account {
            id: id.clone(),
            arn: format!("arn:aws:organizations::000000000000:account/o-simulated/{id}"),
            email: request.email.clone(),
            name: request.account_name.clone(),
            status: AccountStatus::Active,
            joined_method: AccountJoinedMethod::Created,
            joined_timestamp: Some(now),
        });

        Ok(CreateAccountResult {
            create_account_status: Some(CreateAccountStatus {
                id: format!("car-{id}"),
                account_name: request.account_name.clone(),
                state: CreateAccountState::Succeeded,
                requested_timestamp: Some(now),
                completed_timestamp: Some(now),
                account_id: Some(id),
                failure_reason: None,
            }),
        })
    }

    fn describe_account(
        &self,
        request: &DescribeAccountRequest,
    ) -> Result<DescribeAccountResult, OrganizationsError> {
        self.admit()?;
        self.accounts()
            .iter()
            .find(|account| account.id == request.account_id)
            .map(|account| DescribeAccountResult {
                account: Some(account.clone()),
            })
            .ok_or_else(|| OrganizationsError::not_found("Account", request.account_id.clone()))
    }

    fn list_accounts(
        &self,
        _request: &ListAccountsRequest,
    ) -> Result<ListAccountsResult, OrganizationsError> {
        self.admit()?;
        Ok(ListAccountsResult {
            accounts: self.accounts().clone(),
            next_token: None,
        })
    }

    fn shutdown(&self) {
        tracing::info!("Simulated backend closed after {} calls", self.calls.load(Ordering::SeqCst));
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    let args = App::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                eprintln!("No environment variables found that can initialize tracing_subscriber::EnvFilter. Using defaults.");
                "orgasync=debug,simulate=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = SimulatedOrganizations::new(args.throttle_every, Duration::from_millis(args.latency_ms));
    let client = OrganizationsAsyncClient::with_sizing(backend, PoolSizing::Fixed(args.threads))?;

    let handles = (0..args.accounts)
        .map(|i| {
            let request = CreateAccountRequest {
                email: format!("member-{i}@example.com"),
                account_name: format!("member-{i}"),
                ..Default::default()
            };
            client.create_account_async_with_handler(
                request,
                FnHandler::new(
                    |request: &CreateAccountRequest, result: &CreateAccountResult| {
                        let account_id = result
                            .create_account_status
                            .as_ref()
                            .and_then(|status| status.account_id.as_deref())
                            .unwrap_or("?");
                        tracing::info!("Created {} as {}", request.account_name, account_id);
                    },
                    |err: &OrganizationsError| {
                        tracing::warn!("CreateAccount failed ({}): {}", err.error_code(), err);
                    },
                ),
            )
        })
        .collect::<Vec<_>>();

    let outcomes = join_all(handles).await;
    let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    tracing::info!(
        "{} of {} accounts created, {} failed",
        outcomes.len() - failed,
        outcomes.len(),
        failed
    );

    match client.list_accounts_async(ListAccountsRequest::default()).await {
        Ok(listed) => {
            for account in listed.accounts {
                tracing::info!("{} {} {:?}", account.id, account.name, account.status);
            }
        }
        Err(err) => tracing::warn!("ListAccounts failed: {}", err),
    }

    if args.graceful {
        client.executor().shutdown();
        let executor = client.executor().clone();
        let drained =
            tokio::task::spawn_blocking(move || executor.await_termination(Duration::from_secs(10)))
                .await?;
        tracing::info!("Worker pool drained: {}", drained);
    }
    client.shutdown();

    Ok(ExitCode::SUCCESS)
}
