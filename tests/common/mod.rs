#![allow(dead_code)]

use crossbeam::channel::{Receiver, Sender};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use orgasync::model::{
    Account, AccountStatus, CreateAccountRequest, CreateAccountResult, CreateAccountState,
    CreateAccountStatus, DescribeAccountRequest, DescribeAccountResult,
};
use orgasync::{AsyncHandler, Organizations, OrganizationsError};

pub const WAIT: Duration = Duration::from_secs(5);

pub fn describe(account_id: &str) -> DescribeAccountRequest {
    DescribeAccountRequest {
        account_id: account_id.to_string(),
    }
}

pub fn active_account(account_id: &str) -> DescribeAccountResult {
    DescribeAccountResult {
        account: Some(Account {
            id: account_id.to_string(),
            name: format!("account-{account_id}"),
            status: AccountStatus::Active,
            ..Default::default()
        }),
    }
}

/// Answers `DescribeAccount` for numeric ids; odd ids are reported missing.
/// `CreateAccount` is always throttled.
#[derive(Default)]
pub struct StaticOrganizations {
    pub calls: AtomicUsize,
    pub shutdowns: AtomicUsize,
}

impl StaticOrganizations {
    pub fn expected(&self, request: &DescribeAccountRequest) -> Result<DescribeAccountResult, OrganizationsError> {
        match request.account_id.parse::<u64>() {
            Ok(n) if n % 2 == 1 => Err(OrganizationsError::not_found(
                "Account",
                request.account_id.clone(),
            )),
            Ok(_) => Ok(active_account(&request.account_id)),
            Err(_) => Err(OrganizationsError::validation("AccountId must be numeric")),
        }
    }
}

impl Organizations for StaticOrganizations {
    fn describe_account(
        &self,
        request: &DescribeAccountRequest,
    ) -> Result<DescribeAccountResult, OrganizationsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.account_id == "123" {
            return Ok(active_account("123"));
        }
        self.expected(request)
    }

    fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<CreateAccountResult, OrganizationsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.account_name == "ok" {
            return Ok(CreateAccountResult {
                create_account_status: Some(CreateAccountStatus {
                    id: "car-1".into(),
                    account_name: request.account_name.clone(),
                    state: CreateAccountState::InProgress,
                    ..Default::default()
                }),
            });
        }
        Err(OrganizationsError::throttling("Rate exceeded for CreateAccount"))
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// Blocks every `DescribeAccount` call until the test releases it.
pub struct GatedOrganizations {
    pub started: Sender<String>,
    pub release: Receiver<()>,
    pub calls: AtomicUsize,
}

impl Organizations for GatedOrganizations {
    fn describe_account(
        &self,
        request: &DescribeAccountRequest,
    ) -> Result<DescribeAccountResult, OrganizationsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.send(request.account_id.clone());
        let _ = self.release.recv();
        Ok(active_account(&request.account_id))
    }
}

/// Records every callback it receives, in order.
#[derive(Default)]
pub struct Recorder {
    pub successes: Mutex<Vec<(DescribeAccountRequest, DescribeAccountResult)>>,
    pub failures: Mutex<Vec<OrganizationsError>>,
}

impl Recorder {
    pub fn total(&self) -> usize {
        self.successes.lock().unwrap().len() + self.failures.lock().unwrap().len()
    }
}

impl AsyncHandler<DescribeAccountRequest, DescribeAccountResult> for Recorder {
    fn on_success(&self, request: &DescribeAccountRequest, result: &DescribeAccountResult) {
        self.successes
            .lock()
            .unwrap()
            .push((request.clone(), result.clone()));
    }

    fn on_error(&self, error: &OrganizationsError) {
        self.failures.lock().unwrap().push(error.clone());
    }
}

#[derive(Default)]
pub struct CreateRecorder {
    pub successes: AtomicUsize,
    pub failures: Mutex<Vec<OrganizationsError>>,
}

impl AsyncHandler<CreateAccountRequest, CreateAccountResult> for CreateRecorder {
    fn on_success(&self, _request: &CreateAccountRequest, _result: &CreateAccountResult) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &OrganizationsError) {
        self.failures.lock().unwrap().push(error.clone());
    }
}

/// Records callbacks for operations invoked by name.
#[derive(Default)]
pub struct JsonRecorder {
    pub successes: Mutex<Vec<(Value, Value)>>,
    pub failures: Mutex<Vec<OrganizationsError>>,
}

impl AsyncHandler<Value, Value> for JsonRecorder {
    fn on_success(&self, request: &Value, result: &Value) {
        self.successes
            .lock()
            .unwrap()
            .push((request.clone(), result.clone()));
    }

    fn on_error(&self, error: &OrganizationsError) {
        self.failures.lock().unwrap().push(error.clone());
    }
}
