//! The operation table.
//!
//! Each row names one Organizations operation and its request/result pair.
//! From the table the macro derives the blocking [`Organizations`] trait, one
//! [`Operation`] marker type per row, the named `*_async` methods of
//! [`OrganizationsAsyncClient`] and the name → function table used for
//! dispatch by name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OrganizationsAsyncClient;
use crate::error::OrganizationsError;
use crate::executor::Executor;
use crate::handle::ResponseHandle;
use crate::handler::AsyncHandler;
use crate::model::*;

/// One request/result pair of the management API, bound to the blocking
/// method that executes it.
pub trait Operation: 'static {
    const NAME: &'static str;

    type Request: Send + 'static;
    type Response: Send + 'static;

    fn invoke<C>(client: &C, request: &Self::Request) -> Result<Self::Response, OrganizationsError>
    where
        C: Organizations + ?Sized;
}

pub(crate) type RawOperation = fn(&dyn Organizations, &Value) -> Result<Value, OrganizationsError>;

fn invoke_json<O>(client: &dyn Organizations, request: &Value) -> Result<Value, OrganizationsError>
where
    O: Operation,
    O::Request: DeserializeOwned,
    O::Response: Serialize,
{
    let request = O::Request::deserialize(request)
        .map_err(|e| OrganizationsError::Serialization(e.to_string()))?;
    let response = O::invoke(client, &request)?;
    serde_json::to_value(&response).map_err(|e| OrganizationsError::Serialization(e.to_string()))
}

macro_rules! operations {
    ($(
        $(#[$doc:meta])*
        $op:ident => $method:ident, $async_method:ident, $with_handler:ident ($req:ty) -> $res:ty;
    )*) => {
        /// The blocking Organizations client.
        ///
        /// Signing, retries, transport and marshalling all live behind this
        /// trait. Every operation defaults to
        /// [`OrganizationsError::Unsupported`], so an implementation only has
        /// to provide what it actually serves.
        pub trait Organizations: Send + Sync + 'static {
            $(
                $(#[$doc])*
                fn $method(&self, request: &$req) -> Result<$res, OrganizationsError> {
                    let _ = request;
                    Err(OrganizationsError::unsupported(stringify!($op)))
                }
            )*

            /// Release whatever the client holds. Called once by
            /// [`OrganizationsAsyncClient::shutdown`].
            fn shutdown(&self) {}
        }

        $(
            #[doc = concat!("Marker for the `", stringify!($op), "` operation.")]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $op;

            impl Operation for $op {
                const NAME: &'static str = stringify!($op);

                type Request = $req;
                type Response = $res;

                fn invoke<C>(client: &C, request: &$req) -> Result<$res, OrganizationsError>
                where
                    C: Organizations + ?Sized,
                {
                    client.$method(request)
                }
            }
        )*

        impl<C, X> OrganizationsAsyncClient<C, X>
        where
            C: Organizations,
            X: Executor,
        {
            $(
                #[doc = concat!("Run [`Organizations::", stringify!($method), "`] on the executor.")]
                pub fn $async_method(&self, request: $req) -> ResponseHandle<$res> {
                    self.submit::<$op>(request)
                }

                #[doc = concat!("Run [`Organizations::", stringify!($method), "`] on the executor and notify `handler`.")]
                pub fn $with_handler<H>(&self, request: $req, handler: H) -> ResponseHandle<$res>
                where
                    H: AsyncHandler<$req, $res>,
                {
                    self.submit_with_handler::<$op, H>(request, handler)
                }
            )*
        }

        /// Names of every operation in the table.
        pub const OPERATION_NAMES: &[&str] = &[$(stringify!($op)),*];

        pub(crate) fn raw_operations() -> Vec<(&'static str, RawOperation)> {
            vec![$((stringify!($op), invoke_json::<$op> as RawOperation)),*]
        }
    };
}

operations! {
    /// Accept an invitation or a request to enable full control.
    AcceptHandshake => accept_handshake, accept_handshake_async, accept_handshake_async_with_handler
        (AcceptHandshakeRequest) -> AcceptHandshakeResult;
    AttachPolicy => attach_policy, attach_policy_async, attach_policy_async_with_handler
        (AttachPolicyRequest) -> AttachPolicyResult;
    CancelHandshake => cancel_handshake, cancel_handshake_async, cancel_handshake_async_with_handler
        (CancelHandshakeRequest) -> CancelHandshakeResult;
    /// Start creating a member account. Creation finishes asynchronously on
    /// the service side; poll with `describe_create_account_status`.
    CreateAccount => create_account, create_account_async, create_account_async_with_handler
        (CreateAccountRequest) -> CreateAccountResult;
    CreateOrganization => create_organization, create_organization_async, create_organization_async_with_handler
        (CreateOrganizationRequest) -> CreateOrganizationResult;
    CreateOrganizationalUnit => create_organizational_unit, create_organizational_unit_async, create_organizational_unit_async_with_handler
        (CreateOrganizationalUnitRequest) -> CreateOrganizationalUnitResult;
    CreatePolicy => create_policy, create_policy_async, create_policy_async_with_handler
        (CreatePolicyRequest) -> CreatePolicyResult;
    DeclineHandshake => decline_handshake, decline_handshake_async, decline_handshake_async_with_handler
        (DeclineHandshakeRequest) -> DeclineHandshakeResult;
    /// Only possible once every member account has been removed.
    DeleteOrganization => delete_organization, delete_organization_async, delete_organization_async_with_handler
        (DeleteOrganizationRequest) -> DeleteOrganizationResult;
    DeleteOrganizationalUnit => delete_organizational_unit, delete_organizational_unit_async, delete_organizational_unit_async_with_handler
        (DeleteOrganizationalUnitRequest) -> DeleteOrganizationalUnitResult;
    DeletePolicy => delete_policy, delete_policy_async, delete_policy_async_with_handler
        (DeletePolicyRequest) -> DeletePolicyResult;
    DescribeAccount => describe_account, describe_account_async, describe_account_async_with_handler
        (DescribeAccountRequest) -> DescribeAccountResult;
    DescribeCreateAccountStatus => describe_create_account_status, describe_create_account_status_async, describe_create_account_status_async_with_handler
        (DescribeCreateAccountStatusRequest) -> DescribeCreateAccountStatusResult;
    DescribeHandshake => describe_handshake, describe_handshake_async, describe_handshake_async_with_handler
        (DescribeHandshakeRequest) -> DescribeHandshakeResult;
    DescribeOrganization => describe_organization, describe_organization_async, describe_organization_async_with_handler
        (DescribeOrganizationRequest) -> DescribeOrganizationResult;
    DescribeOrganizationalUnit => describe_organizational_unit, describe_organizational_unit_async, describe_organizational_unit_async_with_handler
        (DescribeOrganizationalUnitRequest) -> DescribeOrganizationalUnitResult;
    DescribePolicy => describe_policy, describe_policy_async, describe_policy_async_with_handler
        (DescribePolicyRequest) -> DescribePolicyResult;
    DetachPolicy => detach_policy, detach_policy_async, detach_policy_async_with_handler
        (DetachPolicyRequest) -> DetachPolicyResult;
    DisablePolicyType => disable_policy_type, disable_policy_type_async, disable_policy_type_async_with_handler
        (DisablePolicyTypeRequest) -> DisablePolicyTypeResult;
    /// Ask every member account to approve full control; answers arrive as
    /// handshakes.
    EnableFullControl => enable_full_control, enable_full_control_async, enable_full_control_async_with_handler
        (EnableFullControlRequest) -> EnableFullControlResult;
    EnablePolicyType => enable_policy_type, enable_policy_type_async, enable_policy_type_async_with_handler
        (EnablePolicyTypeRequest) -> EnablePolicyTypeResult;
    InviteAccountToOrganization => invite_account_to_organization, invite_account_to_organization_async, invite_account_to_organization_async_with_handler
        (InviteAccountToOrganizationRequest) -> InviteAccountToOrganizationResult;
    LeaveOrganization => leave_organization, leave_organization_async, leave_organization_async_with_handler
        (LeaveOrganizationRequest) -> LeaveOrganizationResult;
    ListAccounts => list_accounts, list_accounts_async, list_accounts_async_with_handler
        (ListAccountsRequest) -> ListAccountsResult;
    ListAccountsForParent => list_accounts_for_parent, list_accounts_for_parent_async, list_accounts_for_parent_async_with_handler
        (ListAccountsForParentRequest) -> ListAccountsForParentResult;
    ListChildren => list_children, list_children_async, list_children_async_with_handler
        (ListChildrenRequest) -> ListChildrenResult;
    ListCreateAccountStatus => list_create_account_status, list_create_account_status_async, list_create_account_status_async_with_handler
        (ListCreateAccountStatusRequest) -> ListCreateAccountStatusResult;
    ListHandshakesForAccount => list_handshakes_for_account, list_handshakes_for_account_async, list_handshakes_for_account_async_with_handler
        (ListHandshakesForAccountRequest) -> ListHandshakesForAccountResult;
    ListHandshakesForOrganization => list_handshakes_for_organization, list_handshakes_for_organization_async, list_handshakes_for_organization_async_with_handler
        (ListHandshakesForOrganizationRequest) -> ListHandshakesForOrganizationResult;
    ListOrganizationalUnitsForParent => list_organizational_units_for_parent, list_organizational_units_for_parent_async, list_organizational_units_for_parent_async_with_handler
        (ListOrganizationalUnitsForParentRequest) -> ListOrganizationalUnitsForParentResult;
    ListParents => list_parents, list_parents_async, list_parents_async_with_handler
        (ListParentsRequest) -> ListParentsResult;
    ListPolicies => list_policies, list_policies_async, list_policies_async_with_handler
        (ListPoliciesRequest) -> ListPoliciesResult;
    ListPoliciesForTarget => list_policies_for_target, list_policies_for_target_async, list_policies_for_target_async_with_handler
        (ListPoliciesForTargetRequest) -> ListPoliciesForTargetResult;
    ListRoots => list_roots, list_roots_async, list_roots_async_with_handler
        (ListRootsRequest) -> ListRootsResult;
    ListTargetsForPolicy => list_targets_for_policy, list_targets_for_policy_async, list_targets_for_policy_async_with_handler
        (ListTargetsForPolicyRequest) -> ListTargetsForPolicyResult;
    MoveAccount => move_account, move_account_async, move_account_async_with_handler
        (MoveAccountRequest) -> MoveAccountResult;
    RemoveAccountFromOrganization => remove_account_from_organization, remove_account_from_organization_async, remove_account_from_organization_async_with_handler
        (RemoveAccountFromOrganizationRequest) -> RemoveAccountFromOrganizationResult;
    UpdateOrganizationalUnit => update_organizational_unit, update_organizational_unit_async, update_organizational_unit_async_with_handler
        (UpdateOrganizationalUnitRequest) -> UpdateOrganizationalUnitResult;
    UpdatePolicy => update_policy, update_policy_async, update_policy_async_with_handler
        (UpdatePolicyRequest) -> UpdatePolicyResult;
}
