//! Request, result and resource shapes of the Organizations API.
//!
//! These are plain values. Field names serialize in the service's PascalCase
//! JSON form and every field is optional on input.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Timestamps travel as fractional seconds since the Unix epoch.
mod epoch_seconds {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(value: &Option<SystemTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => {
                let secs = match time.duration_since(UNIX_EPOCH) {
                    Ok(after) => after.as_secs_f64(),
                    Err(before) => -before.duration().as_secs_f64(),
                };
                s.serialize_some(&secs)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SystemTime>, D::Error> {
        let Some(secs) = Option::<f64>::deserialize(d)? else {
            return Ok(None);
        };
        let offset = Duration::try_from_secs_f64(secs.abs()).map_err(D::Error::custom)?;
        let time = if secs >= 0.0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        time.map(Some)
            .ok_or_else(|| D::Error::custom(format!("timestamp {secs} out of range")))
    }
}

macro_rules! shape {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase", default)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
        }
    };
}

macro_rules! enumeration {
    ($(#[$meta:meta])* $name:ident { $default:ident $(, $variant:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            #[default]
            $default,
            $($variant,)*
        }
    };
}

enumeration!(AccountStatus { Active, Suspended });
enumeration!(AccountJoinedMethod { Invited, Created });
enumeration!(OrganizationFeatureSet { All, ConsolidatedBilling });
enumeration!(PolicyType { ServiceControlPolicy });
enumeration!(PolicyTypeStatus { Enabled, PendingEnable, PendingDisable });
enumeration!(TargetType { Account, OrganizationalUnit, Root });
enumeration!(ChildType { Account, OrganizationalUnit });
enumeration!(ParentType { Root, OrganizationalUnit });
enumeration!(HandshakeState { Requested, Open, Canceled, Accepted, Declined, Expired });
enumeration!(ActionType { Invite, EnableFullControl, ApproveFullControl });
enumeration!(HandshakePartyType { Account, Organization, Email });
enumeration!(CreateAccountState { InProgress, Succeeded, Failed });
enumeration!(IamUserAccessToBilling { Allow, Deny });

shape!(Account {
    id: String,
    arn: String,
    email: String,
    name: String,
    status: AccountStatus,
    joined_method: AccountJoinedMethod,
    #[serde(with = "epoch_seconds")]
    joined_timestamp: Option<SystemTime>,
});

shape!(PolicyTypeSummary {
    #[serde(rename = "Type")]
    policy_type: PolicyType,
    status: PolicyTypeStatus,
});

shape!(Organization {
    id: String,
    arn: String,
    feature_set: OrganizationFeatureSet,
    master_account_arn: String,
    master_account_id: String,
    master_account_email: String,
    available_policy_types: Vec<PolicyTypeSummary>,
});

shape!(OrganizationalUnit {
    id: String,
    arn: String,
    name: String,
});

shape!(Root {
    id: String,
    arn: String,
    name: String,
    policy_types: Vec<PolicyTypeSummary>,
});

shape!(PolicySummary {
    id: String,
    arn: String,
    name: String,
    description: String,
    #[serde(rename = "Type")]
    policy_type: PolicyType,
    aws_managed: bool,
});

shape!(Policy {
    policy_summary: PolicySummary,
    content: String,
});

shape!(PolicyTargetSummary {
    target_id: String,
    arn: String,
    name: String,
    #[serde(rename = "Type")]
    target_type: TargetType,
});

shape!(HandshakeParty {
    id: String,
    #[serde(rename = "Type")]
    party_type: HandshakePartyType,
});

shape!(HandshakeResource {
    value: String,
    #[serde(rename = "Type")]
    resource_type: String,
    resources: Vec<HandshakeResource>,
});

shape!(Handshake {
    id: String,
    arn: String,
    parties: Vec<HandshakeParty>,
    state: HandshakeState,
    #[serde(with = "epoch_seconds")]
    requested_timestamp: Option<SystemTime>,
    #[serde(with = "epoch_seconds")]
    expiration_timestamp: Option<SystemTime>,
    action: ActionType,
    resources: Vec<HandshakeResource>,
});

shape!(HandshakeFilter {
    action_type: Option<ActionType>,
    parent_handshake_id: Option<String>,
});

shape!(CreateAccountStatus {
    id: String,
    account_name: String,
    state: CreateAccountState,
    #[serde(with = "epoch_seconds")]
    requested_timestamp: Option<SystemTime>,
    #[serde(with = "epoch_seconds")]
    completed_timestamp: Option<SystemTime>,
    account_id: Option<String>,
    failure_reason: Option<String>,
});

shape!(Child {
    id: String,
    #[serde(rename = "Type")]
    child_type: ChildType,
});

shape!(Parent {
    id: String,
    #[serde(rename = "Type")]
    parent_type: ParentType,
});

// Handshakes

shape!(AcceptHandshakeRequest { handshake_id: String });
shape!(AcceptHandshakeResult { handshake: Option<Handshake> });

shape!(CancelHandshakeRequest { handshake_id: String });
shape!(CancelHandshakeResult { handshake: Option<Handshake> });

shape!(DeclineHandshakeRequest { handshake_id: String });
shape!(DeclineHandshakeResult { handshake: Option<Handshake> });

shape!(DescribeHandshakeRequest { handshake_id: String });
shape!(DescribeHandshakeResult { handshake: Option<Handshake> });

shape!(EnableFullControlRequest {});
shape!(EnableFullControlResult { handshake: Option<Handshake> });

shape!(InviteAccountToOrganizationRequest {
    target: HandshakeParty,
    notes: Option<String>,
});
shape!(InviteAccountToOrganizationResult { handshake: Option<Handshake> });

shape!(ListHandshakesForAccountRequest {
    filter: Option<HandshakeFilter>,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListHandshakesForAccountResult {
    handshakes: Vec<Handshake>,
    next_token: Option<String>,
});

shape!(ListHandshakesForOrganizationRequest {
    filter: Option<HandshakeFilter>,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListHandshakesForOrganizationResult {
    handshakes: Vec<Handshake>,
    next_token: Option<String>,
});

// Accounts

shape!(CreateAccountRequest {
    email: String,
    account_name: String,
    role_name: Option<String>,
    iam_user_access_to_billing: Option<IamUserAccessToBilling>,
});
shape!(CreateAccountResult { create_account_status: Option<CreateAccountStatus> });

shape!(DescribeAccountRequest { account_id: String });
shape!(DescribeAccountResult { account: Option<Account> });

shape!(DescribeCreateAccountStatusRequest { create_account_request_id: String });
shape!(DescribeCreateAccountStatusResult { create_account_status: Option<CreateAccountStatus> });

shape!(ListAccountsRequest {
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListAccountsResult {
    accounts: Vec<Account>,
    next_token: Option<String>,
});

shape!(ListAccountsForParentRequest {
    parent_id: String,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListAccountsForParentResult {
    accounts: Vec<Account>,
    next_token: Option<String>,
});

shape!(ListCreateAccountStatusRequest {
    states: Vec<CreateAccountState>,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListCreateAccountStatusResult {
    create_account_statuses: Vec<CreateAccountStatus>,
    next_token: Option<String>,
});

shape!(MoveAccountRequest {
    account_id: String,
    source_parent_id: String,
    destination_parent_id: String,
});
shape!(MoveAccountResult {});

shape!(RemoveAccountFromOrganizationRequest { account_id: String });
shape!(RemoveAccountFromOrganizationResult {});

// Organization

shape!(CreateOrganizationRequest { feature_set: Option<OrganizationFeatureSet> });
shape!(CreateOrganizationResult { organization: Option<Organization> });

shape!(DeleteOrganizationRequest {});
shape!(DeleteOrganizationResult {});

shape!(DescribeOrganizationRequest {});
shape!(DescribeOrganizationResult { organization: Option<Organization> });

shape!(LeaveOrganizationRequest {});
shape!(LeaveOrganizationResult {});

// Organizational units, roots and hierarchy

shape!(CreateOrganizationalUnitRequest {
    parent_id: String,
    name: String,
});
shape!(CreateOrganizationalUnitResult { organizational_unit: Option<OrganizationalUnit> });

shape!(DeleteOrganizationalUnitRequest { organizational_unit_id: String });
shape!(DeleteOrganizationalUnitResult {});

shape!(DescribeOrganizationalUnitRequest { organizational_unit_id: String });
shape!(DescribeOrganizationalUnitResult { organizational_unit: Option<OrganizationalUnit> });

shape!(UpdateOrganizationalUnitRequest {
    organizational_unit_id: String,
    name: Option<String>,
});
shape!(UpdateOrganizationalUnitResult { organizational_unit: Option<OrganizationalUnit> });

shape!(ListOrganizationalUnitsForParentRequest {
    parent_id: String,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListOrganizationalUnitsForParentResult {
    organizational_units: Vec<OrganizationalUnit>,
    next_token: Option<String>,
});

shape!(ListChildrenRequest {
    parent_id: String,
    child_type: ChildType,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListChildrenResult {
    children: Vec<Child>,
    next_token: Option<String>,
});

shape!(ListParentsRequest {
    child_id: String,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListParentsResult {
    parents: Vec<Parent>,
    next_token: Option<String>,
});

shape!(ListRootsRequest {
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListRootsResult {
    roots: Vec<Root>,
    next_token: Option<String>,
});

// Policies

shape!(CreatePolicyRequest {
    content: String,
    description: String,
    name: String,
    #[serde(rename = "Type")]
    policy_type: PolicyType,
});
shape!(CreatePolicyResult { policy: Option<Policy> });

shape!(DeletePolicyRequest { policy_id: String });
shape!(DeletePolicyResult {});

shape!(DescribePolicyRequest { policy_id: String });
shape!(DescribePolicyResult { policy: Option<Policy> });

shape!(UpdatePolicyRequest {
    policy_id: String,
    name: Option<String>,
    description: Option<String>,
    content: Option<String>,
});
shape!(UpdatePolicyResult { policy: Option<Policy> });

shape!(AttachPolicyRequest {
    policy_id: String,
    target_id: String,
});
shape!(AttachPolicyResult {});

shape!(DetachPolicyRequest {
    policy_id: String,
    target_id: String,
});
shape!(DetachPolicyResult {});

shape!(EnablePolicyTypeRequest {
    root_id: String,
    policy_type: PolicyType,
});
shape!(EnablePolicyTypeResult { root: Option<Root> });

shape!(DisablePolicyTypeRequest {
    root_id: String,
    policy_type: PolicyType,
});
shape!(DisablePolicyTypeResult { root: Option<Root> });

shape!(ListPoliciesRequest {
    filter: PolicyType,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListPoliciesResult {
    policies: Vec<PolicySummary>,
    next_token: Option<String>,
});

shape!(ListPoliciesForTargetRequest {
    target_id: String,
    filter: PolicyType,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListPoliciesForTargetResult {
    policies: Vec<PolicySummary>,
    next_token: Option<String>,
});

shape!(ListTargetsForPolicyRequest {
    policy_id: String,
    next_token: Option<String>,
    max_results: Option<u32>,
});
shape!(ListTargetsForPolicyResult {
    targets: Vec<PolicyTargetSummary>,
    next_token: Option<String>,
});
