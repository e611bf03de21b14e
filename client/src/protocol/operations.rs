//! # Operation Payloads
//!
//! One struct per registered operation kind, fields in wire order. The
//! `impl_encode_struct!` invocation under each struct *is* the canonical
//! layout; serde derives give the node-side JSON object with the same field
//! names. Business semantics of these operations live on the chain — the
//! client's job stops at faithful layout.
//!
//! Optional fields render as presence-flagged bytes on the wire and are
//! omitted from JSON when absent.

use serde::{Deserialize, Serialize};

use crate::codec::{impl_encode_struct, FlatSet, TimePointSec};
use crate::crypto::PublicKey;
use crate::object_id::ObjectId;
use crate::protocol::authority::Authority;
use crate::protocol::registry::OpWrapper;
use crate::protocol::types::{
    AccountOptions, Asset, AssetOptions, BitassetOptions, ContractArg, MemoData, Price, PriceFeed,
    VestingPolicyInitializer, WorkerInitializer,
};

// ---------------------------------------------------------------------------
// Transfers & orders
// ---------------------------------------------------------------------------

/// Move an amount of some asset between accounts, optionally with an
/// encrypted memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ObjectId,
    pub to: ObjectId,
    pub amount: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<MemoData>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(Transfer { from, to, amount, memo, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrderCreate {
    pub seller: ObjectId,
    pub amount_to_sell: Asset,
    pub min_to_receive: Asset,
    pub expiration: TimePointSec,
    pub fill_or_kill: bool,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(LimitOrderCreate {
    seller,
    amount_to_sell,
    min_to_receive,
    expiration,
    fill_or_kill,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrderCancel {
    pub fee_paying_account: ObjectId,
    pub order: ObjectId,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(LimitOrderCancel { fee_paying_account, order, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOrderUpdate {
    pub funding_account: ObjectId,
    pub delta_collateral: Asset,
    pub delta_debt: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CallOrderUpdate {
    funding_account,
    delta_collateral,
    delta_debt,
    extensions,
});

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCreate {
    pub registrar: ObjectId,
    pub name: String,
    pub owner: Authority,
    pub active: Authority,
    pub options: AccountOptions,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AccountCreate {
    registrar,
    name,
    owner,
    active,
    options,
    extensions,
});

/// Account mutation. `lock_with_vote` leads the layout — an oddity of this
/// chain's fork, but the node expects it first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_with_vote: Option<(u32, Asset)>,
    pub account: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Authority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Authority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_options: Option<AccountOptions>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AccountUpdate {
    lock_with_vote,
    account,
    owner,
    active,
    new_options,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUpgrade {
    pub account_to_upgrade: ObjectId,
    pub upgrade_to_lifetime_member: bool,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AccountUpgrade {
    account_to_upgrade,
    upgrade_to_lifetime_member,
    extensions,
});

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCreate {
    pub issuer: ObjectId,
    pub symbol: String,
    pub precision: u8,
    pub common_options: AssetOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitasset_opts: Option<BitassetOptions>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetCreate {
    issuer,
    symbol,
    precision,
    common_options,
    bitasset_opts,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdate {
    pub issuer: ObjectId,
    pub asset_to_update: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_issuer: Option<ObjectId>,
    pub new_options: AssetOptions,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetUpdate {
    issuer,
    asset_to_update,
    new_issuer,
    new_options,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdateBitasset {
    pub issuer: ObjectId,
    pub asset_to_update: ObjectId,
    pub new_options: BitassetOptions,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetUpdateBitasset {
    issuer,
    asset_to_update,
    new_options,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdateFeedProducers {
    pub issuer: ObjectId,
    pub asset_to_update: ObjectId,
    pub new_feed_producers: Vec<ObjectId>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetUpdateFeedProducers {
    issuer,
    asset_to_update,
    new_feed_producers,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetIssue {
    pub issuer: ObjectId,
    pub asset_to_issue: Asset,
    pub issue_to_account: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<MemoData>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetIssue {
    issuer,
    asset_to_issue,
    issue_to_account,
    memo,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReserve {
    pub payer: ObjectId,
    pub amount_to_reserve: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetReserve { payer, amount_to_reserve, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFundFeePool {
    pub from_account: ObjectId,
    pub asset_id: ObjectId,
    pub amount: i64,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetFundFeePool { from_account, asset_id, amount, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSettle {
    pub account: ObjectId,
    pub amount: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetSettle { account, amount, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSettleCancel {
    pub settlement: ObjectId,
    pub account: ObjectId,
    pub amount: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetSettleCancel { settlement, account, amount, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGlobalSettle {
    pub issuer: ObjectId,
    pub asset_to_settle: ObjectId,
    pub settle_price: Price,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetGlobalSettle {
    issuer,
    asset_to_settle,
    settle_price,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPublishFeed {
    pub publisher: ObjectId,
    pub asset_id: ObjectId,
    pub feed: PriceFeed,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetPublishFeed { publisher, asset_id, feed, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClaimFees {
    pub issuer: ObjectId,
    pub amount_to_claim: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(AssetClaimFees { issuer, amount_to_claim, extensions });

// ---------------------------------------------------------------------------
// Witnesses & committee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WitnessCreate {
    pub witness_account: ObjectId,
    pub url: String,
    pub block_signing_key: PublicKey,
}

impl_encode_struct!(WitnessCreate { witness_account, url, block_signing_key });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WitnessUpdate {
    pub witness: ObjectId,
    pub witness_account: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_signing_key: Option<PublicKey>,
    pub work_status: bool,
}

impl_encode_struct!(WitnessUpdate {
    witness,
    witness_account,
    new_url,
    new_signing_key,
    work_status,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeMemberCreate {
    pub committee_member_account: ObjectId,
    pub url: String,
}

impl_encode_struct!(CommitteeMemberCreate { committee_member_account, url });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeMemberUpdate {
    pub committee_member: ObjectId,
    pub committee_member_account: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_url: Option<String>,
    pub work_status: bool,
}

impl_encode_struct!(CommitteeMemberUpdate {
    committee_member,
    committee_member_account,
    new_url,
    work_status,
});

/// Parameter update with an empty client-side layout; the parameter struct
/// is proposed through raw JSON on this chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeMemberUpdateGlobalParameters {}

impl crate::codec::Encode for CommitteeMemberUpdateGlobalParameters {
    fn encode(&self, _out: &mut Vec<u8>) {}
}

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalCreate {
    pub fee_paying_account: ObjectId,
    pub expiration_time: TimePointSec,
    pub proposed_ops: Vec<OpWrapper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_period_seconds: Option<u32>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(ProposalCreate {
    fee_paying_account,
    expiration_time,
    proposed_ops,
    review_period_seconds,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalUpdate {
    pub fee_paying_account: ObjectId,
    pub proposal: ObjectId,
    #[serde(default)]
    pub active_approvals_to_add: Vec<ObjectId>,
    #[serde(default)]
    pub active_approvals_to_remove: Vec<ObjectId>,
    #[serde(default)]
    pub owner_approvals_to_add: Vec<ObjectId>,
    #[serde(default)]
    pub owner_approvals_to_remove: Vec<ObjectId>,
    #[serde(default)]
    pub key_approvals_to_add: Vec<PublicKey>,
    #[serde(default)]
    pub key_approvals_to_remove: Vec<PublicKey>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(ProposalUpdate {
    fee_paying_account,
    proposal,
    active_approvals_to_add,
    active_approvals_to_remove,
    owner_approvals_to_add,
    owner_approvals_to_remove,
    key_approvals_to_add,
    key_approvals_to_remove,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDelete {
    pub fee_paying_account: ObjectId,
    pub using_owner_authority: bool,
    pub proposal: ObjectId,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(ProposalDelete {
    fee_paying_account,
    using_owner_authority,
    proposal,
    extensions,
});

// ---------------------------------------------------------------------------
// Withdraw permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawPermissionCreate {
    pub withdraw_from_account: ObjectId,
    pub authorized_account: ObjectId,
    pub withdrawal_limit: Asset,
    pub withdrawal_period_sec: u32,
    pub periods_until_expiration: u32,
    pub period_start_time: TimePointSec,
}

impl_encode_struct!(WithdrawPermissionCreate {
    withdraw_from_account,
    authorized_account,
    withdrawal_limit,
    withdrawal_period_sec,
    periods_until_expiration,
    period_start_time,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawPermissionUpdate {
    pub withdraw_from_account: ObjectId,
    pub authorized_account: ObjectId,
    pub permission_to_update: ObjectId,
    pub withdrawal_limit: Asset,
    pub withdrawal_period_sec: u32,
    pub period_start_time: TimePointSec,
    pub periods_until_expiration: u32,
}

impl_encode_struct!(WithdrawPermissionUpdate {
    withdraw_from_account,
    authorized_account,
    permission_to_update,
    withdrawal_limit,
    withdrawal_period_sec,
    period_start_time,
    periods_until_expiration,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawPermissionClaim {
    pub withdraw_permission: ObjectId,
    pub withdraw_from_account: ObjectId,
    pub withdraw_to_account: ObjectId,
    pub amount_to_withdraw: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<MemoData>,
}

impl_encode_struct!(WithdrawPermissionClaim {
    withdraw_permission,
    withdraw_from_account,
    withdraw_to_account,
    amount_to_withdraw,
    memo,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawPermissionDelete {
    pub withdraw_from_account: ObjectId,
    pub authorized_account: ObjectId,
    pub withdrawal_permission: ObjectId,
}

impl_encode_struct!(WithdrawPermissionDelete {
    withdraw_from_account,
    authorized_account,
    withdrawal_permission,
});

// ---------------------------------------------------------------------------
// Vesting, workers & balances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingBalanceCreate {
    pub creator: ObjectId,
    pub owner: ObjectId,
    pub amount: Asset,
    pub policy: VestingPolicyInitializer,
}

impl_encode_struct!(VestingBalanceCreate { creator, owner, amount, policy });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingBalanceWithdraw {
    pub vesting_balance: ObjectId,
    pub owner: ObjectId,
    pub amount: Asset,
}

impl_encode_struct!(VestingBalanceWithdraw { vesting_balance, owner, amount });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<ObjectId>,
    pub work_begin_date: TimePointSec,
    pub work_end_date: TimePointSec,
    pub daily_pay: u64,
    pub name: String,
    pub describe: String,
    pub initializer: WorkerInitializer,
}

impl_encode_struct!(WorkerCreate {
    beneficiary,
    work_begin_date,
    work_end_date,
    daily_pay,
    name,
    describe,
    initializer,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceClaim {
    pub deposit_to_account: ObjectId,
    pub balance_to_claim: ObjectId,
    pub balance_owner_key: PublicKey,
    pub total_claimed: Asset,
}

impl_encode_struct!(BalanceClaim {
    deposit_to_account,
    balance_to_claim,
    balance_owner_key,
    total_claimed,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidCollateral {
    pub bidder: ObjectId,
    pub additional_collateral: Asset,
    pub debt_covered: Asset,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(BidCollateral {
    bidder,
    additional_collateral,
    debt_covered,
    extensions,
});

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCreate {
    pub owner: ObjectId,
    pub name: String,
    pub data: String,
    pub contract_authority: PublicKey,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(ContractCreate {
    owner,
    name,
    data,
    contract_authority,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallContractFunction {
    pub caller: ObjectId,
    pub contract_id: ObjectId,
    pub function_name: String,
    pub value_list: Vec<ContractArg>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CallContractFunction {
    caller,
    contract_id,
    function_name,
    value_list,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviseContract {
    pub reviser: ObjectId,
    pub contract_id: ObjectId,
    pub data: String,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(ReviseContract { reviser, contract_id, data, extensions });

// ---------------------------------------------------------------------------
// Non-homogeneous assets & world views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterNhAssetCreator {
    pub fee_paying_account: ObjectId,
}

impl_encode_struct!(RegisterNhAssetCreator { fee_paying_account });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorldView {
    pub fee_paying_account: ObjectId,
    pub world_view: String,
}

impl_encode_struct!(CreateWorldView { fee_paying_account, world_view });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelateWorldView {
    pub related_account: ObjectId,
    pub world_view: String,
    pub view_owner: ObjectId,
}

impl_encode_struct!(RelateWorldView { related_account, world_view, view_owner });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNhAsset {
    pub fee_paying_account: ObjectId,
    pub owner: ObjectId,
    pub asset_id: String,
    pub world_view: String,
    pub base_describe: String,
}

impl_encode_struct!(CreateNhAsset {
    fee_paying_account,
    owner,
    asset_id,
    world_view,
    base_describe,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteNhAsset {
    pub fee_paying_account: ObjectId,
    pub nh_asset: ObjectId,
}

impl_encode_struct!(DeleteNhAsset { fee_paying_account, nh_asset });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferNhAsset {
    pub from: ObjectId,
    pub to: ObjectId,
    pub nh_asset: ObjectId,
}

impl_encode_struct!(TransferNhAsset { from, to, nh_asset });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNhAssetOrder {
    pub seller: ObjectId,
    pub otcaccount: ObjectId,
    pub pending_orders_fee: Asset,
    pub nh_asset: ObjectId,
    pub memo: String,
    pub price: Asset,
    pub expiration: TimePointSec,
}

impl_encode_struct!(CreateNhAssetOrder {
    seller,
    otcaccount,
    pending_orders_fee,
    nh_asset,
    memo,
    price,
    expiration,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelNhAssetOrder {
    pub order: ObjectId,
    pub fee_paying_account: ObjectId,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CancelNhAssetOrder { order, fee_paying_account, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillNhAssetOrder {
    pub order: ObjectId,
    pub fee_paying_account: ObjectId,
    pub seller: ObjectId,
    pub nh_asset: ObjectId,
    pub price_amount: String,
    pub price_asset_id: ObjectId,
    pub price_asset_symbol: String,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(FillNhAssetOrder {
    order,
    fee_paying_account,
    seller,
    nh_asset,
    price_amount,
    price_asset_id,
    price_asset_symbol,
    extensions,
});

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFile {
    pub file_owner: ObjectId,
    pub file_name: String,
    pub file_content: String,
}

impl_encode_struct!(CreateFile { file_owner, file_name, file_content });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFileRelateAccount {
    pub file_owner: ObjectId,
    pub file_id: ObjectId,
    pub related_account: Vec<ObjectId>,
}

impl_encode_struct!(AddFileRelateAccount { file_owner, file_id, related_account });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSignature {
    pub signature_account: ObjectId,
    pub file_id: ObjectId,
    pub signature: String,
}

impl_encode_struct!(FileSignature { signature_account, file_id, signature });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelateParentFile {
    pub sub_file_owner: ObjectId,
    pub parent_file: ObjectId,
    pub parent_file_owner: ObjectId,
    pub sub_file: ObjectId,
}

impl_encode_struct!(RelateParentFile {
    sub_file_owner,
    parent_file,
    parent_file_owner,
    sub_file,
});

// ---------------------------------------------------------------------------
// Crontabs
// ---------------------------------------------------------------------------

/// Schedule a bundle of operations for repeated execution by the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrontabCreate {
    pub crontab_creator: ObjectId,
    pub crontab_ops: Vec<OpWrapper>,
    pub start_time: TimePointSec,
    pub execute_interval: u64,
    pub scheduled_execute_times: u64,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CrontabCreate {
    crontab_creator,
    crontab_ops,
    start_time,
    execute_interval,
    scheduled_execute_times,
    extensions,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrontabCancel {
    pub fee_paying_account: ObjectId,
    pub task: ObjectId,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CrontabCancel { fee_paying_account, task, extensions });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrontabRecover {
    pub crontab_owner: ObjectId,
    pub crontab: ObjectId,
    pub restart_time: TimePointSec,
    #[serde(default)]
    pub extensions: FlatSet<String>,
}

impl_encode_struct!(CrontabRecover {
    crontab_owner,
    crontab,
    restart_time,
    extensions,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encode;
    use crate::object_id::{ObjectId, ObjectType};

    fn account(n: u64) -> ObjectId {
        ObjectId::protocol(ObjectType::Account, n)
    }

    #[test]
    fn transfer_reference_bytes() {
        let op = Transfer {
            from: account(1),
            to: account(2),
            amount: Asset {
                amount: 100,
                asset_id: ObjectId::protocol(ObjectType::Asset, 0),
            },
            memo: None,
            extensions: FlatSet::empty(),
        };
        let mut expected = vec![1, 2]; // from, to instances
        expected.extend_from_slice(&100i64.to_le_bytes());
        expected.push(0); // asset instance
        expected.push(0); // memo absent
        expected.push(0); // empty extensions
        assert_eq!(op.to_bytes(), expected);
    }

    #[test]
    fn transfer_json_omits_absent_memo() {
        let op = Transfer {
            from: account(1),
            to: account(2),
            amount: Asset {
                amount: 5,
                asset_id: ObjectId::protocol(ObjectType::Asset, 0),
            },
            memo: None,
            extensions: FlatSet::empty(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert!(json.get("memo").is_none());
        assert_eq!(json["from"], "1.2.1");
    }

    #[test]
    fn transfer_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "from": "1.2.1",
            "to": "1.2.2",
            "amount": {"amount": 100, "asset_id": "1.3.0"},
        });
        let op: Transfer = serde_json::from_value(json).unwrap();
        assert_eq!(op.memo, None);
        assert!(op.extensions.is_empty());
    }

    #[test]
    fn empty_parameter_update_encodes_to_nothing() {
        let op = CommitteeMemberUpdateGlobalParameters {};
        assert!(op.to_bytes().is_empty());
    }

    #[test]
    fn account_update_leads_with_lock_field() {
        let op = AccountUpdate {
            lock_with_vote: None,
            account: account(9),
            owner: None,
            active: None,
            new_options: None,
            extensions: FlatSet::empty(),
        };
        // Absent lock flag first, then the account instance.
        assert_eq!(op.to_bytes(), vec![0, 9, 0, 0, 0, 0]);
    }
}
