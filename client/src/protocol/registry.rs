//! # Operation Registry
//!
//! The closed, compile-time table tying opcodes to operation names and
//! payload types. One macro invocation below is the single source of truth:
//! the [`Operation`] enum, the opcode/name lookups, the JSON constructors and
//! the wire encoding are all generated from it, so the table cannot drift
//! apart from the dispatch.
//!
//! A handful of opcodes are reserved for virtual or node-internal kinds a
//! client never constructs (fills, blind transfers, FBA distribution); those
//! are registered by name but carry no payload and surface
//! [`OperationError::UnimplementedOperation`] when requested. Opcode 10 is a
//! hole left by a historic removal and is simply unknown.

use serde::de::Error as _;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::{impl_encode_struct, write_varint, Encode};
use crate::protocol::operations::*;

/// Errors raised when constructing or dispatching operations.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The id or name is not in the registry at all.
    #[error("unknown operation {0}")]
    UnknownOperation(String),

    /// The id is registered but names a virtual/node-internal kind with no
    /// client-side payload.
    #[error("operation {name} (id {id}) has no client-side payload")]
    UnimplementedOperation { id: u64, name: &'static str },

    /// The id was recognized but the supplied value does not deserialize
    /// into its payload.
    #[error("invalid payload for {name}: {reason}")]
    InvalidPayload { name: &'static str, reason: String },
}

/// Registered opcodes with no payload class: virtual results of matching
/// engines and features this chain never exposed client-side.
pub const RESERVED_OPCODES: &[(u64, &str)] = &[
    (4, "fill_order"),
    (35, "transfer_to_blind"),
    (36, "blind_transfer"),
    (37, "transfer_from_blind"),
    (40, "fba_distribute"),
    (42, "execute_bid"),
    (45, "temporary_authority_chang"),
];

macro_rules! operation_registry {
    ($( $opcode:literal => $variant:ident($payload:ty) as $name:literal ),+ $(,)?) => {
        /// Every operation kind the client can construct, each carrying its
        /// payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Operation {
            $( $variant($payload), )+
        }

        impl Operation {
            /// The wire opcode of this operation.
            pub fn opcode(&self) -> u64 {
                match self {
                    $( Operation::$variant(_) => $opcode, )+
                }
            }

            /// The registered operation name.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Operation::$variant(_) => $name, )+
                }
            }

            /// Deserialize a payload value against a numeric opcode.
            pub fn from_id_and_value(
                id: u64,
                value: &serde_json::Value,
            ) -> Result<Self, OperationError> {
                match id {
                    $(
                        $opcode => serde_json::from_value::<$payload>(value.clone())
                            .map(Operation::$variant)
                            .map_err(|e| OperationError::InvalidPayload {
                                name: $name,
                                reason: e.to_string(),
                            }),
                    )+
                    other => match RESERVED_OPCODES.iter().find(|(rid, _)| *rid == other) {
                        Some(&(id, name)) => {
                            Err(OperationError::UnimplementedOperation { id, name })
                        }
                        None => Err(OperationError::UnknownOperation(other.to_string())),
                    },
                }
            }

            /// Deserialize a payload value against an operation name.
            pub fn from_name_and_value(
                name: &str,
                value: &serde_json::Value,
            ) -> Result<Self, OperationError> {
                match name {
                    $( $name => Self::from_id_and_value($opcode, value), )+
                    other => match RESERVED_OPCODES.iter().find(|(_, rname)| *rname == other) {
                        Some(&(id, name)) => {
                            Err(OperationError::UnimplementedOperation { id, name })
                        }
                        None => Err(OperationError::UnknownOperation(other.to_string())),
                    },
                }
            }

            /// The `[opcode, payload]` JSON form the node expects.
            pub fn to_json(&self) -> serde_json::Value {
                // Serialize cannot fail: payloads are plain data.
                serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
            }
        }

        impl Encode for Operation {
            fn encode(&self, out: &mut Vec<u8>) {
                write_varint(self.opcode(), out);
                match self {
                    $( Operation::$variant(payload) => payload.encode(out), )+
                }
            }
        }

        impl Serialize for Operation {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(&self.opcode())?;
                match self {
                    $( Operation::$variant(payload) => tuple.serialize_element(payload)?, )+
                }
                tuple.end()
            }
        }

        /// The full `(opcode, name)` table, for lookups and completeness
        /// checks.
        pub const REGISTERED_OPCODES: &[(u64, &str)] = &[
            $( ($opcode, $name), )+
        ];
    };
}

operation_registry! {
    0 => Transfer(Transfer) as "transfer",
    1 => LimitOrderCreate(LimitOrderCreate) as "limit_order_create",
    2 => LimitOrderCancel(LimitOrderCancel) as "limit_order_cancel",
    3 => CallOrderUpdate(CallOrderUpdate) as "call_order_update",
    5 => AccountCreate(AccountCreate) as "account_create",
    6 => AccountUpdate(AccountUpdate) as "account_update",
    7 => AccountUpgrade(AccountUpgrade) as "account_upgrade",
    8 => AssetCreate(AssetCreate) as "asset_create",
    9 => AssetUpdate(AssetUpdate) as "asset_update",
    11 => AssetUpdateBitasset(AssetUpdateBitasset) as "asset_update_bitasset",
    12 => AssetUpdateFeedProducers(AssetUpdateFeedProducers) as "asset_update_feed_producers",
    13 => AssetIssue(AssetIssue) as "asset_issue",
    14 => AssetReserve(AssetReserve) as "asset_reserve",
    15 => AssetFundFeePool(AssetFundFeePool) as "asset_fund_fee_pool",
    16 => AssetSettle(AssetSettle) as "asset_settle",
    17 => AssetGlobalSettle(AssetGlobalSettle) as "asset_global_settle",
    18 => AssetPublishFeed(AssetPublishFeed) as "asset_publish_feed",
    19 => WitnessCreate(WitnessCreate) as "witness_create",
    20 => WitnessUpdate(WitnessUpdate) as "witness_update",
    21 => ProposalCreate(ProposalCreate) as "proposal_create",
    22 => ProposalUpdate(ProposalUpdate) as "proposal_update",
    23 => ProposalDelete(ProposalDelete) as "proposal_delete",
    24 => WithdrawPermissionCreate(WithdrawPermissionCreate) as "withdraw_permission_create",
    25 => WithdrawPermissionUpdate(WithdrawPermissionUpdate) as "withdraw_permission_update",
    26 => WithdrawPermissionClaim(WithdrawPermissionClaim) as "withdraw_permission_claim",
    27 => WithdrawPermissionDelete(WithdrawPermissionDelete) as "withdraw_permission_delete",
    28 => CommitteeMemberCreate(CommitteeMemberCreate) as "committee_member_create",
    29 => CommitteeMemberUpdate(CommitteeMemberUpdate) as "committee_member_update",
    30 => CommitteeMemberUpdateGlobalParameters(CommitteeMemberUpdateGlobalParameters)
        as "committee_member_update_global_parameters",
    31 => VestingBalanceCreate(VestingBalanceCreate) as "vesting_balance_create",
    32 => VestingBalanceWithdraw(VestingBalanceWithdraw) as "vesting_balance_withdraw",
    33 => WorkerCreate(WorkerCreate) as "worker_create",
    34 => BalanceClaim(BalanceClaim) as "balance_claim",
    38 => AssetSettleCancel(AssetSettleCancel) as "asset_settle_cancel",
    39 => AssetClaimFees(AssetClaimFees) as "asset_claim_fees",
    41 => BidCollateral(BidCollateral) as "bid_collateral",
    43 => ContractCreate(ContractCreate) as "contract_create",
    44 => CallContractFunction(CallContractFunction) as "call_contract_function",
    46 => RegisterNhAssetCreator(RegisterNhAssetCreator) as "register_nh_asset_creator",
    47 => CreateWorldView(CreateWorldView) as "create_world_view",
    48 => RelateWorldView(RelateWorldView) as "relate_world_view",
    49 => CreateNhAsset(CreateNhAsset) as "create_nh_asset",
    50 => DeleteNhAsset(DeleteNhAsset) as "delete_nh_asset",
    51 => TransferNhAsset(TransferNhAsset) as "transfer_nh_asset",
    52 => CreateNhAssetOrder(CreateNhAssetOrder) as "create_nh_asset_order",
    53 => CancelNhAssetOrder(CancelNhAssetOrder) as "cancel_nh_asset_order",
    54 => FillNhAssetOrder(FillNhAssetOrder) as "fill_nh_asset_order",
    55 => CreateFile(CreateFile) as "create_file",
    56 => AddFileRelateAccount(AddFileRelateAccount) as "add_file_relate_account",
    57 => FileSignature(FileSignature) as "file_signature",
    58 => RelateParentFile(RelateParentFile) as "relate_parent_file",
    59 => ReviseContract(ReviseContract) as "revise_contract",
    60 => CrontabCreate(CrontabCreate) as "crontab_create",
    61 => CrontabCancel(CrontabCancel) as "crontab_cancel",
    62 => CrontabRecover(CrontabRecover) as "crontab_recover",
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (id, value) = <(u64, serde_json::Value)>::deserialize(deserializer)?;
        Operation::from_id_and_value(id, &value).map_err(D::Error::custom)
    }
}

/// An operation nested inside a proposal or crontab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpWrapper {
    pub op: Operation,
}

impl_encode_struct!(OpWrapper { op });
