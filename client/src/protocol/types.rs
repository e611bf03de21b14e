//! Supporting value types embedded in operation payloads: amounts, prices,
//! account/asset option blobs, encrypted memos, and the three static-variant
//! unions (worker initializers, vesting policies, contract call arguments).
//!
//! Static variants encode as `varint(index) ++ payload` and render in JSON as
//! `[index, payload]`. Dispatch is closed and explicit — an index outside the
//! table is a deserialization error, not a passthrough.

use serde::de::Error as _;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{impl_encode_struct, write_varint, Blob, Encode, FlatSet, TimePointSec, VoteId};
use crate::crypto::PublicKey;
use crate::object_id::ObjectId;

// ---------------------------------------------------------------------------
// Amounts & prices
// ---------------------------------------------------------------------------

/// A quantity of a specific asset, in the asset's smallest unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub asset_id: ObjectId,
}

impl_encode_struct!(Asset { amount, asset_id });

/// An exchange rate between two assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub base: Asset,
    pub quote: Asset,
}

impl_encode_struct!(Price { base, quote });

/// A published price feed for a market-issued asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub settlement_price: Price,
    pub maintenance_collateral_ratio: u16,
    pub maximum_short_squeeze_ratio: u16,
    pub core_exchange_rate: Price,
}

impl_encode_struct!(PriceFeed {
    settlement_price,
    maintenance_collateral_ratio,
    maximum_short_squeeze_ratio,
    core_exchange_rate,
});

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// The encrypted-memo payload carried inside transfer-like operations.
///
/// `message` is ciphertext; the nonce plus the two public keys are exactly
/// what the receiver needs to re-derive the shared secret and decrypt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoData {
    pub from: PublicKey,
    pub to: PublicKey,
    pub nonce: u64,
    pub message: Blob,
}

impl_encode_struct!(MemoData { from, to, nonce, message });

// ---------------------------------------------------------------------------
// Account & asset options
// ---------------------------------------------------------------------------

/// Per-account settings carried by account create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountOptions {
    pub memo_key: PublicKey,
    pub voting_account: ObjectId,
    pub num_witness: u16,
    pub num_committee: u16,
    pub votes: Vec<VoteId>,
    pub extensions: Vec<String>,
}

impl AccountOptions {
    /// Canonicalize the vote list: duplicates dropped, sorted ascending by
    /// vote instance. Two option sets naming the same votes in any order
    /// serialize identically.
    pub fn new(
        memo_key: PublicKey,
        voting_account: ObjectId,
        num_witness: u16,
        num_committee: u16,
        votes: Vec<VoteId>,
        extensions: Vec<String>,
    ) -> Self {
        let mut unique: Vec<VoteId> = Vec::with_capacity(votes.len());
        for vote in votes {
            if !unique.contains(&vote) {
                unique.push(vote);
            }
        }
        unique.sort_by_key(|v| v.instance);
        AccountOptions {
            memo_key,
            voting_account,
            num_witness,
            num_committee,
            votes: unique,
            extensions,
        }
    }
}

impl_encode_struct!(AccountOptions {
    memo_key,
    voting_account,
    num_witness,
    num_committee,
    votes,
    extensions,
});

/// Dedup and sort an object id list ascending by instance — the canonical
/// form for asset whitelist/blacklist fields.
fn canonical_id_list(ids: Vec<ObjectId>) -> Vec<ObjectId> {
    let mut unique: Vec<ObjectId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique.sort_by_key(|id| id.instance);
    unique
}

/// Options common to every asset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetOptions {
    pub max_supply: u64,
    pub market_fee_percent: u16,
    pub max_market_fee: u64,
    pub issuer_permissions: u16,
    pub flags: u16,
    pub core_exchange_rate: Price,
    pub whitelist_authorities: Vec<ObjectId>,
    pub blacklist_authorities: Vec<ObjectId>,
    pub whitelist_markets: Vec<ObjectId>,
    pub blacklist_markets: Vec<ObjectId>,
    pub description: String,
    pub extensions: FlatSet<String>,
}

impl AssetOptions {
    /// Canonicalize the four authority/market lists.
    pub fn canonicalize(mut self) -> Self {
        self.whitelist_authorities = canonical_id_list(self.whitelist_authorities);
        self.blacklist_authorities = canonical_id_list(self.blacklist_authorities);
        self.whitelist_markets = canonical_id_list(self.whitelist_markets);
        self.blacklist_markets = canonical_id_list(self.blacklist_markets);
        self
    }
}

impl_encode_struct!(AssetOptions {
    max_supply,
    market_fee_percent,
    max_market_fee,
    issuer_permissions,
    flags,
    core_exchange_rate,
    whitelist_authorities,
    blacklist_authorities,
    whitelist_markets,
    blacklist_markets,
    description,
    extensions,
});

/// Extra options for market-issued (bit)assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitassetOptions {
    pub feed_lifetime_sec: u32,
    pub minimum_feeds: u8,
    pub force_settlement_delay_sec: u32,
    pub force_settlement_offset_percent: u16,
    pub maximum_force_settlement_volume: u16,
    pub short_backing_asset: ObjectId,
    pub extensions: FlatSet<String>,
}

impl Default for BitassetOptions {
    fn default() -> Self {
        BitassetOptions {
            feed_lifetime_sec: 60 * 60 * 24,
            minimum_feeds: 1,
            force_settlement_delay_sec: 60 * 60 * 24,
            force_settlement_offset_percent: 0,
            maximum_force_settlement_volume: 2000,
            short_backing_asset: ObjectId::new(1, 3, 0),
            extensions: FlatSet::empty(),
        }
    }
}

impl_encode_struct!(BitassetOptions {
    feed_lifetime_sec,
    minimum_feeds,
    force_settlement_delay_sec,
    force_settlement_offset_percent,
    maximum_force_settlement_volume,
    short_backing_asset,
    extensions,
});

// ---------------------------------------------------------------------------
// Worker initializers (static variant)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingBalanceWorkerInitializer {
    pub pay_vesting_period_days: u16,
}

impl_encode_struct!(VestingBalanceWorkerInitializer { pay_vesting_period_days });

/// How a worker proposal pays out.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerInitializer {
    Refund,
    VestingBalance(VestingBalanceWorkerInitializer),
    Burn,
}

impl WorkerInitializer {
    pub fn variant_index(&self) -> u64 {
        match self {
            WorkerInitializer::Refund => 0,
            WorkerInitializer::VestingBalance(_) => 1,
            WorkerInitializer::Burn => 2,
        }
    }
}

impl Encode for WorkerInitializer {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.variant_index(), out);
        if let WorkerInitializer::VestingBalance(inner) = self {
            inner.encode(out);
        }
    }
}

impl Serialize for WorkerInitializer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.variant_index())?;
        match self {
            WorkerInitializer::VestingBalance(inner) => tuple.serialize_element(inner)?,
            _ => tuple.serialize_element(&serde_json::json!({}))?,
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for WorkerInitializer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (index, value) = <(u64, serde_json::Value)>::deserialize(deserializer)?;
        match index {
            0 => Ok(WorkerInitializer::Refund),
            1 => Ok(WorkerInitializer::VestingBalance(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )),
            2 => Ok(WorkerInitializer::Burn),
            other => Err(D::Error::custom(format!(
                "unknown worker initializer variant {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Vesting policies (static variant)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearVestingPolicy {
    pub begin_timestamp: TimePointSec,
    pub vesting_cliff_seconds: u32,
    pub vesting_duration_seconds: u32,
}

impl_encode_struct!(LinearVestingPolicy {
    begin_timestamp,
    vesting_cliff_seconds,
    vesting_duration_seconds,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CddVestingPolicy {
    pub start_claim: TimePointSec,
    pub vesting_seconds: u32,
}

impl_encode_struct!(CddVestingPolicy { start_claim, vesting_seconds });

/// How a vesting balance releases funds over time.
#[derive(Debug, Clone, PartialEq)]
pub enum VestingPolicyInitializer {
    Linear(LinearVestingPolicy),
    Cdd(CddVestingPolicy),
}

impl VestingPolicyInitializer {
    pub fn variant_index(&self) -> u64 {
        match self {
            VestingPolicyInitializer::Linear(_) => 0,
            VestingPolicyInitializer::Cdd(_) => 1,
        }
    }
}

impl Encode for VestingPolicyInitializer {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.variant_index(), out);
        match self {
            VestingPolicyInitializer::Linear(inner) => inner.encode(out),
            VestingPolicyInitializer::Cdd(inner) => inner.encode(out),
        }
    }
}

impl Serialize for VestingPolicyInitializer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.variant_index())?;
        match self {
            VestingPolicyInitializer::Linear(inner) => tuple.serialize_element(inner)?,
            VestingPolicyInitializer::Cdd(inner) => tuple.serialize_element(inner)?,
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for VestingPolicyInitializer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (index, value) = <(u64, serde_json::Value)>::deserialize(deserializer)?;
        match index {
            0 => Ok(VestingPolicyInitializer::Linear(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )),
            1 => Ok(VestingPolicyInitializer::Cdd(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )),
            other => Err(D::Error::custom(format!(
                "unknown vesting policy variant {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Contract call arguments (static variant over Lua value kinds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuaInt {
    #[serde(rename = "baseValue")]
    pub base_value: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuaNumber {
    #[serde(rename = "baseValue")]
    pub base_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuaString {
    #[serde(rename = "baseValue")]
    pub base_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuaBool {
    #[serde(rename = "baseValue")]
    pub base_value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuaTable {
    #[serde(rename = "baseValue")]
    pub base_value: Vec<ContractArg>,
}

/// An argument passed to a contract function, typed as the contract VM's
/// value kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractArg {
    Int(LuaInt),
    Number(LuaNumber),
    String(LuaString),
    Bool(LuaBool),
    Table(LuaTable),
    Function,
}

impl ContractArg {
    pub fn variant_index(&self) -> u64 {
        match self {
            ContractArg::Int(_) => 0,
            ContractArg::Number(_) => 1,
            ContractArg::String(_) => 2,
            ContractArg::Bool(_) => 3,
            ContractArg::Table(_) => 4,
            ContractArg::Function => 5,
        }
    }

    /// Shorthand for the common string-argument case.
    pub fn string(value: &str) -> Self {
        ContractArg::String(LuaString {
            base_value: value.to_string(),
        })
    }
}

impl Encode for ContractArg {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.variant_index(), out);
        match self {
            ContractArg::Int(v) => v.base_value.encode(out),
            ContractArg::Number(v) => out.extend_from_slice(&v.base_value.to_le_bytes()),
            ContractArg::String(v) => v.base_value.encode(out),
            ContractArg::Bool(v) => v.base_value.encode(out),
            ContractArg::Table(v) => v.base_value.encode(out),
            ContractArg::Function => {}
        }
    }
}

impl Serialize for ContractArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.variant_index())?;
        match self {
            ContractArg::Int(v) => tuple.serialize_element(v)?,
            ContractArg::Number(v) => tuple.serialize_element(v)?,
            ContractArg::String(v) => tuple.serialize_element(v)?,
            ContractArg::Bool(v) => tuple.serialize_element(v)?,
            ContractArg::Table(v) => tuple.serialize_element(v)?,
            ContractArg::Function => tuple.serialize_element(&serde_json::json!({}))?,
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for ContractArg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Generic so each arm deserializes its own payload type.
        fn payload<T, E>(value: serde_json::Value) -> Result<T, E>
        where
            T: serde::de::DeserializeOwned,
            E: serde::de::Error,
        {
            serde_json::from_value(value).map_err(E::custom)
        }
        let (index, value) = <(u64, serde_json::Value)>::deserialize(deserializer)?;
        match index {
            0 => Ok(ContractArg::Int(payload(value)?)),
            1 => Ok(ContractArg::Number(payload(value)?)),
            2 => Ok(ContractArg::String(payload(value)?)),
            3 => Ok(ContractArg::Bool(payload(value)?)),
            4 => Ok(ContractArg::Table(payload(value)?)),
            5 => Ok(ContractArg::Function),
            other => Err(D::Error::custom(format!(
                "unknown contract argument variant {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_id::{ObjectId, ObjectType};

    fn core(amount: i64) -> Asset {
        Asset {
            amount,
            asset_id: ObjectId::protocol(ObjectType::Asset, 0),
        }
    }

    #[test]
    fn asset_wire_layout() {
        let asset = core(100);
        let mut expected = 100i64.to_le_bytes().to_vec();
        expected.push(0); // varint instance
        assert_eq!(asset.to_bytes(), expected);
    }

    #[test]
    fn asset_json_shape() {
        let json = serde_json::to_value(core(100)).unwrap();
        assert_eq!(json, serde_json::json!({"amount": 100, "asset_id": "1.3.0"}));
    }

    #[test]
    fn account_options_votes_deduped_and_sorted() {
        let key = crate::crypto::PrivateKey::from_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap()
        .public_key();
        let options = AccountOptions::new(
            key,
            ObjectId::protocol(ObjectType::Account, 5),
            0,
            0,
            vec![
                VoteId { vote_type: 1, instance: 9 },
                VoteId { vote_type: 0, instance: 2 },
                VoteId { vote_type: 1, instance: 9 },
            ],
            vec![],
        );
        let instances: Vec<u32> = options.votes.iter().map(|v| v.instance).collect();
        assert_eq!(instances, vec![2, 9]);
    }

    #[test]
    fn id_lists_sort_by_instance() {
        let ids = vec![
            ObjectId::protocol(ObjectType::Account, 30),
            ObjectId::protocol(ObjectType::Account, 4),
            ObjectId::protocol(ObjectType::Account, 30),
        ];
        let canonical = canonical_id_list(ids);
        let instances: Vec<u64> = canonical.iter().map(|id| id.instance).collect();
        assert_eq!(instances, vec![4, 30]);
    }

    #[test]
    fn worker_initializer_json_and_wire() {
        let init = WorkerInitializer::VestingBalance(VestingBalanceWorkerInitializer {
            pay_vesting_period_days: 7,
        });
        let json = serde_json::to_value(&init).unwrap();
        assert_eq!(json, serde_json::json!([1, {"pay_vesting_period_days": 7}]));
        let back: WorkerInitializer = serde_json::from_value(json).unwrap();
        assert_eq!(back, init);
        assert_eq!(init.to_bytes(), vec![1, 7, 0]);
    }

    #[test]
    fn refund_initializer_has_empty_payload() {
        let json = serde_json::to_value(WorkerInitializer::Refund).unwrap();
        assert_eq!(json, serde_json::json!([0, {}]));
        assert_eq!(WorkerInitializer::Refund.to_bytes(), vec![0]);
    }

    #[test]
    fn contract_arg_string_roundtrip() {
        let arg = ContractArg::string("spawn");
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json, serde_json::json!([2, {"baseValue": "spawn"}]));
        let back: ContractArg = serde_json::from_value(json).unwrap();
        assert_eq!(back, arg);
    }

    #[test]
    fn contract_arg_json_covers_every_variant() {
        let args: Vec<ContractArg> = serde_json::from_value(serde_json::json!([
            [0, {"baseValue": 7}],
            [1, {"baseValue": 2.5}],
            [2, {"baseValue": "hi"}],
            [3, {"baseValue": true}],
            [4, {"baseValue": [[3, {"baseValue": false}]]}],
            [5, {}],
        ]))
        .unwrap();
        assert_eq!(args[0], ContractArg::Int(LuaInt { base_value: 7 }));
        assert_eq!(args[1], ContractArg::Number(LuaNumber { base_value: 2.5 }));
        assert_eq!(args[2], ContractArg::string("hi"));
        assert_eq!(args[3], ContractArg::Bool(LuaBool { base_value: true }));
        assert_eq!(
            args[4],
            ContractArg::Table(LuaTable {
                base_value: vec![ContractArg::Bool(LuaBool { base_value: false })],
            })
        );
        assert_eq!(args[5], ContractArg::Function);
    }

    #[test]
    fn contract_arg_rejects_unknown_variant() {
        let err = serde_json::from_value::<ContractArg>(serde_json::json!([9, {}]));
        assert!(err.is_err());
    }

    #[test]
    fn nested_table_encodes_recursively() {
        let table = ContractArg::Table(LuaTable {
            base_value: vec![ContractArg::Bool(LuaBool { base_value: true })],
        });
        assert_eq!(table.to_bytes(), vec![4, 1, 3, 1]);
    }
}
