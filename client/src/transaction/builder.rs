//! # Transaction Builder
//!
//! A builder is one logical transaction session: stage operations, resolve
//! who must sign, pin to a recent block, sign, broadcast, done. The session
//! walks an explicit state machine —
//!
//! ```text
//! Empty → Staging → Constructed → Signed → Broadcast
//! ```
//!
//! — with `clear()` returning to `Empty` from anywhere. Staged operations
//! live outside the wire transaction until `construct`, which is also where
//! the proposal/crontab wrapping modes apply: either the staged operations go
//! out as-is, or they are bundled into a single `proposal_create` or
//! `crontab_create` carrying them as nested ops. The two wrapping modes are
//! mutually exclusive.

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::account::{AccountDirectory, AuthorityRecord, DirectoryError};
use crate::codec::{FlatSet, TimePointSec};
use crate::config::{CONFIRMATION_POLL_INTERVAL, MAX_AUTHORITY_DEPTH, PROPOSAL_EXPIRATION, TX_EXPIRATION};
use crate::crypto::{KeyError, PrivateKey};
use crate::object_id::ObjectId;
use crate::protocol::operations::{CrontabCreate, ProposalCreate};
use crate::protocol::{OpWrapper, Operation};
use crate::rpc::RpcError;
use crate::transaction::signed::{Anchor, Transaction, TransactionError};
use crate::wallet::KeyStore;

/// Where the builder is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Empty,
    Staging,
    Constructed,
    Signed,
    Broadcast,
}

/// What counts as "confirmed" when broadcasting in blocking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationMode {
    /// Included in any produced block.
    Head,
    /// Included in an irreversible block.
    Irreversible,
}

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("no staged operations")]
    NothingStaged,

    #[error("builder is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: BuilderState,
        actual: BuilderState,
    },

    #[error("proposal and crontab modes are mutually exclusive")]
    ModeConflict,

    /// Signer resolution fell short of the authority threshold.
    #[error("missing signing key: collected weight {collected} of {required} for {account} ({role})")]
    MissingSigningKey {
        account: String,
        role: String,
        collected: u32,
        required: u32,
    },

    /// The node rejected the transaction's authority set.
    #[error("node reports insufficient authority for this transaction")]
    InsufficientAuthority,

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// The node surface the builder needs. Implemented by the RPC client and by
/// mocks in tests.
pub trait NodeApi {
    fn chain_id(&mut self) -> Result<String, RpcError>;
    fn anchor(&mut self, expiration: Duration) -> Result<Anchor, RpcError>;
    fn verify_authority(&mut self, tx: &Transaction) -> Result<bool, RpcError>;
    fn broadcast(&mut self, tx: &Transaction) -> Result<(), RpcError>;
    /// Poll once: the block number containing the transaction, if any.
    fn find_transaction(
        &mut self,
        tx_id: &str,
        mode: ConfirmationMode,
    ) -> Result<Option<u64>, RpcError>;
}

/// Settings for proposal wrapping mode.
#[derive(Debug, Clone)]
struct ProposalSettings {
    proposer: ObjectId,
    review_period_seconds: Option<u32>,
}

/// Settings for crontab (scheduled) wrapping mode.
#[derive(Debug, Clone)]
struct CrontabSettings {
    creator: ObjectId,
    start_time: TimePointSec,
    execute_interval: u64,
    scheduled_execute_times: u64,
}

/// A recorded signer-resolution outcome, checked at sign time.
#[derive(Debug)]
struct SignerRequirement {
    account: String,
    role: String,
    collected: u32,
    required: u32,
}

/// One transaction session.
pub struct TransactionBuilder<'a> {
    keys: &'a dyn KeyStore,
    directory: &'a dyn AccountDirectory,
    state: BuilderState,
    staged: Vec<Operation>,
    wifs: Vec<String>,
    resolved: HashSet<(String, String)>,
    requirements: Vec<SignerRequirement>,
    proposal: Option<ProposalSettings>,
    crontab: Option<CrontabSettings>,
    nobroadcast: bool,
    blocking: Option<ConfirmationMode>,
    expiration: Duration,
    transaction: Option<Transaction>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(keys: &'a dyn KeyStore, directory: &'a dyn AccountDirectory) -> Self {
        TransactionBuilder {
            keys,
            directory,
            state: BuilderState::Empty,
            staged: Vec::new(),
            wifs: Vec::new(),
            resolved: HashSet::new(),
            requirements: Vec::new(),
            proposal: None,
            crontab: None,
            nobroadcast: false,
            blocking: None,
            expiration: TX_EXPIRATION,
            transaction: None,
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// The constructed (and possibly signed) transaction, once one exists.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    /// Stage an operation. Order is preserved; nothing touches the network.
    pub fn append_operation(&mut self, op: Operation) -> Result<&mut Self, BuilderError> {
        match self.state {
            BuilderState::Empty | BuilderState::Staging => {
                self.staged.push(op);
                self.state = BuilderState::Staging;
                Ok(self)
            }
            actual => Err(BuilderError::InvalidState {
                expected: BuilderState::Staging,
                actual,
            }),
        }
    }

    /// Add an explicit signing key, validating the WIF immediately.
    pub fn append_wif(&mut self, wif: &str) -> Result<&mut Self, BuilderError> {
        PrivateKey::from_wif(wif)?;
        if !self.wifs.iter().any(|w| w == wif) {
            self.wifs.push(wif.to_string());
        }
        Ok(self)
    }

    /// Switch the session to proposal mode: at construct time the staged
    /// operations are bundled into a single `proposal_create` paid by
    /// `proposer`.
    pub fn propose_as(
        &mut self,
        proposer: ObjectId,
        review_period_seconds: Option<u32>,
    ) -> Result<&mut Self, BuilderError> {
        if self.crontab.is_some() {
            return Err(BuilderError::ModeConflict);
        }
        self.proposal = Some(ProposalSettings {
            proposer,
            review_period_seconds,
        });
        Ok(self)
    }

    /// Switch the session to crontab mode: at construct time the staged
    /// operations become a scheduled `crontab_create`.
    pub fn schedule_as(
        &mut self,
        creator: ObjectId,
        start_time: TimePointSec,
        execute_interval: u64,
        scheduled_execute_times: u64,
    ) -> Result<&mut Self, BuilderError> {
        if self.proposal.is_some() {
            return Err(BuilderError::ModeConflict);
        }
        self.crontab = Some(CrontabSettings {
            creator,
            start_time,
            execute_interval,
            scheduled_execute_times,
        });
        Ok(self)
    }

    /// Dry-run flag: sign but never submit.
    pub fn set_nobroadcast(&mut self, nobroadcast: bool) -> &mut Self {
        self.nobroadcast = nobroadcast;
        self
    }

    /// Block on inclusion after broadcast.
    pub fn set_blocking(&mut self, mode: Option<ConfirmationMode>) -> &mut Self {
        self.blocking = mode;
        self
    }

    pub fn set_expiration(&mut self, expiration: Duration) -> &mut Self {
        self.expiration = expiration;
        self
    }

    /// Collect signing keys for an account's role authority, descending into
    /// delegated accounts. Idempotent per `(account, role)` within the
    /// session; the shortfall check happens at `sign`.
    ///
    /// The required threshold is read once from the top-level account and
    /// reused unchanged at every recursion depth, mirroring the reference
    /// wallet's resolution. Resolving `active` also sweeps the account's
    /// `owner` keys when the active set alone falls short.
    pub fn resolve_signer(&mut self, account: &str, role: &str) -> Result<(), BuilderError> {
        if !self.resolved.insert((account.to_string(), role.to_string())) {
            return Ok(());
        }
        let record = self.directory.account(account)?;
        let authority = record.authority(role).clone();
        let required = authority.weight_threshold;

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(record.id.clone());
        let mut collected = collect_keys(
            self.keys,
            self.directory,
            &mut self.wifs,
            &authority,
            role,
            required,
            0,
            &mut visited,
        )?;
        if role == "active" && collected < required {
            collected += collect_keys(
                self.keys,
                self.directory,
                &mut self.wifs,
                &record.owner,
                "owner",
                required,
                0,
                &mut visited,
            )?;
        }
        debug!(account, role, collected, required, "resolved signer");
        self.requirements.push(SignerRequirement {
            account: account.to_string(),
            role: role.to_string(),
            collected,
            required,
        });
        Ok(())
    }

    /// Pin the staged operations to an anchor, applying the wrapping mode.
    pub fn construct(&mut self, anchor: Anchor) -> Result<&mut Self, BuilderError> {
        if self.state != BuilderState::Staging {
            return Err(BuilderError::InvalidState {
                expected: BuilderState::Staging,
                actual: self.state,
            });
        }
        if self.staged.is_empty() {
            return Err(BuilderError::NothingStaged);
        }

        let operations = if let Some(proposal) = &self.proposal {
            let wrapped = self
                .staged
                .iter()
                .cloned()
                .map(|op| OpWrapper { op })
                .collect();
            vec![Operation::ProposalCreate(ProposalCreate {
                fee_paying_account: proposal.proposer,
                expiration_time: TimePointSec(
                    anchor.expiration.0 + PROPOSAL_EXPIRATION.as_secs() as u32,
                ),
                proposed_ops: wrapped,
                review_period_seconds: proposal.review_period_seconds,
                extensions: FlatSet::empty(),
            })]
        } else if let Some(crontab) = &self.crontab {
            let wrapped = self
                .staged
                .iter()
                .cloned()
                .map(|op| OpWrapper { op })
                .collect();
            vec![Operation::CrontabCreate(CrontabCreate {
                crontab_creator: crontab.creator,
                crontab_ops: wrapped,
                start_time: crontab.start_time,
                execute_interval: crontab.execute_interval,
                scheduled_execute_times: crontab.scheduled_execute_times,
                extensions: FlatSet::empty(),
            })]
        } else {
            self.staged.clone()
        };

        self.transaction = Some(Transaction::new(anchor, operations));
        self.state = BuilderState::Constructed;
        Ok(self)
    }

    /// Sign the constructed transaction with every resolved and appended key.
    pub fn sign(&mut self, chain_id: &str) -> Result<&mut Self, BuilderError> {
        if self.state != BuilderState::Constructed {
            return Err(BuilderError::InvalidState {
                expected: BuilderState::Constructed,
                actual: self.state,
            });
        }
        for req in &self.requirements {
            if req.collected < req.required {
                return Err(BuilderError::MissingSigningKey {
                    account: req.account.clone(),
                    role: req.role.clone(),
                    collected: req.collected,
                    required: req.required,
                });
            }
        }
        let tx = self.transaction.as_mut().ok_or(BuilderError::InvalidState {
            expected: BuilderState::Constructed,
            actual: self.state,
        })?;
        tx.sign(&self.wifs, chain_id)?;
        self.state = BuilderState::Signed;
        Ok(self)
    }

    /// Drive the session to completion against a node: construct from the
    /// node's head block if needed, sign with its chain id if needed, verify
    /// authority, submit, and optionally block on inclusion.
    pub fn broadcast(&mut self, node: &mut dyn NodeApi) -> Result<Transaction, BuilderError> {
        if self.state == BuilderState::Staging {
            let anchor = node.anchor(self.expiration)?;
            self.construct(anchor)?;
        }
        if self.state == BuilderState::Constructed {
            let chain_id = node.chain_id()?;
            self.sign(&chain_id)?;
        }
        if self.state != BuilderState::Signed {
            return Err(BuilderError::InvalidState {
                expected: BuilderState::Signed,
                actual: self.state,
            });
        }
        let tx = self
            .transaction
            .clone()
            .ok_or(BuilderError::InvalidState {
                expected: BuilderState::Signed,
                actual: self.state,
            })?;

        if self.nobroadcast {
            warn!(tx = %tx.id(), "nobroadcast set, not submitting transaction");
            self.finish_session();
            return Ok(tx);
        }

        if !node.verify_authority(&tx)? {
            return Err(BuilderError::InsufficientAuthority);
        }
        node.broadcast(&tx)?;
        info!(tx = %tx.id(), operations = tx.operations.len(), "transaction broadcast");

        if let Some(mode) = self.blocking {
            let tx_id = tx.id();
            loop {
                if let Some(block) = node.find_transaction(&tx_id, mode)? {
                    info!(tx = %tx_id, block, "transaction confirmed");
                    break;
                }
                std::thread::sleep(CONFIRMATION_POLL_INTERVAL);
            }
        }
        self.finish_session();
        Ok(tx)
    }

    /// Reset to `Empty`, dropping everything staged, resolved and built.
    pub fn clear(&mut self) {
        self.staged.clear();
        self.wifs.clear();
        self.resolved.clear();
        self.requirements.clear();
        self.proposal = None;
        self.crontab = None;
        self.transaction = None;
        self.state = BuilderState::Empty;
    }

    /// Post-broadcast cleanup: staged state goes, the built transaction
    /// stays inspectable.
    fn finish_session(&mut self) {
        self.staged.clear();
        self.wifs.clear();
        self.resolved.clear();
        self.requirements.clear();
        self.state = BuilderState::Broadcast;
    }
}

/// Sweep an authority for wallet-held keys, recursing into delegated
/// accounts while the collected weight stays under `required`.
#[allow(clippy::too_many_arguments)]
fn collect_keys(
    keys: &dyn KeyStore,
    directory: &dyn AccountDirectory,
    wifs: &mut Vec<String>,
    authority: &AuthorityRecord,
    role: &str,
    required: u32,
    depth: u8,
    visited: &mut HashSet<String>,
) -> Result<u32, BuilderError> {
    let mut collected = 0u32;
    for (public, weight) in &authority.key_auths {
        if let Some(wif) = keys.private_key_for_public(public) {
            if !wifs.iter().any(|w| w == &wif) {
                wifs.push(wif);
            }
            collected += u32::from(*weight);
        }
    }
    if collected < required && depth < MAX_AUTHORITY_DEPTH {
        for (delegate_id, _) in &authority.account_auths {
            if !visited.insert(delegate_id.clone()) {
                continue;
            }
            let delegate = directory.account(delegate_id)?;
            collected += collect_keys(
                keys,
                directory,
                wifs,
                delegate.authority(role),
                role,
                required,
                depth + 1,
                visited,
            )?;
        }
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountRecord, AuthorityRecord, StaticDirectory};
    use crate::codec::FlatSet;
    use crate::object_id::{ObjectId, ObjectType};
    use crate::protocol::operations::Transfer;
    use crate::protocol::types::Asset;
    use crate::wallet::MemoryKeyStore;

    const CHAIN: &str = "6057d856c398875cac2650fe6a5a6b98fa134b5e1b775ba133b50ac5d6c12cbb";

    fn key(n: u8) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        PrivateKey::from_bytes(&bytes).unwrap()
    }

    fn anchor() -> Anchor {
        Anchor {
            ref_block_num: 100,
            ref_block_prefix: 0xabad1dea,
            expiration: TimePointSec(1_700_000_000),
        }
    }

    fn transfer_op() -> Operation {
        Operation::Transfer(Transfer {
            from: ObjectId::protocol(ObjectType::Account, 1),
            to: ObjectId::protocol(ObjectType::Account, 2),
            amount: Asset {
                amount: 100,
                asset_id: ObjectId::protocol(ObjectType::Asset, 0),
            },
            memo: None,
            extensions: FlatSet::empty(),
        })
    }

    /// Account "alice" with a 2-of-2 active authority over `key(1)`,`key(2)`.
    fn alice_directory() -> StaticDirectory {
        let mut directory = StaticDirectory::new();
        directory.insert(AccountRecord {
            id: "1.2.1".into(),
            name: "alice".into(),
            active: AuthorityRecord {
                weight_threshold: 2,
                account_auths: vec![],
                key_auths: vec![
                    (key(1).public_key().to_string(), 1),
                    (key(2).public_key().to_string(), 1),
                ],
            },
            owner: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![],
                key_auths: vec![(key(3).public_key().to_string(), 1)],
            },
            ..Default::default()
        });
        directory
    }

    struct MockNode {
        broadcasts: usize,
        authority_ok: bool,
    }

    impl MockNode {
        fn new() -> Self {
            MockNode {
                broadcasts: 0,
                authority_ok: true,
            }
        }
    }

    impl NodeApi for MockNode {
        fn chain_id(&mut self) -> Result<String, RpcError> {
            Ok(CHAIN.to_string())
        }

        fn anchor(&mut self, expiration: Duration) -> Result<Anchor, RpcError> {
            Ok(Anchor {
                ref_block_num: 7,
                ref_block_prefix: 9,
                expiration: TimePointSec(1_700_000_000 + expiration.as_secs() as u32),
            })
        }

        fn verify_authority(&mut self, _tx: &Transaction) -> Result<bool, RpcError> {
            Ok(self.authority_ok)
        }

        fn broadcast(&mut self, _tx: &Transaction) -> Result<(), RpcError> {
            self.broadcasts += 1;
            Ok(())
        }

        fn find_transaction(
            &mut self,
            _tx_id: &str,
            _mode: ConfirmationMode,
        ) -> Result<Option<u64>, RpcError> {
            Ok(Some(1))
        }
    }

    #[test]
    fn state_walk() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        assert_eq!(builder.state(), BuilderState::Empty);

        builder.append_operation(transfer_op()).unwrap();
        assert_eq!(builder.state(), BuilderState::Staging);

        builder.construct(anchor()).unwrap();
        assert_eq!(builder.state(), BuilderState::Constructed);

        builder.append_wif(&key(1).to_wif()).unwrap();
        builder.sign(CHAIN).unwrap();
        assert_eq!(builder.state(), BuilderState::Signed);

        builder.clear();
        assert_eq!(builder.state(), BuilderState::Empty);
        assert!(builder.transaction().is_none());
    }

    #[test]
    fn cannot_stage_after_construct() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.construct(anchor()).unwrap();
        assert!(matches!(
            builder.append_operation(transfer_op()),
            Err(BuilderError::InvalidState { .. })
        ));
    }

    #[test]
    fn construct_with_nothing_staged_fails() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        assert!(matches!(
            builder.construct(anchor()),
            Err(BuilderError::InvalidState { .. })
        ));
    }

    #[test]
    fn append_wif_validates_eagerly() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        assert!(builder.append_wif("garbage").is_err());
    }

    #[test]
    fn threshold_shortfall_fails_at_sign() {
        let mut wallet = MemoryKeyStore::new();
        wallet.add_wif(&key(1).to_wif()).unwrap(); // weight 1 of required 2
        let directory = alice_directory();

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.resolve_signer("alice", "active").unwrap();
        builder.construct(anchor()).unwrap();

        match builder.sign(CHAIN) {
            Err(BuilderError::MissingSigningKey {
                collected, required, ..
            }) => {
                assert_eq!((collected, required), (1, 2));
            }
            Err(other) => panic!("expected MissingSigningKey, got {other:?}"),
            Ok(_) => panic!("signing should not have succeeded"),
        }
    }

    #[test]
    fn threshold_met_signs() {
        let mut wallet = MemoryKeyStore::new();
        wallet.add_wif(&key(1).to_wif()).unwrap();
        wallet.add_wif(&key(2).to_wif()).unwrap();
        let directory = alice_directory();

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.resolve_signer("alice", "active").unwrap();
        builder.construct(anchor()).unwrap();
        builder.sign(CHAIN).unwrap();

        assert_eq!(builder.transaction().unwrap().signatures.len(), 2);
    }

    #[test]
    fn owner_key_rescues_active_resolution() {
        // Wallet holds only the owner key; active resolution sweeps it in.
        let mut wallet = MemoryKeyStore::new();
        wallet.add_wif(&key(3).to_wif()).unwrap();

        let mut directory = StaticDirectory::new();
        directory.insert(AccountRecord {
            id: "1.2.1".into(),
            name: "alice".into(),
            active: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![],
                key_auths: vec![(key(1).public_key().to_string(), 1)],
            },
            owner: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![],
                key_auths: vec![(key(3).public_key().to_string(), 1)],
            },
            ..Default::default()
        });

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.resolve_signer("alice", "active").unwrap();
        builder.construct(anchor()).unwrap();
        builder.sign(CHAIN).unwrap();
        assert_eq!(builder.transaction().unwrap().signatures.len(), 1);
    }

    #[test]
    fn delegated_account_keys_are_collected() {
        // alice delegates to bob; the wallet holds bob's key.
        let mut wallet = MemoryKeyStore::new();
        wallet.add_wif(&key(5).to_wif()).unwrap();

        let mut directory = StaticDirectory::new();
        directory.insert(AccountRecord {
            id: "1.2.1".into(),
            name: "alice".into(),
            active: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![("1.2.2".into(), 1)],
                key_auths: vec![],
            },
            ..Default::default()
        });
        directory.insert(AccountRecord {
            id: "1.2.2".into(),
            name: "bob".into(),
            active: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![],
                key_auths: vec![(key(5).public_key().to_string(), 1)],
            },
            ..Default::default()
        });

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.resolve_signer("alice", "active").unwrap();
        builder.construct(anchor()).unwrap();
        builder.sign(CHAIN).unwrap();
        assert_eq!(builder.transaction().unwrap().signatures.len(), 1);
    }

    #[test]
    fn authority_cycles_terminate() {
        // alice and bob delegate to each other; neither key is held.
        let wallet = MemoryKeyStore::new();
        let mut directory = StaticDirectory::new();
        directory.insert(AccountRecord {
            id: "1.2.1".into(),
            name: "alice".into(),
            active: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![("1.2.2".into(), 1)],
                key_auths: vec![],
            },
            ..Default::default()
        });
        directory.insert(AccountRecord {
            id: "1.2.2".into(),
            name: "bob".into(),
            active: AuthorityRecord {
                weight_threshold: 1,
                account_auths: vec![("1.2.1".into(), 1)],
                key_auths: vec![],
            },
            ..Default::default()
        });

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.resolve_signer("alice", "active").unwrap();
        // Resolution terminated; the shortfall surfaces at sign time.
        builder.append_operation(transfer_op()).unwrap();
        builder.construct(anchor()).unwrap();
        assert!(matches!(
            builder.sign(CHAIN),
            Err(BuilderError::MissingSigningKey { .. })
        ));
    }

    #[test]
    fn proposal_mode_wraps_staged_ops() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder
            .propose_as(ObjectId::protocol(ObjectType::Account, 9), Some(3600))
            .unwrap();
        builder.append_operation(transfer_op()).unwrap();
        builder.construct(anchor()).unwrap();

        let tx = builder.transaction().unwrap();
        assert_eq!(tx.operations.len(), 1);
        match &tx.operations[0] {
            Operation::ProposalCreate(p) => {
                assert_eq!(p.fee_paying_account.instance, 9);
                assert_eq!(p.proposed_ops.len(), 1);
                assert_eq!(p.review_period_seconds, Some(3600));
                assert!(p.expiration_time.0 > anchor().expiration.0);
            }
            other => panic!("expected proposal_create, got {other:?}"),
        }
    }

    #[test]
    fn crontab_mode_wraps_staged_ops() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder
            .schedule_as(
                ObjectId::protocol(ObjectType::Account, 9),
                TimePointSec(1_800_000_000),
                600,
                5,
            )
            .unwrap();
        builder.append_operation(transfer_op()).unwrap();
        builder.construct(anchor()).unwrap();

        match &builder.transaction().unwrap().operations[0] {
            Operation::CrontabCreate(c) => {
                assert_eq!(c.crontab_ops.len(), 1);
                assert_eq!(c.execute_interval, 600);
                assert_eq!(c.scheduled_execute_times, 5);
            }
            other => panic!("expected crontab_create, got {other:?}"),
        }
    }

    #[test]
    fn wrap_modes_are_mutually_exclusive() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder
            .propose_as(ObjectId::protocol(ObjectType::Account, 9), None)
            .unwrap();
        assert!(matches!(
            builder.schedule_as(
                ObjectId::protocol(ObjectType::Account, 9),
                TimePointSec(0),
                1,
                1
            ),
            Err(BuilderError::ModeConflict)
        ));
    }

    #[test]
    fn broadcast_drives_the_full_session() {
        let mut wallet = MemoryKeyStore::new();
        wallet.add_wif(&key(1).to_wif()).unwrap();
        wallet.add_wif(&key(2).to_wif()).unwrap();
        let directory = alice_directory();

        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.set_blocking(Some(ConfirmationMode::Head));
        builder.append_operation(transfer_op()).unwrap();
        builder.resolve_signer("alice", "active").unwrap();

        let mut node = MockNode::new();
        let tx = builder.broadcast(&mut node).unwrap();
        assert_eq!(node.broadcasts, 1);
        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(builder.state(), BuilderState::Broadcast);
    }

    #[test]
    fn nobroadcast_skips_submission() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.set_nobroadcast(true);
        builder.append_operation(transfer_op()).unwrap();
        builder.append_wif(&key(1).to_wif()).unwrap();

        let mut node = MockNode::new();
        let tx = builder.broadcast(&mut node).unwrap();
        assert_eq!(node.broadcasts, 0);
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(builder.state(), BuilderState::Broadcast);
    }

    #[test]
    fn rejected_authority_surfaces() {
        let wallet = MemoryKeyStore::new();
        let directory = StaticDirectory::new();
        let mut builder = TransactionBuilder::new(&wallet, &directory);
        builder.append_operation(transfer_op()).unwrap();
        builder.append_wif(&key(1).to_wif()).unwrap();

        let mut node = MockNode::new();
        node.authority_ok = false;
        assert!(matches!(
            builder.broadcast(&mut node),
            Err(BuilderError::InsufficientAuthority)
        ));
    }
}
