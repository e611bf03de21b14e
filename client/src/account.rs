//! # Account Directory Seam
//!
//! Signer resolution and memo encryption need to look up accounts by name or
//! id and read their authority structures and memo key. [`AccountDirectory`]
//! is that seam: the node-backed implementation lives with the RPC client,
//! and [`StaticDirectory`] serves fixtures in tests.
//!
//! Records deserialize straight from the node's JSON account objects, so the
//! field shapes here mirror the wire: auth entries are `[target, weight]`
//! pairs with string targets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The name or id resolves to nothing. An expected outcome for user
    /// input, not a fault.
    #[error("unknown account {0:?}")]
    UnknownAccount(String),

    /// The backing store failed to answer at all.
    #[error("account lookup failed: {0}")]
    Backend(String),
}

/// One authority as the node reports it: a weight threshold plus weighted
/// account and key entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityRecord {
    pub weight_threshold: u32,
    /// `[account_id, weight]` pairs.
    #[serde(default)]
    pub account_auths: Vec<(String, u16)>,
    /// `[public_key, weight]` pairs.
    #[serde(default)]
    pub key_auths: Vec<(String, u16)>,
}

/// The per-account options blob; only the memo key matters client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOptionsRecord {
    pub memo_key: String,
}

/// A chain account as seen by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    pub owner: AuthorityRecord,
    pub active: AuthorityRecord,
    #[serde(default)]
    pub options: AccountOptionsRecord,
}

impl AccountRecord {
    /// The authority for a role name. Unknown roles fall back to `active`,
    /// matching node behavior for permission lookups.
    pub fn authority(&self, role: &str) -> &AuthorityRecord {
        match role {
            "owner" => &self.owner,
            _ => &self.active,
        }
    }
}

/// Account lookup by name or id.
pub trait AccountDirectory {
    fn account(&self, name_or_id: &str) -> Result<AccountRecord, DirectoryError>;
}

/// Fixed in-memory directory for tests and offline flows.
#[derive(Default)]
pub struct StaticDirectory {
    records: HashMap<String, AccountRecord>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record under both its name and its id.
    pub fn insert(&mut self, record: AccountRecord) {
        self.records.insert(record.name.clone(), record.clone());
        self.records.insert(record.id.clone(), record);
    }
}

impl AccountDirectory for StaticDirectory {
    fn account(&self, name_or_id: &str) -> Result<AccountRecord, DirectoryError> {
        self.records
            .get(name_or_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownAccount(name_or_id.to_string()))
    }
}
