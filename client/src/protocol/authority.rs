//! # Weighted Authorities
//!
//! An authority is satisfied when the weights of its signing keys (and,
//! recursively, its delegated accounts) meet the threshold. The chain
//! requires key entries sorted by the key's derived address, so the
//! constructor canonicalizes — two authorities naming the same keys in any
//! order serialize to identical bytes and identical JSON.

use serde::{Deserialize, Serialize};

use crate::codec::{impl_encode_struct, FlatMap, FlatSet};
use crate::crypto::PublicKey;
use crate::object_id::ObjectId;

/// A weight threshold over weighted account and key entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authority {
    pub weight_threshold: u32,
    pub account_auths: FlatMap<ObjectId, u16>,
    pub key_auths: FlatMap<PublicKey, u16>,
    pub extensions: FlatSet<String>,
}

impl Authority {
    /// Build a canonical authority: `key_auths` sorted ascending by each
    /// key's address string, `account_auths` kept in caller order.
    pub fn new(
        weight_threshold: u32,
        account_auths: Vec<(ObjectId, u16)>,
        key_auths: Vec<(PublicKey, u16)>,
    ) -> Self {
        let mut keys = key_auths;
        keys.sort_by_key(|(key, _)| key.address().to_string());
        Authority {
            weight_threshold,
            account_auths: FlatMap::new(account_auths),
            key_auths: FlatMap::new(keys),
            extensions: FlatSet::empty(),
        }
    }
}

impl_encode_struct!(Authority {
    weight_threshold,
    account_auths,
    key_auths,
    extensions,
});
