//! # The Wire Transaction
//!
//! A transaction anchors itself to a recent block (TaPoS: the low 16 bits of
//! the block number plus 4 bytes of its id), expires shortly after, and
//! carries an ordered operation list. The canonical bytes defined here are
//! what every signature covers — prefixed with the bare chain id and nothing
//! else, so a signature is valid on exactly one chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::codec::{impl_encode_struct, Encode, FlatSet, TimePointSec};
use crate::crypto::hash::sha256;
use crate::crypto::{recover_public_key, sign_digest, KeyError, PrivateKey, PublicKey, SignatureBytes};
use crate::protocol::Operation;

#[derive(Debug, Error)]
pub enum TransactionError {
    /// `sign` was called with no keys at all.
    #[error("no signing keys supplied")]
    MissingSigningKey,

    /// The chain id is not 32 hex-encoded bytes.
    #[error("chain id must be 64 hex characters")]
    InvalidChainId,

    /// The head block id is not at least 8 hex-encoded bytes.
    #[error("malformed head block id")]
    InvalidBlockId,

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// The TaPoS reference data a transaction is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: TimePointSec,
}

impl Anchor {
    /// Derive an anchor from the node's dynamic global properties: the low
    /// 16 bits of the head block number and the little-endian u32 at byte 4
    /// of the head block id.
    pub fn from_head_block(
        head_block_number: u64,
        head_block_id: &str,
        expiration: TimePointSec,
    ) -> Result<Self, TransactionError> {
        let raw = hex::decode(head_block_id).map_err(|_| TransactionError::InvalidBlockId)?;
        if raw.len() < 8 {
            return Err(TransactionError::InvalidBlockId);
        }
        let ref_block_prefix = u32::from_le_bytes(raw[4..8].try_into().unwrap());
        Ok(Anchor {
            ref_block_num: (head_block_number & 0xffff) as u16,
            ref_block_prefix,
            expiration,
        })
    }
}

/// A transaction, signed or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: TimePointSec,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub extensions: FlatSet<String>,
    #[serde(default)]
    pub signatures: Vec<SignatureBytes>,
}

// Canonical layout; signatures ride outside the signed region.
impl_encode_struct!(Transaction {
    ref_block_num,
    ref_block_prefix,
    expiration,
    operations,
    extensions,
});

impl Transaction {
    pub fn new(anchor: Anchor, operations: Vec<Operation>) -> Self {
        Transaction {
            ref_block_num: anchor.ref_block_num,
            ref_block_prefix: anchor.ref_block_prefix,
            expiration: anchor.expiration,
            operations,
            extensions: FlatSet::empty(),
            signatures: Vec::new(),
        }
    }

    /// The canonical bytes every signature covers (signatures excluded).
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// The digest to sign: `SHA256(chain_id ++ canonical_bytes)`.
    pub fn signing_digest(&self, chain_id: &str) -> Result<[u8; 32], TransactionError> {
        let chain = hex::decode(chain_id).map_err(|_| TransactionError::InvalidChainId)?;
        if chain.len() != 32 {
            return Err(TransactionError::InvalidChainId);
        }
        let mut preimage = chain;
        preimage.extend_from_slice(&self.canonical_bytes());
        Ok(sha256(&preimage))
    }

    /// The node-side transaction id: the first 20 bytes of the SHA-256 of
    /// the canonical bytes, hex-encoded.
    pub fn id(&self) -> String {
        hex::encode(&sha256(&self.canonical_bytes())[..20])
    }

    /// Sign with every supplied WIF key. Each key signs the same pre-image
    /// independently; signature order follows key order.
    pub fn sign(&mut self, wifs: &[String], chain_id: &str) -> Result<(), TransactionError> {
        if wifs.is_empty() {
            return Err(TransactionError::MissingSigningKey);
        }
        let digest = self.signing_digest(chain_id)?;
        for wif in wifs {
            let key = PrivateKey::from_wif(wif)?;
            self.signatures.push(sign_digest(&digest, &key));
        }
        debug!(tx = %self.id(), signatures = self.signatures.len(), "transaction signed");
        Ok(())
    }

    /// Recover the public keys behind the attached signatures.
    pub fn verify(&self, chain_id: &str) -> Result<Vec<PublicKey>, TransactionError> {
        let digest = self.signing_digest(chain_id)?;
        self.signatures
            .iter()
            .map(|sig| recover_public_key(&digest, sig).map_err(TransactionError::from))
            .collect()
    }
}
