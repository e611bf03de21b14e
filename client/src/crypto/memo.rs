//! # Memo Encryption
//!
//! Transfer memos are encrypted for exactly two parties: an ECDH shared
//! secret (the x-coordinate of `receiver_pub * sender_priv`) is stretched
//! with a per-memo nonce through SHA-512 into an AES-256-GCM key and nonce.
//! Either side re-derives the same secret from its own private key and the
//! counterparty's public key, so the [`MemoData`] payload carries everything
//! a receiver needs: both public keys, the nonce and the ciphertext.
//!
//! An empty message is an absent memo, not an encrypted empty string —
//! encryption returns `None` so the operation field stays absent.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha512};
use thiserror::Error;
use tracing::debug;

use crate::account::{AccountDirectory, DirectoryError};
use crate::codec::Blob;
use crate::crypto::keys::{KeyError, PrivateKey, PublicKey};
use crate::protocol::MemoData;
use crate::wallet::KeyStore;

#[derive(Debug, Error)]
pub enum MemoError {
    /// The wallet holds no private memo key for the named account.
    #[error("no private memo key for account {account}")]
    MissingKey { account: String },

    /// Ciphertext failed authentication — wrong key pair or corrupted data.
    #[error("memo does not decrypt")]
    DecryptFailed,

    /// Decrypted bytes are not UTF-8.
    #[error("decrypted memo is not valid text")]
    NotText,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Derive the AES key and nonce for a key pair and memo nonce.
///
/// `seed = SHA512(hex(shared_x) || decimal(nonce))`; the first 32 bytes key
/// the cipher, the next 12 are the GCM nonce.
fn derive_cipher(
    private: &PrivateKey,
    public: &PublicKey,
    nonce: u64,
) -> Result<([u8; 32], [u8; 12]), MemoError> {
    let mut point = public.point().clone();
    point
        .tweak_mul_assign(private.secret())
        .map_err(|_| KeyError::InvalidKeyEncoding("degenerate shared point"))?;
    let shared_x = &point.serialize_compressed()[1..33];

    let mut hasher = Sha512::new();
    hasher.update(hex::encode(shared_x).as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    let seed = hasher.finalize();

    let key: [u8; 32] = seed[..32].try_into().unwrap();
    let gcm_nonce: [u8; 12] = seed[32..44].try_into().unwrap();
    Ok((key, gcm_nonce))
}

/// Encrypt a memo from sender to receiver. Empty plaintext yields `None`.
pub fn encrypt_memo(
    plaintext: &str,
    sender: &PrivateKey,
    receiver: &PublicKey,
    nonce: u64,
) -> Result<Option<MemoData>, MemoError> {
    if plaintext.is_empty() {
        return Ok(None);
    }
    let (key, gcm_nonce) = derive_cipher(sender, receiver, nonce)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| MemoError::DecryptFailed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&gcm_nonce), plaintext.as_bytes())
        .map_err(|_| MemoError::DecryptFailed)?;
    Ok(Some(MemoData {
        from: sender.public_key(),
        to: receiver.clone(),
        nonce,
        message: Blob(ciphertext),
    }))
}

/// Decrypt a memo with one side's private key and the counterparty's public
/// key.
pub fn decrypt_memo(
    memo: &MemoData,
    private: &PrivateKey,
    counterparty: &PublicKey,
) -> Result<String, MemoError> {
    let (key, gcm_nonce) = derive_cipher(private, counterparty, memo.nonce)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| MemoError::DecryptFailed)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&gcm_nonce), memo.message.0.as_slice())
        .map_err(|_| MemoError::DecryptFailed)?;
    String::from_utf8(plaintext).map_err(|_| MemoError::NotText)
}

/// Account-aware memo plumbing: resolves memo keys through the directory and
/// wallet so callers deal in account names, not key material.
pub struct MemoService<'a> {
    directory: &'a dyn AccountDirectory,
    keys: &'a dyn KeyStore,
}

impl<'a> MemoService<'a> {
    pub fn new(directory: &'a dyn AccountDirectory, keys: &'a dyn KeyStore) -> Self {
        MemoService { directory, keys }
    }

    /// Encrypt a memo between two accounts, drawing a fresh random nonce.
    /// Returns `None` for an empty message.
    pub fn encrypt_between(
        &self,
        from_account: &str,
        to_account: &str,
        message: &str,
    ) -> Result<Option<MemoData>, MemoError> {
        if message.is_empty() {
            return Ok(None);
        }
        let sender = self.directory.account(from_account)?;
        let receiver = self.directory.account(to_account)?;

        let sender_memo_public = sender.options.memo_key.clone();
        let wif = self
            .keys
            .private_key_for_public(&sender_memo_public)
            .ok_or_else(|| MemoError::MissingKey {
                account: sender.name.clone(),
            })?;
        let sender_private = PrivateKey::from_wif(&wif)?;
        let receiver_public: PublicKey = receiver.options.memo_key.parse()?;

        let nonce = rand::rngs::OsRng.next_u64();
        debug!(from = %sender.name, to = %receiver.name, "encrypting memo");
        encrypt_memo(message, &sender_private, &receiver_public, nonce)
    }

    /// Decrypt a received memo, looking up whichever side's private key the
    /// wallet holds.
    pub fn decrypt(&self, memo: &MemoData) -> Result<String, MemoError> {
        let to_string = memo.to.to_string();
        if let Some(wif) = self.keys.private_key_for_public(&to_string) {
            let private = PrivateKey::from_wif(&wif)?;
            return decrypt_memo(memo, &private, &memo.from);
        }
        let from_string = memo.from.to_string();
        if let Some(wif) = self.keys.private_key_for_public(&from_string) {
            let private = PrivateKey::from_wif(&wif)?;
            return decrypt_memo(memo, &private, &memo.to);
        }
        Err(MemoError::MissingKey { account: to_string })
    }
}
