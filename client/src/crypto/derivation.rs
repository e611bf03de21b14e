//! # Deterministic Key Derivation
//!
//! Two pure derivation schemes, no hidden state:
//!
//! - [`BrainKey`] — a stream of private keys from a memorable passphrase and
//!   an integer sequence number. Incrementing the sequence yields the next
//!   key; re-deriving with the same inputs always yields the same key.
//! - [`PasswordKey`] — a single key from `(account, role, password)`, so an
//!   account's active/owner/memo keys can be regenerated from a password
//!   alone instead of being stored.

use sha2::{Digest, Sha256, Sha512};

use crate::crypto::keys::{KeyError, PrivateKey};

/// Collapse runs of whitespace to single spaces and trim the ends.
///
/// Two phrases that differ only in spacing derive the same keys.
fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A passphrase-and-sequence key stream.
#[derive(Clone)]
pub struct BrainKey {
    phrase: String,
    sequence: u64,
}

impl std::fmt::Debug for BrainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The phrase is the secret; only the position is loggable.
        write!(f, "BrainKey(<redacted> @ {})", self.sequence)
    }
}

impl BrainKey {
    pub fn new(phrase: &str, sequence: u64) -> Self {
        BrainKey {
            phrase: normalize_phrase(phrase),
            sequence,
        }
    }

    /// The normalized passphrase.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Derive the private key at the current sequence position:
    /// `SHA256(SHA512(phrase + " " + sequence))`.
    pub fn private_key(&self) -> Result<PrivateKey, KeyError> {
        let encoded = format!("{} {}", self.phrase, self.sequence);
        let inner = Sha512::digest(encoded.as_bytes());
        let bytes: [u8; 32] = Sha256::digest(inner).into();
        PrivateKey::from_bytes(&bytes)
    }

    /// Step to the next sequence position.
    pub fn next_sequence(&self) -> Self {
        BrainKey {
            phrase: self.phrase.clone(),
            sequence: self.sequence + 1,
        }
    }
}

/// A single key derived from account name, role and password.
#[derive(Clone)]
pub struct PasswordKey {
    account: String,
    role: String,
    password: String,
}

impl std::fmt::Debug for PasswordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PasswordKey({}/{}, <redacted>)", self.account, self.role)
    }
}

impl PasswordKey {
    pub fn new(account: &str, role: &str, password: &str) -> Self {
        PasswordKey {
            account: account.to_string(),
            role: role.to_string(),
            password: password.to_string(),
        }
    }

    /// Derive the private key: `SHA256(account + role + password)`.
    pub fn private_key(&self) -> Result<PrivateKey, KeyError> {
        let seed = format!("{}{}{}", self.account, self.role, self.password);
        let bytes: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        PrivateKey::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brain_key_is_deterministic() {
        let a = BrainKey::new("COLORER BICORN KASBEKE FAERIE", 0);
        let b = BrainKey::new("COLORER BICORN KASBEKE FAERIE", 0);
        assert_eq!(a.private_key().unwrap(), b.private_key().unwrap());
    }

    #[test]
    fn whitespace_normalization() {
        let tidy = BrainKey::new("alpha beta gamma", 3);
        let messy = BrainKey::new("  alpha\t beta \n gamma ", 3);
        assert_eq!(tidy.private_key().unwrap(), messy.private_key().unwrap());
    }

    #[test]
    fn sequence_changes_the_key() {
        let k0 = BrainKey::new("some phrase", 0);
        let k1 = k0.next_sequence();
        assert_eq!(k1.sequence(), 1);
        assert_ne!(k0.private_key().unwrap(), k1.private_key().unwrap());
    }

    #[test]
    fn password_key_is_deterministic() {
        let a = PasswordKey::new("alice", "active", "hunter2");
        let b = PasswordKey::new("alice", "active", "hunter2");
        assert_eq!(a.private_key().unwrap(), b.private_key().unwrap());
    }

    #[test]
    fn password_key_varies_by_role() {
        let active = PasswordKey::new("alice", "active", "hunter2");
        let owner = PasswordKey::new("alice", "owner", "hunter2");
        assert_ne!(
            active.private_key().unwrap(),
            owner.private_key().unwrap()
        );
    }
}
