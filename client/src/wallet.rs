//! # Wallet Seam
//!
//! The signing pipeline never owns keys; it asks a [`KeyStore`] whether the
//! wallet holds the private key for a given public key string. The store is
//! read-only from the core's point of view — resolution and signing look
//! keys up, they never add or remove them.

use std::collections::HashMap;

use crate::crypto::{KeyError, PrivateKey};

/// Read-only source of signing keys, indexed by public key string.
pub trait KeyStore {
    /// The WIF private key for `public`, if the wallet holds it.
    fn private_key_for_public(&self, public: &str) -> Option<String>;
}

/// An in-memory key store for sessions and tests.
#[derive(Default)]
pub struct MemoryKeyStore {
    by_public: HashMap<String, String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a WIF key, indexing it under its derived public key string.
    pub fn add_wif(&mut self, wif: &str) -> Result<(), KeyError> {
        let key = PrivateKey::from_wif(wif)?;
        self.by_public
            .insert(key.public_key().to_string(), wif.to_string());
        Ok(())
    }

    /// Add a key under an explicit public string, e.g. one rendered with a
    /// non-default chain prefix.
    pub fn add_wif_for(&mut self, public: &str, wif: &str) {
        self.by_public.insert(public.to_string(), wif.to_string());
    }

    pub fn len(&self) -> usize {
        self.by_public.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_public.is_empty()
    }
}

impl KeyStore for MemoryKeyStore {
    fn private_key_for_public(&self, public: &str) -> Option<String> {
        self.by_public.get(public).cloned()
    }
}
