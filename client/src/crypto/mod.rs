//! # Cryptography
//!
//! secp256k1 key material, recoverable ECDSA transaction signatures, ECDH
//! memo encryption and deterministic key derivation. The digest plumbing
//! (SHA-256/512, RIPEMD-160) lives in [`hash`] so the Base58Check and
//! address code reads as formulas rather than hasher boilerplate.

pub mod derivation;
pub mod hash;
pub mod keys;
pub mod memo;
pub mod signing;

pub use derivation::{BrainKey, PasswordKey};
pub use keys::{Address, KeyError, PrivateKey, PublicKey};
pub use memo::{decrypt_memo, encrypt_memo, MemoError, MemoService};
pub use signing::{recover_public_key, sign_digest, SignatureBytes};
