//! # Key Material
//!
//! secp256k1 private keys in WIF (Base58Check, version byte `0x80`),
//! compressed public keys in the chain's prefixed base58 form, and the
//! RIPEMD-160 address digest that orders authority key lists.
//!
//! All three string forms carry a truncated checksum, so a typo'd key fails
//! loudly at parse time instead of producing a signature nobody can verify.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::{take, CodecError, Decode, Encode};
use crate::config::{DEFAULT_PREFIX, KNOWN_CHAINS};
use crate::crypto::hash::{ripemd160, sha256d, sha512};

/// WIF version byte for secp256k1 private keys.
const WIF_VERSION: u8 = 0x80;

/// Errors raised while parsing or deriving key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The string is not a well-formed key: bad base58, wrong length,
    /// wrong version byte, or a point/scalar off the curve.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(&'static str),

    /// The embedded checksum does not match the payload.
    #[error("key checksum mismatch")]
    InvalidChecksum,

    /// The string does not start with any recognized chain prefix.
    #[error("unrecognized key prefix in {0:?}")]
    UnknownPrefix(String),
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A secp256k1 secret scalar.
///
/// `Debug` prints a redaction marker, never key bytes — these things end up
/// in logs otherwise, and logs end up everywhere.
#[derive(Clone)]
pub struct PrivateKey {
    secret: libsecp256k1::SecretKey,
}

impl PrivateKey {
    /// Import a raw 32-byte scalar. Fails on zero or ≥ the curve order.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret = libsecp256k1::SecretKey::parse(bytes)
            .map_err(|_| KeyError::InvalidKeyEncoding("scalar out of range"))?;
        Ok(PrivateKey { secret })
    }

    /// Import from a hex string. Mainly for fixtures and tests.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = hex::decode(s)
            .ok()
            .and_then(|v| v.try_into().ok())
            .ok_or(KeyError::InvalidKeyEncoding("expected 64 hex chars"))?;
        PrivateKey::from_bytes(&bytes)
    }

    /// Parse a Wallet Import Format string.
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        let raw = bs58::decode(wif)
            .into_vec()
            .map_err(|_| KeyError::InvalidKeyEncoding("not base58"))?;
        if raw.len() != 1 + 32 + 4 {
            return Err(KeyError::InvalidKeyEncoding("wrong WIF length"));
        }
        let (payload, checksum) = raw.split_at(raw.len() - 4);
        if sha256d(payload)[..4] != *checksum {
            return Err(KeyError::InvalidChecksum);
        }
        if payload[0] != WIF_VERSION {
            return Err(KeyError::InvalidKeyEncoding("wrong WIF version byte"));
        }
        let bytes: [u8; 32] = payload[1..].try_into().unwrap();
        PrivateKey::from_bytes(&bytes)
    }

    /// Render as a Wallet Import Format string.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(1 + 32 + 4);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.secret.serialize());
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        bs58::encode(payload).into_string()
    }

    /// Hex export. Mainly for fixtures and tests.
    pub fn to_hex(&self) -> String {
        hex::encode(self.secret.serialize())
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: libsecp256k1::PublicKey::from_secret_key(&self.secret),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub(crate) fn secret(&self) -> &libsecp256k1::SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.secret.serialize() == other.secret.serialize()
    }
}

impl Eq for PrivateKey {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A compressed secp256k1 public key with its chain prefix.
///
/// String form is `prefix + base58(point || ripemd160(point)[..4])`; equality
/// and ordering ignore the prefix and compare the point's address digest,
/// which is the sort key the authority canonicalization uses.
#[derive(Clone)]
pub struct PublicKey {
    point: libsecp256k1::PublicKey,
    prefix: String,
}

impl PublicKey {
    /// Parse a prefixed base58 key string, validating the checksum.
    pub fn from_string(s: &str, prefix: &str) -> Result<Self, KeyError> {
        let body = s
            .strip_prefix(prefix)
            .ok_or_else(|| KeyError::UnknownPrefix(s.to_string()))?;
        let raw = bs58::decode(body)
            .into_vec()
            .map_err(|_| KeyError::InvalidKeyEncoding("not base58"))?;
        if raw.len() != 33 + 4 {
            return Err(KeyError::InvalidKeyEncoding("wrong public key length"));
        }
        let (key, checksum) = raw.split_at(33);
        if ripemd160(key)[..4] != *checksum {
            return Err(KeyError::InvalidChecksum);
        }
        let bytes: [u8; 33] = key.try_into().unwrap();
        PublicKey::from_compressed(&bytes, prefix)
    }

    /// Import a raw 33-byte compressed point.
    pub fn from_compressed(bytes: &[u8; 33], prefix: &str) -> Result<Self, KeyError> {
        let point = libsecp256k1::PublicKey::parse_compressed(bytes)
            .map_err(|_| KeyError::InvalidKeyEncoding("point not on curve"))?;
        Ok(PublicKey {
            point,
            prefix: prefix.to_string(),
        })
    }

    /// The 33-byte compressed point.
    pub fn to_compressed(&self) -> [u8; 33] {
        self.point.serialize_compressed()
    }

    /// The chain prefix this key renders with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Re-tag the key with a different chain prefix. The point is unchanged.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// The address derived from this key.
    pub fn address(&self) -> Address {
        Address::from_public(self)
    }

    pub(crate) fn point(&self) -> &libsecp256k1::PublicKey {
        &self.point
    }

    pub(crate) fn from_point(point: libsecp256k1::PublicKey) -> Self {
        PublicKey {
            point,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.to_compressed();
        let checksum = ripemd160(&key);
        let mut payload = Vec::with_capacity(33 + 4);
        payload.extend_from_slice(&key);
        payload.extend_from_slice(&checksum[..4]);
        write!(f, "{}{}", self.prefix, bs58::encode(payload).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    /// Parse with any known chain prefix, falling back to the default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for chain in KNOWN_CHAINS {
            if s.starts_with(chain.prefix) {
                if let Ok(key) = PublicKey::from_string(s, chain.prefix) {
                    return Ok(key);
                }
            }
        }
        PublicKey::from_string(s, DEFAULT_PREFIX)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for PublicKey {}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().to_string().cmp(&other.address().to_string())
    }
}

impl Encode for PublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_compressed());
    }
}

impl Decode for PublicKey {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes: [u8; 33] = take(input, 33)?.try_into().unwrap();
        PublicKey::from_compressed(&bytes, DEFAULT_PREFIX)
            .map_err(|_| CodecError::MalformedEncoding("invalid compressed public key"))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A chain address: `prefix + base58(digest || ripemd160(digest)[..4])` where
/// `digest = ripemd160(sha512(compressed_point))`.
///
/// Addresses are not used on the wire by this client; their string form is
/// the canonical ordering key for authority key lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address {
    digest: [u8; 20],
    prefix: String,
}

impl Address {
    /// Derive the address of a public key, inheriting its prefix.
    pub fn from_public(key: &PublicKey) -> Self {
        let digest = ripemd160(&sha512(&key.to_compressed()));
        Address {
            digest,
            prefix: key.prefix.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = ripemd160(&self.digest);
        let mut payload = Vec::with_capacity(20 + 4);
        payload.extend_from_slice(&self.digest);
        payload.extend_from_slice(&checksum[..4]);
        write!(f, "{}{}", self.prefix, bs58::encode(payload).into_string())
    }
}
