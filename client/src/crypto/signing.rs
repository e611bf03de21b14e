//! # Recoverable Signatures
//!
//! Transaction signatures are 65-byte compact recoverable ECDSA: one
//! recovery prefix byte followed by `r || s`. The prefix is
//! `27 + 4 + recovery_id` — the `+4` marks a compressed public key, so a
//! verifier recovers the exact signing key from the digest and signature
//! alone, no trial decompression.
//!
//! Nonces are deterministic (RFC 6979) and `s` is always the low half of the
//! curve order; the same key and digest produce the same bytes every time,
//! which is what makes reference-encoding tests possible at all.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{take, CodecError, Decode, Encode};
use crate::crypto::keys::{KeyError, PrivateKey, PublicKey};

/// Recovery prefix base: 27 for legacy uncompressed, +4 for compressed.
const RECOVERY_COMPRESSED_BASE: u8 = 31;

/// A 65-byte compact recoverable signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignatureBytes(pub [u8; 65]);

impl SignatureBytes {
    /// The recovery id embedded in the prefix byte, if the prefix is valid.
    pub fn recovery_id(&self) -> Result<u8, KeyError> {
        let rec = self.0[0].wrapping_sub(RECOVERY_COMPRESSED_BASE);
        if rec > 3 {
            return Err(KeyError::InvalidKeyEncoding("bad signature recovery prefix"));
        }
        Ok(rec)
    }
}

impl std::fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignatureBytes({})", hex::encode(self.0))
    }
}

impl Encode for SignatureBytes {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Decode for SignatureBytes {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes: [u8; 65] = take(input, 65)?.try_into().unwrap();
        Ok(SignatureBytes(bytes))
    }
}

impl Serialize for SignatureBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for SignatureBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes: [u8; 65] = hex::decode(&s)
            .ok()
            .and_then(|v| v.try_into().ok())
            .ok_or_else(|| D::Error::custom("signature must be 130 hex chars"))?;
        Ok(SignatureBytes(bytes))
    }
}

/// Sign a 32-byte digest, producing a canonical low-S recoverable signature.
pub fn sign_digest(digest: &[u8; 32], key: &PrivateKey) -> SignatureBytes {
    let message = libsecp256k1::Message::parse(digest);
    let (mut sig, rec_id) = libsecp256k1::sign(&message, key.secret());
    let mut rec = rec_id.serialize();
    if sig.s.is_high() {
        // Flipping s to the low half mirrors the recovered point's parity.
        sig.normalize_s();
        rec ^= 1;
    }
    let mut out = [0u8; 65];
    out[0] = RECOVERY_COMPRESSED_BASE + rec;
    out[1..].copy_from_slice(&sig.serialize());
    SignatureBytes(out)
}

/// Recover the signing public key from a digest and signature.
pub fn recover_public_key(
    digest: &[u8; 32],
    signature: &SignatureBytes,
) -> Result<PublicKey, KeyError> {
    let rec = signature.recovery_id()?;
    let rec_id = libsecp256k1::RecoveryId::parse(rec)
        .map_err(|_| KeyError::InvalidKeyEncoding("bad signature recovery prefix"))?;
    let rs: [u8; 64] = signature.0[1..].try_into().unwrap();
    let sig = libsecp256k1::Signature::parse_standard(&rs)
        .map_err(|_| KeyError::InvalidKeyEncoding("signature components out of range"))?;
    let message = libsecp256k1::Message::parse(digest);
    let point = libsecp256k1::recover(&message, &sig, &rec_id)
        .map_err(|_| KeyError::InvalidKeyEncoding("signature does not recover"))?;
    Ok(PublicKey::from_point(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha256;

    fn test_key() -> PrivateKey {
        PrivateKey::from_hex("18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725")
            .unwrap()
    }

    #[test]
    fn sign_is_deterministic() {
        let digest = sha256(b"the same input");
        let a = sign_digest(&digest, &test_key());
        let b = sign_digest(&digest, &test_key());
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn recover_returns_signing_key() {
        let digest = sha256(b"recover me");
        let key = test_key();
        let sig = sign_digest(&digest, &key);
        let recovered = recover_public_key(&digest, &sig).unwrap();
        assert_eq!(recovered, key.public_key());
    }

    #[test]
    fn prefix_byte_is_in_compressed_range() {
        let digest = sha256(b"prefix check");
        let sig = sign_digest(&digest, &test_key());
        assert!((31..=34).contains(&sig.0[0]));
    }

    #[test]
    fn s_component_is_low() {
        let digest = sha256(b"low s");
        let sig = sign_digest(&digest, &test_key());
        let rs: [u8; 64] = sig.0[1..].try_into().unwrap();
        let parsed = libsecp256k1::Signature::parse_standard(&rs).unwrap();
        assert!(!parsed.s.is_high());
    }

    #[test]
    fn recover_rejects_mangled_prefix() {
        let digest = sha256(b"mangle");
        let mut sig = sign_digest(&digest, &test_key());
        sig.0[0] = 99;
        assert!(recover_public_key(&digest, &sig).is_err());
    }

    #[test]
    fn json_form_is_hex() {
        let digest = sha256(b"json");
        let sig = sign_digest(&digest, &test_key());
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 132); // 130 hex chars + quotes
        let back: SignatureBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }
}
