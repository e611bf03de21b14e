//! # Canonical Value Codec
//!
//! Bijective mapping between logical protocol values and the canonical byte
//! form the chain hashes and signs. Every participant must produce the exact
//! same bytes for the same logical value, so there is no room for "mostly
//! deterministic" here — field order is fixed, integers are little-endian,
//! lengths are LEB128 varints, and containers compose recursively.
//!
//! ## Architecture
//!
//! ```text
//! mod.rs        — Encode/Decode traits, varint helpers, CodecError
//! primitives.rs — fixed-width integers, bool, String, Blob, TimePointSec, VoteId
//! containers.rs — Option, Vec, FlatSet, FlatMap
//! ```
//!
//! JSON is the *other* representation of every codec value and rides on
//! serde: the wire bytes go to the signer, the serde form goes to the node's
//! JSON-RPC boundary. The two never mix.
//!
//! Decoding is the exact inverse of encoding. Truncated input or an
//! unrecognized tag is a [`CodecError::MalformedEncoding`] — surfaced
//! immediately, never retried.

pub mod containers;
pub mod primitives;

pub use containers::{FlatMap, FlatSet};
pub use primitives::{Blob, TimePointSec, VoteId};

use thiserror::Error;

/// Errors raised while decoding canonical bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input bytes do not form a valid encoding: truncated data, an
    /// over-long varint, a bad UTF-8 string, or an unknown variant tag.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(&'static str),
}

/// Serialize a value into the canonical wire form.
///
/// Implementations append to the output buffer and never fail — any value
/// that can be constructed can be encoded.
pub trait Encode {
    /// Append this value's canonical bytes to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Convenience: encode into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

/// Deserialize a value from the canonical wire form.
///
/// `decode` consumes bytes from the front of the slice and leaves the
/// remainder for the caller, so containers can chain element decodes.
pub trait Decode: Sized {
    /// Read one value off the front of `input`, advancing it.
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError>;

    /// Decode a value that must span the entire buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut slice = bytes;
        let value = Self::decode(&mut slice)?;
        if !slice.is_empty() {
            return Err(CodecError::MalformedEncoding("trailing bytes after value"));
        }
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Varints
// ---------------------------------------------------------------------------

/// Write an unsigned LEB128 varint.
///
/// Used for every length prefix, element count, operation opcode and object
/// instance number in the protocol.
pub fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Read an unsigned LEB128 varint, advancing the input slice.
pub fn read_varint(input: &mut &[u8]) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    loop {
        let &byte = input
            .first()
            .ok_or(CodecError::MalformedEncoding("truncated varint"))?;
        *input = &input[1..];
        if shift >= 64 {
            return Err(CodecError::MalformedEncoding("varint overflows u64"));
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Implement [`Encode`] for a struct by concatenating its fields in the
/// given order. Field order is the wire format, so the macro invocation doubles
/// as the layout definition.
macro_rules! impl_encode_struct {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            fn encode(&self, out: &mut Vec<u8>) {
                $( self.$field.encode(out); )+
            }
        }
    };
}
pub(crate) use impl_encode_struct;

/// Take `n` bytes off the front of the input slice.
pub(crate) fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if input.len() < n {
        return Err(CodecError::MalformedEncoding("truncated input"));
    }
    let (head, tail) = input.split_at(n);
    *input = tail;
    Ok(head)
}
