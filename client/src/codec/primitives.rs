//! Primitive codec types: fixed-width integers, booleans, strings, byte
//! blobs, timestamps and vote identifiers.
//!
//! Integers are little-endian on the wire. Strings and blobs carry a varint
//! byte-length prefix. The JSON forms follow the node's conventions: blobs
//! render as hex, timestamps as `"%Y-%m-%dT%H:%M:%S"` in UTC, vote ids as
//! `"type:instance"`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{read_varint, take, write_varint, CodecError, Decode, Encode};

// ---------------------------------------------------------------------------
// Fixed-width integers & bool
// ---------------------------------------------------------------------------

macro_rules! impl_le_int {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }

            impl Decode for $ty {
                fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
                    let bytes = take(input, std::mem::size_of::<$ty>())?;
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    Ok(<$ty>::from_le_bytes(buf))
                }
            }
        )+
    };
}

impl_le_int!(u8, u16, u32, u64, i16, i64);

impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl Decode for bool {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        match u8::decode(input)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::MalformedEncoding("bool flag must be 0 or 1")),
        }
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

impl Encode for String {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.len() as u64, out);
        out.extend_from_slice(self.as_bytes());
    }
}

impl Decode for String {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let len = read_varint(input)? as usize;
        let bytes = take(input, len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| CodecError::MalformedEncoding("string is not valid utf-8"))
    }
}

impl Encode for &str {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.len() as u64, out);
        out.extend_from_slice(self.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// Blob — raw bytes, hex in JSON
// ---------------------------------------------------------------------------

/// An opaque byte string. Length-prefixed on the wire, hex-encoded in JSON.
///
/// Distinct from `Vec<u8>` on purpose: an array of `u8` codec values would
/// share the wire layout but render as a JSON array of numbers, which is
/// never what the node expects for binary fields (memo ciphertext, custom
/// payloads).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encode for Blob {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.0.len() as u64, out);
        out.extend_from_slice(&self.0);
    }
}

impl Decode for Blob {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let len = read_varint(input)? as usize;
        Ok(Blob(take(input, len)?.to_vec()))
    }
}

impl Serialize for Blob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Blob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map(Blob).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// TimePointSec
// ---------------------------------------------------------------------------

/// A chain timestamp with one-second resolution.
///
/// Four little-endian bytes of Unix epoch seconds on the wire; the node's
/// JSON boundary wants `"%Y-%m-%dT%H:%M:%S"` with no zone suffix (always
/// UTC). Seconds past 2106 are the chain's problem, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePointSec(pub u32);

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl TimePointSec {
    /// The timestamp `secs` seconds from now (negative values go backwards).
    pub fn from_now(secs: i64) -> Self {
        let epoch = Utc::now().timestamp() + secs;
        TimePointSec(epoch.max(0) as u32)
    }

    pub fn from_epoch(epoch: u32) -> Self {
        TimePointSec(epoch)
    }

    pub fn epoch(&self) -> u32 {
        self.0
    }

    /// Parse the node's timestamp string form.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        // Some node builds emit a trailing 'Z'; tolerate it.
        let trimmed = s.strip_suffix('Z').unwrap_or(s);
        let naive = NaiveDateTime::parse_from_str(trimmed, TIME_FORMAT)
            .map_err(|_| CodecError::MalformedEncoding("bad timestamp string"))?;
        Ok(TimePointSec(naive.and_utc().timestamp().max(0) as u32))
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = DateTime::<Utc>::from_timestamp(i64::from(self.0), 0)
            .expect("u32 epoch is always in range");
        write!(f, "{}", dt.format(TIME_FORMAT))
    }
}

impl FromStr for TimePointSec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Encode for TimePointSec {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl Decode for TimePointSec {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        Ok(TimePointSec(u32::decode(input)?))
    }
}

impl Serialize for TimePointSec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimePointSec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimePointSec::parse(&s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// VoteId
// ---------------------------------------------------------------------------

/// A governance vote identifier: `"type:instance"` in JSON, packed into a
/// single u32 on the wire (low 8 bits type, high 24 bits instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteId {
    pub vote_type: u8,
    pub instance: u32,
}

impl VoteId {
    pub fn new(vote_type: u8, instance: u32) -> Self {
        Self { vote_type, instance }
    }

    /// Parse the `"type:instance"` string form.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let (ty, inst) = s
            .split_once(':')
            .ok_or(CodecError::MalformedEncoding("vote id needs type:instance"))?;
        let vote_type: u8 = ty
            .parse()
            .map_err(|_| CodecError::MalformedEncoding("bad vote type"))?;
        let instance: u32 = inst
            .parse()
            .map_err(|_| CodecError::MalformedEncoding("bad vote instance"))?;
        if instance >= 1 << 24 {
            return Err(CodecError::MalformedEncoding("vote instance exceeds 24 bits"));
        }
        Ok(Self { vote_type, instance })
    }

    fn packed(&self) -> u32 {
        (self.instance << 8) | u32::from(self.vote_type)
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vote_type, self.instance)
    }
}

impl FromStr for VoteId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Encode for VoteId {
    fn encode(&self, out: &mut Vec<u8>) {
        self.packed().encode(out);
    }
}

impl Decode for VoteId {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let packed = u32::decode(input)?;
        Ok(VoteId {
            vote_type: (packed & 0xff) as u8,
            instance: packed >> 8,
        })
    }
}

impl Serialize for VoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        VoteId::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: T) {
        let bytes = value.to_bytes();
        let decoded = T::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn integer_roundtrips() {
        roundtrip(0u8);
        roundtrip(255u8);
        roundtrip(0xbeefu16);
        roundtrip(0xdead_beefu32);
        roundtrip(u64::MAX);
        roundtrip(-42i64);
        roundtrip(i16::MIN);
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(0x0102u16.to_bytes(), vec![0x02, 0x01]);
        assert_eq!(100i64.to_bytes(), vec![100, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn bool_roundtrip_and_strictness() {
        roundtrip(true);
        roundtrip(false);
        assert!(bool::from_bytes(&[2]).is_err());
    }

    #[test]
    fn string_roundtrip() {
        roundtrip(String::new());
        roundtrip("hello graphene".to_string());
        roundtrip("ünïcödé ✓".to_string());
    }

    #[test]
    fn string_wire_form() {
        assert_eq!("abc".to_string().to_bytes(), vec![3, b'a', b'b', b'c']);
    }

    #[test]
    fn blob_roundtrip_and_json() {
        roundtrip(Blob(vec![0xde, 0xad, 0xbe, 0xef]));
        let json = serde_json::to_string(&Blob(vec![0xca, 0xfe])).unwrap();
        assert_eq!(json, "\"cafe\"");
        let back: Blob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Blob(vec![0xca, 0xfe]));
    }

    #[test]
    fn time_point_roundtrip() {
        roundtrip(TimePointSec(1_700_000_000));
    }

    #[test]
    fn time_point_string_forms() {
        let t = TimePointSec::parse("2023-11-14T22:13:20").unwrap();
        assert_eq!(t.0, 1_700_000_000);
        assert_eq!(t.to_string(), "2023-11-14T22:13:20");
        // A trailing Z is tolerated on input.
        assert_eq!(TimePointSec::parse("2023-11-14T22:13:20Z").unwrap(), t);
        assert!(TimePointSec::parse("not-a-time").is_err());
    }

    #[test]
    fn vote_id_packing() {
        let v = VoteId::parse("1:123").unwrap();
        assert_eq!(v.vote_type, 1);
        assert_eq!(v.instance, 123);
        assert_eq!(v.to_bytes(), ((123u32 << 8) | 1).to_le_bytes().to_vec());
        roundtrip(v);
    }

    #[test]
    fn vote_id_rejects_garbage() {
        assert!(VoteId::parse("1").is_err());
        assert!(VoteId::parse("a:b").is_err());
        assert!(VoteId::parse("1:16777216").is_err());
    }
}
